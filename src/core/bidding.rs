//! Chef-side quote visibility and bid submission.
//!
//! A chef sees an unconfirmed quote when at least one requested food item is
//! on the chef's active menu. Quotes the chef already bid on stay visible
//! whatever their state. Quotes whose customer profile is missing or is not a
//! customer are never shown.

use crate::{
    core::{
        accounts::require_profile_role,
        details::{QuoteDetails, load_details},
        menu::active_food_item_ids,
    },
    entities::{ChefQuote, Quote, QuoteStatus, UserRole, chef_quote, quote},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// Whether `details` should appear on the dashboard of `chef_id`.
#[must_use]
pub fn is_visible_to_chef(
    chef_id: i64,
    menu_food_ids: &HashSet<i64>,
    details: &QuoteDetails,
) -> bool {
    let has_customer = details
        .customer
        .as_ref()
        .is_some_and(|c| c.role == UserRole::Customer);
    if !has_customer {
        return false;
    }
    if details.bid_from(chef_id).is_some() {
        return true;
    }
    !details.quote.is_confirmed
        && details
            .items
            .iter()
            .any(|line| menu_food_ids.contains(&line.item.food_item_id))
}

/// Keeps the quotes visible to `chef_id`, preserving input order.
#[must_use]
pub fn filter_visible_to_chef(
    chef_id: i64,
    menu_food_ids: &HashSet<i64>,
    quotes: Vec<QuoteDetails>,
) -> Vec<QuoteDetails> {
    quotes
        .into_iter()
        .filter(|details| is_visible_to_chef(chef_id, menu_food_ids, details))
        .collect()
}

/// Lists the quotes a chef may see, newest first.
///
/// # Errors
/// Returns `Forbidden` if the profile is not a chef.
pub async fn quotes_for_chef(db: &DatabaseConnection, chef_id: i64) -> Result<Vec<QuoteDetails>> {
    require_profile_role(db, chef_id, UserRole::Chef).await?;
    let menu = active_food_item_ids(db, chef_id).await?;

    let quotes = Quote::find()
        .order_by_desc(quote::Column::CreatedAt)
        .order_by_desc(quote::Column::Id)
        .all(db)
        .await?;
    let visible = filter_visible_to_chef(chef_id, &menu, load_details(db, quotes).await?);
    debug!(
        "Chef {} sees {} quotes with {} active menu items",
        chef_id,
        visible.len(),
        menu.len()
    );
    Ok(visible)
}

/// Records a chef's price for a quote request.
///
/// # Errors
/// Returns an error if:
/// - The price is not a positive finite number
/// - The profile is not a chef, or the quote does not match the chef's menu
/// - The quote does not exist or is already confirmed
/// - The chef already quoted this request
pub async fn submit_chef_quote(
    db: &DatabaseConnection,
    quote_id: i64,
    chef_id: i64,
    price: f64,
) -> Result<chef_quote::Model> {
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidPrice { price });
    }

    let txn = db.begin().await?;
    require_profile_role(&txn, chef_id, UserRole::Chef).await?;

    let quote = Quote::find_by_id(quote_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;
    if quote.is_confirmed {
        return Err(Error::QuoteConfirmed { quote_id });
    }

    let menu = active_food_item_ids(&txn, chef_id).await?;
    let visible = load_details(&txn, vec![quote])
        .await?
        .first()
        .is_some_and(|details| is_visible_to_chef(chef_id, &menu, details));
    if !visible {
        return Err(Error::forbidden("this request does not match your menu"));
    }

    let existing = ChefQuote::find()
        .filter(chef_quote::Column::QuoteId.eq(quote_id))
        .filter(chef_quote::Column::ChefId.eq(chef_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(Error::Duplicate {
            message: "You have already submitted a quote for this request".to_string(),
        });
    }

    let chef_quote = chef_quote::ActiveModel {
        quote_id: Set(quote_id),
        chef_id: Set(chef_id),
        price: Set(price),
        quote_status: Set(QuoteStatus::Pending),
        is_visible_to_customer: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Chef {} quoted ${:.2} for quote {} (chef quote {})",
        chef_id, price, quote_id, chef_quote.id
    );
    Ok(chef_quote)
}

//! Customer quote requests and the customer's order list.

use crate::{
    core::{
        accounts::require_profile_role,
        details::{QuoteDetails, load_details, load_quote},
    },
    entities::{FoodItem, OrderStatus, Quote, UserRole, food_item, quote, quote_item},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// One requested dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedItem {
    /// Catalog entry
    pub food_item_id: i64,
    /// Number of portions
    pub quantity: i32,
}

/// Everything a customer fills in to request a catered menu.
#[derive(Debug, Clone)]
pub struct NewQuoteRequest {
    /// Day of the party
    pub party_date: NaiveDate,
    /// Delivery location
    pub party_location: String,
    /// Vegetarian guests
    pub veg_guests: i32,
    /// Non-vegetarian guests
    pub non_veg_guests: i32,
    /// Requested dishes
    pub items: Vec<RequestedItem>,
}

fn validate_request(request: &NewQuoteRequest, today: NaiveDate) -> Result<String> {
    let location = request.party_location.trim();
    if location.is_empty() {
        return Err(Error::validation("Party location is required"));
    }
    if request.party_date < today {
        return Err(Error::validation("Party date cannot be in the past"));
    }
    if request.veg_guests < 0 || request.non_veg_guests < 0 {
        return Err(Error::validation("Guest counts cannot be negative"));
    }
    match request.veg_guests.checked_add(request.non_veg_guests) {
        None => return Err(Error::validation("Guest count is too large")),
        Some(0) => return Err(Error::validation("At least one guest is required")),
        Some(_) => {}
    }
    if request.items.is_empty() {
        return Err(Error::validation("Select at least one food item"));
    }
    if request.items.iter().any(|item| item.quantity <= 0) {
        return Err(Error::validation("Quantities must be greater than zero"));
    }
    let distinct: HashSet<i64> = request.items.iter().map(|i| i.food_item_id).collect();
    if distinct.len() != request.items.len() {
        return Err(Error::validation("Each food item can only be requested once"));
    }
    Ok(location.to_string())
}

/// Submits a quote request for `customer_id`.
///
/// The quote and its lines are written in one transaction. New requests
/// start with `order_status = pending_confirmation` and no chef.
///
/// # Errors
/// Returns an error if:
/// - A field is missing or out of range
/// - The profile is not a customer
/// - A requested food item does not exist or is unavailable
/// - The database writes fail
pub async fn create_quote_request(
    db: &DatabaseConnection,
    customer_id: i64,
    request: NewQuoteRequest,
) -> Result<QuoteDetails> {
    let location = validate_request(&request, Utc::now().date_naive())?;

    let txn = db.begin().await?;
    require_profile_role(&txn, customer_id, UserRole::Customer).await?;

    let requested: Vec<i64> = request.items.iter().map(|i| i.food_item_id).collect();
    let available = FoodItem::find()
        .filter(food_item::Column::Id.is_in(requested.clone()))
        .filter(food_item::Column::IsAvailable.eq(true))
        .count(&txn)
        .await?;
    if available != requested.len() as u64 {
        return Err(Error::validation(
            "Some requested items are no longer available",
        ));
    }

    let quote = quote::ActiveModel {
        customer_id: Set(customer_id),
        chef_id: Set(None),
        party_date: Set(request.party_date),
        party_location: Set(location),
        veg_guests: Set(request.veg_guests),
        non_veg_guests: Set(request.non_veg_guests),
        is_confirmed: Set(false),
        order_status: Set(Some(OrderStatus::PendingConfirmation)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for item in &request.items {
        quote_item::ActiveModel {
            quote_id: Set(quote.id),
            food_item_id: Set(item.food_item_id),
            quantity: Set(item.quantity),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    info!(
        "Customer {} requested quote {} for {} with {} items",
        customer_id,
        quote.id,
        quote.party_date,
        request.items.len()
    );
    load_quote(db, quote.id).await
}

/// Lists a customer's quotes, newest first.
///
/// Only chef quotes visible to the customer are included.
pub async fn list_customer_orders(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Vec<QuoteDetails>> {
    let quotes = Quote::find()
        .filter(quote::Column::CustomerId.eq(customer_id))
        .order_by_desc(quote::Column::CreatedAt)
        .order_by_desc(quote::Column::Id)
        .all(db)
        .await?;

    let mut orders = load_details(db, quotes).await?;
    for order in &mut orders {
        order
            .chef_quotes
            .retain(|bid| bid.chef_quote.is_visible_to_customer);
    }
    debug!("Customer {} has {} orders", customer_id, orders.len());
    Ok(orders)
}

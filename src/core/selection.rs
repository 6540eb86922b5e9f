//! Customer-side selection and confirmation of chef quotes.
//!
//! A quote moves `Open -> Selected -> Confirmed`. Selecting approves exactly
//! one chef quote; confirming locks the quote to the approved chef and starts
//! the order. Once confirmed, neither bidding nor selection is accepted.

use crate::{
    core::order_status::check_transition,
    entities::{ChefQuote, OrderStatus, Quote, QuoteStatus, chef_quote, quote},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// Where a quote stands in the customer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStage {
    /// No chef quote approved yet
    Open,
    /// One chef quote approved, awaiting confirmation
    Selected,
    /// Locked to a chef
    Confirmed,
}

impl QuoteStage {
    /// Derives the stage from a quote and its chef quotes.
    #[must_use]
    pub fn of(quote: &quote::Model, chef_quotes: &[chef_quote::Model]) -> Self {
        if quote.is_confirmed {
            Self::Confirmed
        } else if chef_quotes
            .iter()
            .any(|cq| cq.quote_id == quote.id && cq.quote_status == QuoteStatus::Approved)
        {
            Self::Selected
        } else {
            Self::Open
        }
    }
}

async fn find_open_quote<C>(db: &C, quote_id: i64) -> Result<quote::Model>
where
    C: ConnectionTrait,
{
    let quote = Quote::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;
    if quote.is_confirmed {
        return Err(Error::QuoteConfirmed { quote_id });
    }
    Ok(quote)
}

/// Approves one chef quote and resets its siblings to `pending`.
///
/// Both writes happen in one transaction, so exactly one chef quote per
/// quote is approved afterwards.
///
/// # Errors
/// Returns an error if:
/// - The quote does not exist or is already confirmed
/// - The chef quote does not belong to the quote
/// - The chef quote is hidden from the customer
pub async fn select_chef_quote(
    db: &DatabaseConnection,
    quote_id: i64,
    chef_quote_id: i64,
) -> Result<chef_quote::Model> {
    let txn = db.begin().await?;
    find_open_quote(&txn, quote_id).await?;

    let chosen = ChefQuote::find_by_id(chef_quote_id)
        .filter(chef_quote::Column::QuoteId.eq(quote_id))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Chef quote", chef_quote_id))?;
    if !chosen.is_visible_to_customer {
        return Err(Error::forbidden("this chef quote is not available"));
    }

    ChefQuote::update_many()
        .set(chef_quote::ActiveModel {
            quote_status: Set(QuoteStatus::Pending),
            ..Default::default()
        })
        .filter(chef_quote::Column::QuoteId.eq(quote_id))
        .exec(&txn)
        .await?;

    let mut chosen: chef_quote::ActiveModel = chosen.into();
    chosen.quote_status = Set(QuoteStatus::Approved);
    let chosen = chosen.update(&txn).await?;
    txn.commit().await?;

    info!(
        "Quote {}: selected chef quote {} from chef {}",
        quote_id, chosen.id, chosen.chef_id
    );
    Ok(chosen)
}

/// Confirms a quote with its approved chef quote.
///
/// Sets `is_confirmed`, stamps `chef_id`, moves the order to `confirmed`
/// and marks the other chef quotes `rejected_by_customer`. The quote row is
/// only written while still unconfirmed, so of two racing confirmations one
/// fails with `QuoteConfirmed`.
///
/// # Errors
/// Returns `NoApprovedQuote` ("Please select a chef quote first") without
/// touching the quote when nothing is approved yet.
pub async fn confirm_quote(db: &DatabaseConnection, quote_id: i64) -> Result<quote::Model> {
    let txn = db.begin().await?;
    let quote = find_open_quote(&txn, quote_id).await?;

    let approved = ChefQuote::find()
        .filter(chef_quote::Column::QuoteId.eq(quote_id))
        .filter(chef_quote::Column::QuoteStatus.eq(QuoteStatus::Approved))
        .one(&txn)
        .await?
        .ok_or(Error::NoApprovedQuote { quote_id })?;
    check_transition(quote.order_status, OrderStatus::Confirmed)?;

    let result = Quote::update_many()
        .set(quote::ActiveModel {
            is_confirmed: Set(true),
            chef_id: Set(Some(approved.chef_id)),
            order_status: Set(Some(OrderStatus::Confirmed)),
            ..Default::default()
        })
        .filter(quote::Column::Id.eq(quote_id))
        .filter(quote::Column::IsConfirmed.eq(false))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::QuoteConfirmed { quote_id });
    }

    ChefQuote::update_many()
        .set(chef_quote::ActiveModel {
            quote_status: Set(QuoteStatus::RejectedByCustomer),
            ..Default::default()
        })
        .filter(chef_quote::Column::QuoteId.eq(quote_id))
        .filter(chef_quote::Column::Id.ne(approved.id))
        .exec(&txn)
        .await?;

    let confirmed = Quote::find_by_id(quote_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;
    txn.commit().await?;

    info!(
        "Quote {} confirmed with chef {} at ${:.2}",
        quote_id, approved.chef_id, approved.price
    );
    Ok(confirmed)
}

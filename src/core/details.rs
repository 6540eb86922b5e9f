//! Expanded quote views.
//!
//! Lists shown to customers, chefs and delivery staff all need a quote with
//! its lines, the requested food, the bids and the customer. Expansion is done
//! with one batched `IN` query per related table and grouped in memory.

use crate::{
    entities::{
        ChefDetails, ChefQuote, FoodItem, Profile, Quote, QuoteItem, QuoteStatus, chef_details,
        chef_quote, food_item, profile, quote, quote_item,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One requested line with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    /// The quote line
    pub item: quote_item::Model,
    /// The requested food
    pub food: food_item::Model,
}

/// One chef's bid with the name customers see.
#[derive(Debug, Clone, PartialEq)]
pub struct ChefBid {
    /// The bid
    pub chef_quote: chef_quote::Model,
    /// Business name, falling back to the chef's full name
    pub chef_name: Option<String>,
}

/// A quote expanded with everything the dashboards display.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDetails {
    /// The quote row
    pub quote: quote::Model,
    /// Requesting customer; `None` if the profile is gone
    pub customer: Option<profile::Model>,
    /// Requested lines, in insertion order
    pub items: Vec<QuoteLine>,
    /// Bids, oldest first
    pub chef_quotes: Vec<ChefBid>,
}

impl QuoteDetails {
    /// The bid `chef_id` placed on this quote, if any.
    #[must_use]
    pub fn bid_from(&self, chef_id: i64) -> Option<&ChefBid> {
        self.chef_quotes
            .iter()
            .find(|bid| bid.chef_quote.chef_id == chef_id)
    }

    /// The approved bid, if the customer selected one.
    #[must_use]
    pub fn approved_bid(&self) -> Option<&ChefBid> {
        self.chef_quotes
            .iter()
            .find(|bid| bid.chef_quote.quote_status == QuoteStatus::Approved)
    }

    /// Ids of every requested food item.
    #[must_use]
    pub fn food_item_ids(&self) -> HashSet<i64> {
        self.items.iter().map(|line| line.item.food_item_id).collect()
    }

    /// Veg plus non-veg guests.
    #[must_use]
    pub fn total_guests(&self) -> i64 {
        i64::from(self.quote.veg_guests) + i64::from(self.quote.non_veg_guests)
    }
}

/// Expands `quotes`, keeping their order.
pub async fn load_details<C>(db: &C, quotes: Vec<quote::Model>) -> Result<Vec<QuoteDetails>>
where
    C: ConnectionTrait,
{
    if quotes.is_empty() {
        return Ok(Vec::new());
    }
    let quote_ids: Vec<i64> = quotes.iter().map(|q| q.id).collect();

    let lines = QuoteItem::find()
        .filter(quote_item::Column::QuoteId.is_in(quote_ids.clone()))
        .order_by_asc(quote_item::Column::Id)
        .find_also_related(FoodItem)
        .all(db)
        .await?;

    let bids = ChefQuote::find()
        .filter(chef_quote::Column::QuoteId.is_in(quote_ids))
        .order_by_asc(chef_quote::Column::CreatedAt)
        .order_by_asc(chef_quote::Column::Id)
        .all(db)
        .await?;

    let chef_ids: HashSet<i64> = bids.iter().map(|b| b.chef_id).collect();
    let profile_ids: HashSet<i64> = quotes
        .iter()
        .map(|q| q.customer_id)
        .chain(chef_ids.iter().copied())
        .collect();

    let profiles: HashMap<i64, profile::Model> = Profile::find()
        .filter(profile::Column::Id.is_in(profile_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let business_names: HashMap<i64, String> = ChefDetails::find()
        .filter(chef_details::Column::ProfileId.is_in(chef_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.profile_id, d.business_name))
        .collect();

    let mut lines_by_quote: HashMap<i64, Vec<QuoteLine>> = HashMap::new();
    for (item, food) in lines {
        if let Some(food) = food {
            lines_by_quote
                .entry(item.quote_id)
                .or_default()
                .push(QuoteLine { item, food });
        }
    }

    let mut bids_by_quote: HashMap<i64, Vec<ChefBid>> = HashMap::new();
    for chef_quote in bids {
        let chef_name = business_names.get(&chef_quote.chef_id).cloned().or_else(|| {
            profiles
                .get(&chef_quote.chef_id)
                .and_then(|p| p.full_name.clone())
        });
        bids_by_quote
            .entry(chef_quote.quote_id)
            .or_default()
            .push(ChefBid {
                chef_quote,
                chef_name,
            });
    }

    let details: Vec<QuoteDetails> = quotes
        .into_iter()
        .map(|quote| QuoteDetails {
            customer: profiles.get(&quote.customer_id).cloned(),
            items: lines_by_quote.remove(&quote.id).unwrap_or_default(),
            chef_quotes: bids_by_quote.remove(&quote.id).unwrap_or_default(),
            quote,
        })
        .collect();
    debug!("Expanded {} quotes", details.len());
    Ok(details)
}

/// Loads one expanded quote.
///
/// # Errors
/// Returns `NotFound` if the quote does not exist.
pub async fn load_quote<C>(db: &C, quote_id: i64) -> Result<QuoteDetails>
where
    C: ConnectionTrait,
{
    let quote = Quote::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;
    load_details(db, vec![quote])
        .await?
        .pop()
        .ok_or_else(|| Error::not_found("Quote", quote_id))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::bidding::submit_chef_quote;
    use crate::test_utils::*;
    use sea_orm::Set;

    #[tokio::test]
    async fn test_load_details_expands_relations() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "cust@example.com").await?;
        let chef = create_test_chef(&db, "chef@example.com").await?;
        let samosa = create_test_food_item(&db, "Samosa").await?;
        let kulfi = create_test_food_item(&db, "Kulfi").await?;
        add_test_menu_item(&db, chef.id, samosa.id).await?;

        let created =
            create_test_quote(&db, customer.id, &[(samosa.id, 3), (kulfi.id, 1)]).await?;
        submit_chef_quote(&db, created.quote.id, chef.id, 99.5).await?;

        let details = load_quote(&db, created.quote.id).await?;
        assert_eq!(details.customer.as_ref().unwrap().id, customer.id);
        let names: Vec<_> = details.items.iter().map(|l| l.food.name.as_str()).collect();
        assert_eq!(names, vec!["Samosa", "Kulfi"]);
        assert_eq!(details.food_item_ids(), HashSet::from([samosa.id, kulfi.id]));
        assert_eq!(details.total_guests(), 2);

        let bid = details.bid_from(chef.id).unwrap();
        assert_eq!(bid.chef_name.as_deref(), Some("Test Kitchen"));
        assert!(details.approved_bid().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_total_guests_does_not_overflow() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "cust@example.com").await?;
        let samosa = create_test_food_item(&db, "Samosa").await?;
        let created = create_test_quote(&db, customer.id, &[(samosa.id, 3)]).await?;

        Quote::update_many()
            .set(quote::ActiveModel {
                veg_guests: Set(i32::MAX),
                non_veg_guests: Set(i32::MAX),
                ..Default::default()
            })
            .filter(quote::Column::Id.eq(created.quote.id))
            .exec(&db)
            .await?;

        let details = load_quote(&db, created.quote.id).await?;
        assert_eq!(details.total_guests(), 2 * i64::from(i32::MAX));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_details_empty_and_missing() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(load_details(&db, Vec::new()).await?.is_empty());
        assert!(matches!(
            load_quote(&db, 7).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }
}

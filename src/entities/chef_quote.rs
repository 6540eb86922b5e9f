//! Chef quote entity - one chef's price for one quote request.
//!
//! At most one row exists per (quote, chef) pair and at most one row per
//! quote is `approved`. Both rules are enforced by `core::bidding` and
//! `core::selection`.

use super::QuoteStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chef quote database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chef_quotes")]
pub struct Model {
    /// Unique identifier for the chef quote
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Quote request being priced
    pub quote_id: i64,
    /// Profile id of the bidding chef
    pub chef_id: i64,
    /// Total price in dollars
    pub price: f64,
    /// Selection status
    pub quote_status: QuoteStatus,
    /// Hidden quotes cannot be selected by the customer
    pub is_visible_to_customer: bool,
    /// When the bid was submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `ChefQuote` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bid belongs to one quote
    #[sea_orm(
        belongs_to = "super::quote::Entity",
        from = "Column::QuoteId",
        to = "super::quote::Column::Id",
        on_delete = "Cascade"
    )]
    Quote,
    /// Each bid comes from one chef
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ChefId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Chef,
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chef.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

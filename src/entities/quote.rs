//! Quote entity - a customer's catering request, later the order itself.
//!
//! A quote starts open, gets a chef quote approved by the customer, and is
//! then confirmed. After confirmation `order_status` tracks fulfilment.

use super::OrderStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    /// Unique identifier for the quote
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile id of the requesting customer
    pub customer_id: i64,
    /// Chef stamped at confirmation
    pub chef_id: Option<i64>,
    /// Day of the party
    pub party_date: Date,
    /// Where the food is delivered
    pub party_location: String,
    /// Number of vegetarian guests
    pub veg_guests: i32,
    /// Number of non-vegetarian guests
    pub non_veg_guests: i32,
    /// Set once the customer confirms an approved chef quote
    pub is_confirmed: bool,
    /// Fulfilment status
    pub order_status: Option<OrderStatus>,
    /// When the request was submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Quote and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Requesting customer
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::CustomerId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
    /// Confirmed chef
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ChefId",
        to = "super::profile::Column::Id",
        on_delete = "SetNull"
    )]
    Chef,
    /// Requested line items
    #[sea_orm(has_many = "super::quote_item::Entity")]
    QuoteItems,
    /// Bids submitted by chefs
    #[sea_orm(has_many = "super::chef_quote::Entity")]
    ChefQuotes,
}

impl Related<super::quote_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteItems.def()
    }
}

impl Related<super::chef_quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChefQuotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

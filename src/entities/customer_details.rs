//! Customer details entity - columns that only make sense for customers.
//!
//! The customer list itself is always read from `profiles` with a role
//! filter; this table never acts as a second customer registry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer details database model, keyed by the customer's profile id
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_details")]
pub struct Model {
    /// Profile id of the customer
    #[sea_orm(primary_key, auto_increment = false)]
    pub profile_id: i64,
    /// Default delivery address
    pub address: Option<String>,
}

/// Defines relationships between `CustomerDetails` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning profile
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

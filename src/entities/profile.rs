//! Profile entity - identity record driving every visibility rule.
//!
//! The profile id equals the identity id issued at registration. Customers,
//! chefs, admins and delivery staff all live in this one table and are told
//! apart by `role`.

use super::UserRole;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Identity id (not auto-generated)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Normalized (trimmed, lowercase) email
    #[sea_orm(unique)]
    pub email: String,
    /// Display name
    pub full_name: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Role fixed at creation
    pub role: UserRole,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Profile and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Chef-only columns
    #[sea_orm(has_one = "super::chef_details::Entity")]
    ChefDetails,
    /// Customer-only columns
    #[sea_orm(has_one = "super::customer_details::Entity")]
    CustomerDetails,
    /// Menu items offered by a chef
    #[sea_orm(has_many = "super::chef_menu_item::Entity")]
    ChefMenuItems,
}

impl Related<super::chef_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChefDetails.def()
    }
}

impl Related<super::customer_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerDetails.def()
    }
}

impl Related<super::chef_menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChefMenuItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

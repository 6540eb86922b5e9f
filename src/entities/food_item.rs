//! Food item entity - catalog entry curated by the admin.
//!
//! Chefs attach food items to their menus and customers request them as
//! quote line items.

use super::{CourseType, DietaryPreference};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Food item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    /// Unique identifier for the food item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Dish name (e.g., "Paneer Tikka")
    pub name: String,
    /// Optional description shown on the menu
    pub description: Option<String>,
    /// Vegetarian or non-vegetarian
    pub dietary_preference: DietaryPreference,
    /// Starter, mains or desserts
    pub course_type: CourseType,
    /// Optional image location
    pub image_url: Option<String>,
    /// Only available items are offered to customers
    pub is_available: bool,
    /// When the item was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `FoodItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Chefs offering this item
    #[sea_orm(has_many = "super::chef_menu_item::Entity")]
    ChefMenuItems,
    /// Quote lines requesting this item
    #[sea_orm(has_many = "super::quote_item::Entity")]
    QuoteItems,
}

impl Related<super::chef_menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChefMenuItems.def()
    }
}

impl Related<super::quote_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Chef menu item entity - a food item a chef can be quoted against.

use super::RecipeVisibility;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chef menu item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chef_menu_items")]
pub struct Model {
    /// Unique identifier for the menu item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile id of the chef
    pub chef_id: i64,
    /// Catalog entry being offered
    pub food_item_id: i64,
    /// Chef's ingredient variations
    pub custom_ingredients: Option<String>,
    /// Chef's preparation notes
    pub recipe_notes: Option<String>,
    /// Public or private recipe
    pub visibility: RecipeVisibility,
    /// Only active items count towards quote visibility
    pub is_active: bool,
    /// When the item was added to the menu
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `ChefMenuItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu item belongs to one chef
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ChefId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Chef,
    /// Each menu item references one catalog entry
    #[sea_orm(
        belongs_to = "super::food_item::Entity",
        from = "Column::FoodItemId",
        to = "super::food_item::Column::Id",
        on_delete = "Cascade"
    )]
    FoodItem,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chef.def()
    }
}

impl Related<super::food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

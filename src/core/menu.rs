//! Chef menu business logic.
//!
//! A chef's active menu items decide which quote requests the chef gets to
//! see and bid on (see [`crate::core::bidding`]).

use crate::{
    core::accounts::require_profile_role,
    entities::{
        ChefMenuItem, FoodItem, RecipeVisibility, UserRole, chef_menu_item, food_item,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// Optional chef-specific details attached to a menu item.
#[derive(Debug, Clone)]
pub struct MenuItemOptions {
    /// Ingredient variations
    pub custom_ingredients: Option<String>,
    /// Preparation notes
    pub recipe_notes: Option<String>,
    /// Recipe visibility
    pub visibility: RecipeVisibility,
}

impl Default for MenuItemOptions {
    fn default() -> Self {
        Self {
            custom_ingredients: None,
            recipe_notes: None,
            visibility: RecipeVisibility::Private,
        }
    }
}

/// A menu item together with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// The menu row
    pub menu_item: chef_menu_item::Model,
    /// The catalog entry it offers
    pub food: food_item::Model,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Adds a catalog entry to a chef's menu.
///
/// # Errors
/// Returns an error if:
/// - The profile is not a chef
/// - The food item does not exist
/// - The chef already offers this food item
/// - The database insert fails
pub async fn add_menu_item(
    db: &DatabaseConnection,
    chef_id: i64,
    food_item_id: i64,
    options: MenuItemOptions,
) -> Result<chef_menu_item::Model> {
    require_profile_role(db, chef_id, UserRole::Chef).await?;

    if FoodItem::find_by_id(food_item_id).one(db).await?.is_none() {
        return Err(Error::not_found("Food item", food_item_id));
    }

    let existing = ChefMenuItem::find()
        .filter(chef_menu_item::Column::ChefId.eq(chef_id))
        .filter(chef_menu_item::Column::FoodItemId.eq(food_item_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Duplicate {
            message: "This food item is already on your menu".to_string(),
        });
    }

    let item = chef_menu_item::ActiveModel {
        chef_id: Set(chef_id),
        food_item_id: Set(food_item_id),
        custom_ingredients: Set(blank_to_none(options.custom_ingredients)),
        recipe_notes: Set(blank_to_none(options.recipe_notes)),
        visibility: Set(options.visibility),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let item = item.insert(db).await?;
    info!(
        "Chef {} added food item {} to their menu (menu item {})",
        chef_id, food_item_id, item.id
    );
    Ok(item)
}

async fn find_owned_menu_item(
    db: &DatabaseConnection,
    chef_id: i64,
    menu_item_id: i64,
) -> Result<chef_menu_item::Model> {
    ChefMenuItem::find_by_id(menu_item_id)
        .filter(chef_menu_item::Column::ChefId.eq(chef_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Menu item", menu_item_id))
}

/// Removes an item from a chef's menu.
pub async fn remove_menu_item(
    db: &DatabaseConnection,
    chef_id: i64,
    menu_item_id: i64,
) -> Result<()> {
    let item = find_owned_menu_item(db, chef_id, menu_item_id).await?;
    item.delete(db).await?;
    info!("Chef {} removed menu item {}", chef_id, menu_item_id);
    Ok(())
}

/// Activates or deactivates a menu item without removing it.
pub async fn set_menu_item_active(
    db: &DatabaseConnection,
    chef_id: i64,
    menu_item_id: i64,
    is_active: bool,
) -> Result<chef_menu_item::Model> {
    let mut item: chef_menu_item::ActiveModel =
        find_owned_menu_item(db, chef_id, menu_item_id).await?.into();
    item.is_active = Set(is_active);
    let item = item.update(db).await?;
    info!(
        "Chef {} set menu item {} active={}",
        chef_id, menu_item_id, is_active
    );
    Ok(item)
}

/// Lists a chef's menu with catalog details, oldest first.
pub async fn list_chef_menu(db: &DatabaseConnection, chef_id: i64) -> Result<Vec<MenuEntry>> {
    let rows = ChefMenuItem::find()
        .filter(chef_menu_item::Column::ChefId.eq(chef_id))
        .order_by_asc(chef_menu_item::Column::CreatedAt)
        .order_by_asc(chef_menu_item::Column::Id)
        .find_also_related(FoodItem)
        .all(db)
        .await?;

    let entries: Vec<MenuEntry> = rows
        .into_iter()
        .filter_map(|(menu_item, food)| food.map(|food| MenuEntry { menu_item, food }))
        .collect();
    debug!("Chef {} has {} menu entries", chef_id, entries.len());
    Ok(entries)
}

/// Returns the ids of the food items on the chef's active menu.
pub async fn active_food_item_ids<C>(db: &C, chef_id: i64) -> Result<HashSet<i64>>
where
    C: ConnectionTrait,
{
    let ids: Vec<i64> = ChefMenuItem::find()
        .select_only()
        .column(chef_menu_item::Column::FoodItemId)
        .filter(chef_menu_item::Column::ChefId.eq(chef_id))
        .filter(chef_menu_item::Column::IsActive.eq(true))
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

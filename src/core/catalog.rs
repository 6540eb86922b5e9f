//! Food catalog business logic - admin-curated food items.
//!
//! The catalog is the shared vocabulary of the platform: chefs attach catalog
//! entries to their menus and customers request them in quotes. Only items
//! flagged `is_available` are offered to customers.

use crate::{
    entities::{CourseType, DietaryPreference, FoodItem, food_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use tracing::{debug, info};

/// Input for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct NewFoodItem {
    /// Dish name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Vegetarian or non-vegetarian
    pub dietary_preference: DietaryPreference,
    /// Course the dish belongs to
    pub course_type: CourseType,
    /// Optional image location
    pub image_url: Option<String>,
    /// Whether customers can request it right away
    pub is_available: bool,
}

/// Optional filters for listing the catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodFilter {
    /// Only items with `is_available = true`
    pub only_available: bool,
    /// Restrict to one course
    pub course_type: Option<CourseType>,
    /// Restrict to one dietary preference
    pub dietary_preference: Option<DietaryPreference>,
}

impl FoodFilter {
    /// Filter used by the customer-facing menu.
    #[must_use]
    pub const fn available() -> Self {
        Self {
            only_available: true,
            course_type: None,
            dietary_preference: None,
        }
    }
}

fn normalized_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Food item name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Creates a new catalog entry after validating its name.
///
/// # Errors
/// Returns an error if the name is empty or whitespace-only, or if the insert fails.
pub async fn create_food_item(
    db: &DatabaseConnection,
    input: NewFoodItem,
) -> Result<food_item::Model> {
    let name = normalized_name(&input.name)?;

    let item = food_item::ActiveModel {
        name: Set(name),
        description: Set(input.description),
        dietary_preference: Set(input.dietary_preference),
        course_type: Set(input.course_type),
        image_url: Set(input.image_url),
        is_available: Set(input.is_available),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let item = item.insert(db).await?;
    info!("Created food item '{}' (ID: {})", item.name, item.id);
    Ok(item)
}

/// Retrieves a catalog entry by id.
pub async fn get_food_item(
    db: &DatabaseConnection,
    food_item_id: i64,
) -> Result<Option<food_item::Model>> {
    FoodItem::find_by_id(food_item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a catalog entry by exact name.
pub async fn get_food_item_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<food_item::Model>> {
    FoodItem::find()
        .filter(food_item::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists catalog entries matching `filter`, ordered alphabetically by name.
pub async fn list_food_items(
    db: &DatabaseConnection,
    filter: FoodFilter,
) -> Result<Vec<food_item::Model>> {
    let mut query = FoodItem::find();
    if filter.only_available {
        query = query.filter(food_item::Column::IsAvailable.eq(true));
    }
    if let Some(course_type) = filter.course_type {
        query = query.filter(food_item::Column::CourseType.eq(course_type));
    }
    if let Some(dietary_preference) = filter.dietary_preference {
        query = query.filter(food_item::Column::DietaryPreference.eq(dietary_preference));
    }
    let items = query.order_by_asc(food_item::Column::Name).all(db).await?;
    debug!("Fetched {} food items with {:?}", items.len(), filter);
    Ok(items)
}

/// Replaces the descriptive fields of a catalog entry.
///
/// # Errors
/// Returns an error if the name is empty, the item does not exist, or the update fails.
pub async fn update_food_item(
    db: &DatabaseConnection,
    food_item_id: i64,
    input: NewFoodItem,
) -> Result<food_item::Model> {
    let name = normalized_name(&input.name)?;

    let mut item: food_item::ActiveModel = FoodItem::find_by_id(food_item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Food item", food_item_id))?
        .into();

    item.name = Set(name);
    item.description = Set(input.description);
    item.dietary_preference = Set(input.dietary_preference);
    item.course_type = Set(input.course_type);
    item.image_url = Set(input.image_url);
    item.is_available = Set(input.is_available);

    let item = item.update(db).await?;
    info!("Updated food item {}", item.id);
    Ok(item)
}

/// Marks a catalog entry as available or unavailable to customers.
pub async fn set_food_item_availability(
    db: &DatabaseConnection,
    food_item_id: i64,
    is_available: bool,
) -> Result<food_item::Model> {
    let mut item: food_item::ActiveModel = FoodItem::find_by_id(food_item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Food item", food_item_id))?
        .into();
    item.is_available = Set(is_available);
    let item = item.update(db).await?;
    info!(
        "Food item {} is now {}",
        item.id,
        if is_available { "available" } else { "unavailable" }
    );
    Ok(item)
}

/// Deletes a catalog entry. Chef menu entries pointing at it are removed with it.
///
/// # Errors
/// Returns `NotFound` if no such item exists, and `Validation` for items
/// already requested in a quote. Those should be marked unavailable instead.
pub async fn delete_food_item(db: &DatabaseConnection, food_item_id: i64) -> Result<()> {
    let result = FoodItem::delete_by_id(food_item_id)
        .exec(db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Error::validation(
                "This food item is part of a quote request; mark it unavailable instead",
            ),
            _ => Error::Database(e),
        })?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Food item", food_item_id));
    }
    info!("Deleted food item {}", food_item_id);
    Ok(())
}

//! Catalog and admin seeding from config.toml
//!
//! The seed file lists the food items the catalog should start with and,
//! optionally, the admin account to provision. The admin password is read
//! from the `ADMIN_PASSWORD` environment variable and never from the file.

use crate::{
    auth::IdentityProvider,
    core::{
        accounts::{NewAccount, RoleDetails, register_account},
        catalog::{NewFoodItem, create_food_item, get_food_item_by_name},
    },
    entities::{CourseType, DietaryPreference, Profile, UserRole, profile},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default seed file location
pub const DEFAULT_SEED_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Food items the catalog starts with
    #[serde(default)]
    pub food_items: Vec<FoodItemConfig>,
    /// Admin account to provision
    pub admin: Option<AdminConfig>,
}

/// Configuration for a single food item
#[derive(Debug, Deserialize, Clone)]
pub struct FoodItemConfig {
    /// Dish name, unique within the seed
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// `vegetarian` or `non-vegetarian`
    pub dietary_preference: DietaryPreference,
    /// `starter`, `mains` or `desserts`
    pub course_type: CourseType,
    /// Whether customers can request it
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Optional image location
    pub image_url: Option<String>,
}

const fn default_available() -> bool {
    true
}

/// The admin account provisioned at startup
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Admin email
    pub email: String,
    /// Admin display name
    pub full_name: String,
}

/// Loads the seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or an enum value is unknown
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Inserts the configured food items whose names are not in the catalog yet.
///
/// Returns the number of items created.
pub async fn seed_catalog(db: &DatabaseConnection, config: &SeedConfig) -> Result<usize> {
    let mut created = 0;
    for item in &config.food_items {
        if get_food_item_by_name(db, &item.name).await?.is_some() {
            debug!("Food item '{}' already present, skipping", item.name);
            continue;
        }
        create_food_item(
            db,
            NewFoodItem {
                name: item.name.clone(),
                description: item.description.clone(),
                dietary_preference: item.dietary_preference,
                course_type: item.course_type,
                image_url: item.image_url.clone(),
                is_available: item.is_available,
            },
        )
        .await?;
        created += 1;
    }
    info!("Seeded {} of {} configured food items", created, config.food_items.len());
    Ok(created)
}

/// Provisions the configured admin account once.
///
/// Returns `None` when no admin is configured or the admin already exists.
///
/// # Errors
/// Returns `Config` if an admin is configured but no password is supplied.
pub async fn seed_admin<P>(
    db: &DatabaseConnection,
    provider: &P,
    config: &SeedConfig,
    password: Option<String>,
) -> Result<Option<profile::Model>>
where
    P: IdentityProvider,
{
    let Some(admin) = &config.admin else {
        return Ok(None);
    };

    let email = crate::auth::normalize_email(&admin.email);
    let existing = Profile::find()
        .filter(profile::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        debug!("Admin {} already provisioned", email);
        return Ok(None);
    }

    let password = password.ok_or_else(|| Error::Config {
        message: "ADMIN_PASSWORD must be set to provision the admin account".to_string(),
    })?;
    let profile = register_account(
        db,
        provider,
        NewAccount {
            email,
            password,
            full_name: admin.full_name.clone(),
            phone: None,
            role: UserRole::Admin,
            details: RoleDetails::None,
        },
    )
    .await?;
    info!("Provisioned admin account {}", profile.email);
    Ok(Some(profile))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::auth::LocalIdentityProvider;
    use crate::core::catalog::{FoodFilter, list_food_items};
    use crate::test_utils::setup_test_db;

    const SEED: &str = r#"
        [[food_items]]
        name = "Paneer Tikka"
        dietary_preference = "vegetarian"
        course_type = "starter"

        [[food_items]]
        name = "Chicken Curry"
        description = "Slow-cooked"
        dietary_preference = "non-vegetarian"
        course_type = "mains"
        is_available = false

        [admin]
        email = "Admin@Example.com"
        full_name = "Site Admin"
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config: SeedConfig = toml::from_str(SEED).unwrap();
        assert_eq!(config.food_items.len(), 2);
        assert!(config.food_items[0].is_available);
        assert_eq!(
            config.food_items[1].dietary_preference,
            DietaryPreference::NonVegetarian
        );
        assert!(!config.food_items[1].is_available);
        assert_eq!(config.admin.unwrap().full_name, "Site Admin");
    }

    #[test]
    fn test_unknown_course_is_rejected() {
        let bad = r#"
            [[food_items]]
            name = "Soup"
            dietary_preference = "vegetarian"
            course_type = "soup"
        "#;
        assert!(toml::from_str::<SeedConfig>(bad).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        assert_eq!(seed_catalog(&db, &config).await?, 2);
        assert_eq!(seed_catalog(&db, &config).await?, 0);

        let available = list_food_items(&db, FoodFilter::available()).await?;
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Paneer Tikka");
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_admin_once() -> Result<()> {
        let db = setup_test_db().await?;
        let provider = LocalIdentityProvider::new(db.clone());
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        let missing = seed_admin(&db, &provider, &config, None).await;
        assert!(matches!(missing.unwrap_err(), Error::Config { .. }));

        let admin = seed_admin(&db, &provider, &config, Some("hunter22".to_string()))
            .await?
            .unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.role, UserRole::Admin);

        let again = seed_admin(&db, &provider, &config, Some("hunter22".to_string())).await?;
        assert!(again.is_none());
        Ok(())
    }
}

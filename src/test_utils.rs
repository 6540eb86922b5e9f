//! Shared test utilities for Party Kitchen.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test profiles, food items and quotes with sensible defaults.

use crate::{
    core::{
        bidding::submit_chef_quote,
        catalog::{NewFoodItem, create_food_item},
        details::QuoteDetails,
        menu::{MenuItemOptions, add_menu_item},
        quote_request::{NewQuoteRequest, RequestedItem, create_quote_request},
        selection::{confirm_quote, select_chef_quote},
    },
    entities::{
        CourseType, DietaryPreference, UserRole, chef_details, chef_menu_item, customer_details,
        food_item, profile,
    },
    errors::Result,
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing_subscriber::EnvFilter;

// Fixture profiles have no identity behind them, so they take ids well
// above anything the accounts table hands out in a test.
static NEXT_PROFILE_ID: AtomicI64 = AtomicI64::new(10_000);

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Creates a profile with the given role, plus its details row.
///
/// # Defaults
/// * `full_name`: the part of the email before `@`
/// * chefs: business name "Test Kitchen", active
/// * customers: no address
pub async fn create_test_profile(
    db: &DatabaseConnection,
    email: &str,
    role: UserRole,
) -> Result<profile::Model> {
    let id = NEXT_PROFILE_ID.fetch_add(1, Ordering::Relaxed);
    let name = email.split('@').next().unwrap_or(email).to_string();

    let profile = profile::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        full_name: Set(Some(name)),
        phone: Set(None),
        role: Set(role),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    match role {
        UserRole::Chef => {
            chef_details::ActiveModel {
                profile_id: Set(id),
                business_name: Set("Test Kitchen".to_string()),
                speciality: Set(None),
                experience_years: Set(Some(5)),
                is_active: Set(true),
            }
            .insert(db)
            .await?;
        }
        UserRole::Customer => {
            customer_details::ActiveModel {
                profile_id: Set(id),
                address: Set(None),
            }
            .insert(db)
            .await?;
        }
        UserRole::Admin | UserRole::Delivery => {}
    }
    Ok(profile)
}

/// Creates a chef profile.
pub async fn create_test_chef(db: &DatabaseConnection, email: &str) -> Result<profile::Model> {
    create_test_profile(db, email, UserRole::Chef).await
}

/// Creates a customer profile.
pub async fn create_test_customer(db: &DatabaseConnection, email: &str) -> Result<profile::Model> {
    create_test_profile(db, email, UserRole::Customer).await
}

/// Creates a delivery staff profile.
pub async fn create_test_delivery(db: &DatabaseConnection, email: &str) -> Result<profile::Model> {
    create_test_profile(db, email, UserRole::Delivery).await
}

/// Creates an available vegetarian main course.
pub async fn create_test_food_item(
    db: &DatabaseConnection,
    name: &str,
) -> Result<food_item::Model> {
    create_custom_food_item(db, name, DietaryPreference::Vegetarian, CourseType::Mains).await
}

/// Creates an available food item with custom classification.
pub async fn create_custom_food_item(
    db: &DatabaseConnection,
    name: &str,
    dietary_preference: DietaryPreference,
    course_type: CourseType,
) -> Result<food_item::Model> {
    create_food_item(
        db,
        NewFoodItem {
            name: name.to_string(),
            description: None,
            dietary_preference,
            course_type,
            image_url: None,
            is_available: true,
        },
    )
    .await
}

/// Puts a food item on a chef's active menu with default options.
pub async fn add_test_menu_item(
    db: &DatabaseConnection,
    chef_id: i64,
    food_item_id: i64,
) -> Result<chef_menu_item::Model> {
    add_menu_item(db, chef_id, food_item_id, MenuItemOptions::default()).await
}

/// Creates a quote request for next week.
///
/// # Defaults
/// * `veg_guests`: 2, `non_veg_guests`: 0
/// * `party_location`: "1 Party Lane"
pub async fn create_test_quote(
    db: &DatabaseConnection,
    customer_id: i64,
    items: &[(i64, i32)],
) -> Result<QuoteDetails> {
    create_quote_request(
        db,
        customer_id,
        NewQuoteRequest {
            party_date: Utc::now().date_naive() + Duration::days(7),
            party_location: "1 Party Lane".to_string(),
            veg_guests: 2,
            non_veg_guests: 0,
            items: items
                .iter()
                .map(|&(food_item_id, quantity)| RequestedItem {
                    food_item_id,
                    quantity,
                })
                .collect(),
        },
    )
    .await
}

/// A quote confirmed with a single chef, ready for fulfilment.
pub struct ConfirmedOrder {
    /// The ordering customer
    pub customer: profile::Model,
    /// The confirmed chef
    pub chef: profile::Model,
    /// The quote as created (before confirmation)
    pub quote: QuoteDetails,
}

/// Sets up a customer, a chef, one food item and a confirmed quote.
pub async fn create_confirmed_order(db: &DatabaseConnection) -> Result<ConfirmedOrder> {
    let customer = create_test_customer(db, "orderer@example.com").await?;
    let chef = create_test_chef(db, "cook@example.com").await?;
    let food = create_test_food_item(db, "Veg Biryani").await?;
    add_test_menu_item(db, chef.id, food.id).await?;

    let quote = create_test_quote(db, customer.id, &[(food.id, 3)]).await?;
    let bid = submit_chef_quote(db, quote.quote.id, chef.id, 120.0).await?;
    select_chef_quote(db, quote.quote.id, bid.id).await?;
    confirm_quote(db, quote.quote.id).await?;

    Ok(ConfirmedOrder {
        customer,
        chef,
        quote,
    })
}

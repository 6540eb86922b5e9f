//! Closed enumerations persisted by the data model.
//!
//! The string values are the wire/storage representation and must stay
//! bit-exact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to every profile, fixed at registration.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Curates food items and staff
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Submits price quotes for requests matching their menu
    #[sea_orm(string_value = "chef")]
    Chef,
    /// Requests catered menus
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Moves confirmed orders through delivery
    #[sea_orm(string_value = "delivery")]
    Delivery,
}

/// Course a food item belongs to.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    /// Starter
    #[sea_orm(string_value = "starter")]
    Starter,
    /// Main course
    #[sea_orm(string_value = "mains")]
    Mains,
    /// Dessert
    #[sea_orm(string_value = "desserts")]
    Desserts,
}

/// Dietary classification of a food item.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum DietaryPreference {
    /// Vegetarian
    #[sea_orm(string_value = "vegetarian")]
    #[serde(rename = "vegetarian")]
    Vegetarian,
    /// Non-vegetarian
    #[sea_orm(string_value = "non-vegetarian")]
    #[serde(rename = "non-vegetarian")]
    NonVegetarian,
}

/// Status of a chef's bid on a quote request.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Submitted, not selected
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Selected by the customer
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Lost to another chef's quote at confirmation
    #[sea_orm(string_value = "rejected_by_customer")]
    RejectedByCustomer,
}

/// Fulfilment status of a quote once it becomes an order.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Request submitted, waiting for the customer to confirm a chef
    #[sea_orm(string_value = "pending_confirmation")]
    PendingConfirmation,
    /// Customer confirmed a chef quote
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Chef is preparing the order
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Waiting for pickup by delivery staff
    #[sea_orm(string_value = "ready_to_deliver")]
    ReadyToDeliver,
    /// Out for delivery
    #[sea_orm(string_value = "on_the_way")]
    OnTheWay,
    /// Dropped off
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Receipt acknowledged by the customer
    #[sea_orm(string_value = "received")]
    Received,
}

/// Whether a chef's recipe notes are shown to others.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum RecipeVisibility {
    /// Visible to everyone
    #[sea_orm(string_value = "public")]
    Public,
    /// Visible to the chef only
    #[sea_orm(string_value = "private")]
    Private,
}

macro_rules! display_as_stored {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.to_value())
                }
            }
        )*
    };
}

display_as_stored!(
    UserRole,
    CourseType,
    DietaryPreference,
    QuoteStatus,
    OrderStatus,
    RecipeVisibility,
);

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_stored_values_are_exact() {
        assert_eq!(UserRole::Delivery.to_value(), "delivery");
        assert_eq!(CourseType::Desserts.to_value(), "desserts");
        assert_eq!(DietaryPreference::NonVegetarian.to_value(), "non-vegetarian");
        assert_eq!(
            QuoteStatus::RejectedByCustomer.to_value(),
            "rejected_by_customer"
        );
        assert_eq!(
            OrderStatus::PendingConfirmation.to_value(),
            "pending_confirmation"
        );
        assert_eq!(RecipeVisibility::Private.to_value(), "private");
    }

    #[test]
    fn test_display_matches_stored_value() {
        assert_eq!(OrderStatus::OnTheWay.to_string(), "on_the_way");
        assert_eq!(DietaryPreference::Vegetarian.to_string(), "vegetarian");
        assert_eq!(UserRole::Chef.to_string(), "chef");
    }

    #[test]
    fn test_enum_sets_are_closed() {
        assert_eq!(UserRole::iter().count(), 4);
        assert_eq!(OrderStatus::iter().count(), 7);
        assert_eq!(QuoteStatus::iter().count(), 4);
    }

    #[test]
    fn test_serde_uses_stored_names() {
        #[derive(Deserialize)]
        struct Row {
            diet: DietaryPreference,
            course: CourseType,
        }
        let row: Row = toml::from_str("diet = \"non-vegetarian\"\ncourse = \"mains\"").unwrap();
        assert_eq!(row.diet, DietaryPreference::NonVegetarian);
        assert_eq!(row.course, CourseType::Mains);
    }
}

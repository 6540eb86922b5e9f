//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod chef_details;
pub mod chef_menu_item;
pub mod chef_quote;
pub mod customer_details;
pub mod enums;
pub mod food_item;
pub mod profile;
pub mod quote;
pub mod quote_item;

pub use enums::{
    CourseType, DietaryPreference, OrderStatus, QuoteStatus, RecipeVisibility, UserRole,
};

// Re-export specific types to avoid conflicts
pub use account::{Entity as Account, Model as AccountModel};
pub use chef_details::{Entity as ChefDetails, Model as ChefDetailsModel};
pub use chef_menu_item::{Entity as ChefMenuItem, Model as ChefMenuItemModel};
pub use chef_quote::{Entity as ChefQuote, Model as ChefQuoteModel};
pub use customer_details::{Entity as CustomerDetails, Model as CustomerDetailsModel};
pub use food_item::{Entity as FoodItem, Model as FoodItemModel};
pub use profile::{Entity as Profile, Model as ProfileModel};
pub use quote::{Entity as Quote, Model as QuoteModel};
pub use quote_item::{Entity as QuoteItem, Model as QuoteItemModel};

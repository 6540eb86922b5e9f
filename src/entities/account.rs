//! Account entity - credentials held by the local identity provider.
//!
//! Accounts are deliberately not linked to `profiles` by a foreign key: the
//! two can drift apart, and the session manager detects that case.

use super::UserRole;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Identity id, reused as the profile id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Normalized sign-in email
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role metadata attached at sign-up
    pub role: UserRole,
    /// Name metadata attached at sign-up
    pub full_name: Option<String>,
    /// When the account was registered
    pub created_at: DateTimeUtc,
}

/// Accounts have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

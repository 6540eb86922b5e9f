//! Chef details entity - columns that only make sense for chef profiles.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chef details database model, keyed by the chef's profile id
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chef_details")]
pub struct Model {
    /// Profile id of the chef
    #[sea_orm(primary_key, auto_increment = false)]
    pub profile_id: i64,
    /// Trading name shown to customers
    pub business_name: String,
    /// Cuisine speciality
    pub speciality: Option<String>,
    /// Years of professional experience
    pub experience_years: Option<i32>,
    /// Whether the chef currently takes requests
    pub is_active: bool,
}

/// Defines relationships between `ChefDetails` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning profile
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

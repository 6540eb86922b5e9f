//! Profile and account provisioning.
//!
//! Registering an account creates the identity first (through an
//! [`IdentityProvider`]) and then the profile row plus the role-specific
//! details row, all keyed by the identity id. Customer lists are always read
//! from `profiles` with a role filter.

use crate::{
    auth::{Credentials, IdentityMetadata, IdentityProvider, normalize_email},
    entities::{
        ChefDetails, CustomerDetails, Profile, UserRole, chef_details, customer_details, profile,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};

/// Role-specific columns supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDetails {
    /// Admin and delivery profiles carry no extra columns
    None,
    /// Chef business information
    Chef {
        /// Trading name shown to customers
        business_name: String,
        /// Cuisine speciality
        speciality: Option<String>,
        /// Years of experience
        experience_years: Option<i32>,
    },
    /// Customer contact information
    Customer {
        /// Default delivery address
        address: Option<String>,
    },
}

/// Input for [`register_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Email as typed; normalized before use
    pub email: String,
    /// Initial password
    pub password: String,
    /// Display name
    pub full_name: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Role, fixed for the lifetime of the profile
    pub role: UserRole,
    /// Role-specific columns; must match `role`
    pub details: RoleDetails,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name
    pub full_name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
}

/// A customer as shown in the admin customer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    /// The customer's profile
    pub profile: profile::Model,
    /// Customer-only columns, if recorded
    pub details: Option<customer_details::Model>,
}

/// A chef or delivery staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    /// The staff profile
    pub profile: profile::Model,
    /// Present for chefs
    pub chef_details: Option<chef_details::Model>,
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_details(role: UserRole, details: &RoleDetails) -> Result<()> {
    match (role, details) {
        (UserRole::Chef, RoleDetails::Chef { business_name, .. }) => {
            if business_name.trim().is_empty() {
                return Err(Error::validation("Business name is required for chefs"));
            }
            Ok(())
        }
        (UserRole::Chef, _) => Err(Error::validation("Business name is required for chefs")),
        (UserRole::Customer, RoleDetails::Customer { .. } | RoleDetails::None)
        | (UserRole::Admin | UserRole::Delivery, RoleDetails::None) => Ok(()),
        (role, _) => Err(Error::validation(format!(
            "These details do not apply to a {role} account"
        ))),
    }
}

async fn write_details<C>(
    db: &C,
    profile_id: i64,
    role: UserRole,
    details: RoleDetails,
) -> Result<()>
where
    C: ConnectionTrait,
{
    match (role, details) {
        (
            UserRole::Chef,
            RoleDetails::Chef {
                business_name,
                speciality,
                experience_years,
            },
        ) => {
            chef_details::ActiveModel {
                profile_id: Set(profile_id),
                business_name: Set(business_name.trim().to_string()),
                speciality: Set(trimmed_or_none(speciality)),
                experience_years: Set(experience_years),
                is_active: Set(true),
            }
            .insert(db)
            .await?;
        }
        (UserRole::Customer, RoleDetails::Customer { address }) => {
            customer_details::ActiveModel {
                profile_id: Set(profile_id),
                address: Set(trimmed_or_none(address)),
            }
            .insert(db)
            .await?;
        }
        (UserRole::Customer, RoleDetails::None) => {
            customer_details::ActiveModel {
                profile_id: Set(profile_id),
                address: Set(None),
            }
            .insert(db)
            .await?;
        }
        _ => {}
    }
    Ok(())
}

/// Creates an identity, its profile and its role-specific details.
///
/// The profile and details rows are written in one transaction. If that
/// transaction fails the freshly created identity is deleted again.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or the details do not fit the role
/// - A profile with this email already exists
/// - The identity provider rejects the sign-up
/// - The database writes fail
pub async fn register_account<P>(
    db: &DatabaseConnection,
    provider: &P,
    input: NewAccount,
) -> Result<profile::Model>
where
    P: IdentityProvider,
{
    let NewAccount {
        email,
        password,
        full_name,
        phone,
        role,
        details,
    } = input;
    let email = normalize_email(&email);
    let full_name = full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(Error::validation("Full name is required"));
    }
    check_details(role, &details)?;

    let existing = Profile::find()
        .filter(profile::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Duplicate {
            message: "A profile with this email already exists".to_string(),
        });
    }

    let identity_id = provider
        .sign_up(
            &Credentials::new(email.as_str(), password),
            IdentityMetadata {
                role,
                full_name: Some(full_name.clone()),
            },
        )
        .await?
        .id;

    let written = async move {
        let txn = db.begin().await?;
        let profile = profile::ActiveModel {
            id: Set(identity_id),
            email: Set(email),
            full_name: Set(Some(full_name)),
            phone: Set(trimmed_or_none(phone)),
            role: Set(role),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&txn)
        .await?;
        write_details(&txn, profile.id, role, details).await?;
        txn.commit().await?;
        Ok::<_, Error>(profile)
    }
    .await;

    match written {
        Ok(profile) => {
            info!(
                "Registered {} profile {} ({})",
                profile.role, profile.id, profile.email
            );
            Ok(profile)
        }
        Err(e) => {
            warn!(
                "Profile write for identity {} failed, removing identity: {}",
                identity_id, e
            );
            if let Err(cleanup) = provider.delete_identity(identity_id).await {
                warn!("Failed to remove identity {}: {}", identity_id, cleanup);
            }
            Err(e)
        }
    }
}

/// Retrieves a profile by id.
pub async fn get_profile(
    db: &DatabaseConnection,
    profile_id: i64,
) -> Result<Option<profile::Model>> {
    Profile::find_by_id(profile_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a profile and checks its role.
///
/// # Errors
/// Returns `NotFound` if the profile does not exist and `Forbidden` if it
/// has a different role.
pub async fn require_profile_role<C>(
    db: &C,
    profile_id: i64,
    role: UserRole,
) -> Result<profile::Model>
where
    C: ConnectionTrait,
{
    let profile = Profile::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Profile", profile_id))?;
    if profile.role != role {
        return Err(Error::forbidden(format!(
            "profile {profile_id} is not a {role}"
        )));
    }
    Ok(profile)
}

/// Lists customer profiles by name, with their details.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<CustomerRecord>> {
    let rows = Profile::find()
        .filter(profile::Column::Role.eq(UserRole::Customer))
        .order_by_asc(profile::Column::FullName)
        .order_by_asc(profile::Column::Email)
        .find_also_related(CustomerDetails)
        .all(db)
        .await?;
    debug!("Fetched {} customers", rows.len());
    Ok(rows
        .into_iter()
        .map(|(profile, details)| CustomerRecord { profile, details })
        .collect())
}

/// Lists chef or delivery staff by name.
///
/// # Errors
/// Returns `Validation` for roles other than chef and delivery.
pub async fn list_staff(db: &DatabaseConnection, role: UserRole) -> Result<Vec<StaffMember>> {
    if !matches!(role, UserRole::Chef | UserRole::Delivery) {
        return Err(Error::validation(format!("{role} is not a staff role")));
    }
    let rows = Profile::find()
        .filter(profile::Column::Role.eq(role))
        .order_by_asc(profile::Column::FullName)
        .order_by_asc(profile::Column::Email)
        .find_also_related(ChefDetails)
        .all(db)
        .await?;
    debug!("Fetched {} {} staff members", rows.len(), role);
    Ok(rows
        .into_iter()
        .map(|(profile, chef_details)| StaffMember {
            profile,
            chef_details,
        })
        .collect())
}

/// Replaces the editable fields of a profile.
///
/// # Errors
/// Returns `Validation` for a blank name and `NotFound` for an unknown profile.
pub async fn update_profile(
    db: &DatabaseConnection,
    profile_id: i64,
    update: ProfileUpdate,
) -> Result<profile::Model> {
    let full_name = trimmed_or_none(update.full_name);
    if full_name.is_none() {
        return Err(Error::validation("Full name is required"));
    }

    let mut profile: profile::ActiveModel = Profile::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Profile", profile_id))?
        .into();
    profile.full_name = Set(full_name);
    profile.phone = Set(trimmed_or_none(update.phone));
    let profile = profile.update(db).await?;
    info!("Updated profile {}", profile.id);
    Ok(profile)
}

/// Replaces the role-specific columns of a profile.
///
/// # Errors
/// Returns `Validation` when `details` does not fit the profile's role.
pub async fn update_role_details(
    db: &DatabaseConnection,
    profile_id: i64,
    details: RoleDetails,
) -> Result<()> {
    let profile = Profile::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Profile", profile_id))?;
    check_details(profile.role, &details)?;

    let txn = db.begin().await?;
    ChefDetails::delete_by_id(profile_id).exec(&txn).await?;
    CustomerDetails::delete_by_id(profile_id).exec(&txn).await?;
    write_details(&txn, profile_id, profile.role, details).await?;
    txn.commit().await?;

    info!("Updated {} details of profile {}", profile.role, profile_id);
    Ok(())
}

/// Deletes a profile and everything that hangs off it, then its identity.
///
/// Dependent rows (details, menu items, the customer's quotes, the chef's
/// bids) go with the profile; quotes the chef was confirmed on keep their
/// row with `chef_id` cleared. Removing the identity is best-effort.
///
/// # Errors
/// Returns `NotFound` if the profile does not exist.
pub async fn delete_profile<P>(db: &DatabaseConnection, provider: &P, profile_id: i64) -> Result<()>
where
    P: IdentityProvider,
{
    let result = Profile::delete_by_id(profile_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Profile", profile_id));
    }
    info!("Deleted profile {}", profile_id);

    if let Err(e) = provider.delete_identity(profile_id).await {
        warn!("Profile {} deleted but identity removal failed: {}", profile_id, e);
    }
    Ok(())
}

//! Identity provider backed by the `accounts` table.
//!
//! Credentials are stored as argon2 PHC strings. Sessions are opaque uuid
//! tokens kept in memory; the provider remembers which token belongs to this
//! client (`current`) and which tokens are still live for every identity.

use crate::{
    auth::provider::{
        AuthEvent, Credentials, Identity, IdentityMetadata, IdentityProvider, Session,
        SignOutScope, normalize_email,
    },
    entities::{Account, account},
    errors::{Error, Result},
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, instrument};

const MIN_PASSWORD_LEN: usize = 6;
const EVENT_CAPACITY: usize = 16;

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Auth {
            message: format!("Failed to hash password: {e}"),
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn identity_from(account: account::Model) -> Identity {
    Identity {
        id: account.id,
        email: account.email,
        metadata: IdentityMetadata {
            role: account.role,
            full_name: account.full_name,
        },
    }
}

/// In-process identity provider.
pub struct LocalIdentityProvider {
    db: DatabaseConnection,
    current: RwLock<Option<Session>>,
    live_tokens: RwLock<HashMap<String, i64>>,
    events: broadcast::Sender<AuthEvent>,
}

impl LocalIdentityProvider {
    /// Creates a provider storing accounts in `db`.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            db,
            current: RwLock::new(None),
            live_tokens: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Whether `token` still names a live session on any client.
    pub async fn is_token_live(&self, token: &str) -> bool {
        self.live_tokens.read().await.contains_key(token)
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl IdentityProvider for LocalIdentityProvider {
    #[instrument(skip(self, metadata))]
    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: IdentityMetadata,
    ) -> Result<Identity> {
        let email = normalize_email(&credentials.email);
        if !email.contains('@') {
            return Err(Error::validation("A valid email address is required"));
        }
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let existing = Account::find()
            .filter(account::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(Error::Duplicate {
                message: "User already registered".to_string(),
            });
        }

        let account = account::ActiveModel {
            email: Set(email),
            password_hash: Set(hash_password(&credentials.password)?),
            role: Set(metadata.role),
            full_name: Set(metadata.full_name),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        let account = account.insert(&self.db).await?;
        info!("Registered identity {} with role {}", account.id, account.role);
        Ok(identity_from(account))
    }

    #[instrument(skip(self))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let email = normalize_email(&credentials.email);
        let account = Account::find()
            .filter(account::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?
            .filter(|account| verify_password(&credentials.password, &account.password_hash))
            .ok_or_else(|| Error::Auth {
                message: "Invalid login credentials".to_string(),
            })?;

        let session = Session {
            token: uuid::Uuid::new_v4().to_string(),
            identity: identity_from(account),
        };
        self.live_tokens
            .write()
            .await
            .insert(session.token.clone(), session.identity.id);
        *self.current.write().await = Some(session.clone());

        info!("Identity {} signed in", session.identity.id);
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self, scope: SignOutScope) -> Result<()> {
        let Some(session) = self.current.write().await.take() else {
            debug!("Sign-out requested without a current session");
            return Ok(());
        };

        let mut live = self.live_tokens.write().await;
        match scope {
            SignOutScope::Local => {
                live.remove(&session.token);
            }
            SignOutScope::Global => {
                live.retain(|_, identity_id| *identity_id != session.identity.id);
            }
        }
        drop(live);

        info!("Identity {} signed out ({:?})", session.identity.id, scope);
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        let mut current = self.current.write().await;
        let still_live = match current.as_ref() {
            Some(session) => self.is_token_live(&session.token).await,
            None => return Ok(None),
        };
        if still_live {
            Ok(current.clone())
        } else {
            debug!("Dropping revoked session");
            *current = None;
            Ok(None)
        }
    }

    #[instrument(skip(self))]
    async fn delete_identity(&self, identity_id: i64) -> Result<()> {
        let result = Account::delete_by_id(identity_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("Identity", identity_id));
        }

        self.live_tokens
            .write()
            .await
            .retain(|_, id| *id != identity_id);

        let mut current = self.current.write().await;
        if current
            .as_ref()
            .is_some_and(|session| session.identity.id == identity_id)
        {
            *current = None;
            drop(current);
            self.emit(AuthEvent::SignedOut);
        }

        info!("Deleted identity {}", identity_id);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::UserRole;
    use crate::test_utils::setup_test_db;

    fn chef_metadata() -> IdentityMetadata {
        IdentityMetadata {
            role: UserRole::Chef,
            full_name: Some("Gordon".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sign_up_normalizes_and_rejects_duplicates() -> Result<()> {
        let db = setup_test_db().await?;
        let provider = LocalIdentityProvider::new(db);

        let identity = provider
            .sign_up(&Credentials::new("  Chef@Example.COM ", "secret1"), chef_metadata())
            .await?;
        assert_eq!(identity.email, "chef@example.com");
        assert_eq!(identity.metadata.role, UserRole::Chef);

        let dup = provider
            .sign_up(&Credentials::new("chef@example.com", "secret2"), chef_metadata())
            .await;
        assert!(matches!(dup.unwrap_err(), Error::Duplicate { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let provider = LocalIdentityProvider::new(db);

        let short = provider
            .sign_up(&Credentials::new("a@b.c", "123"), chef_metadata())
            .await;
        assert!(matches!(short.unwrap_err(), Error::Validation { .. }));

        let bad_email = provider
            .sign_up(&Credentials::new("nobody", "secret1"), chef_metadata())
            .await;
        assert!(matches!(bad_email.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_in_and_sign_out_emit_events() -> Result<()> {
        let db = setup_test_db().await?;
        let provider = LocalIdentityProvider::new(db);
        let mut events = provider.subscribe();
        provider
            .sign_up(&Credentials::new("chef@example.com", "secret1"), chef_metadata())
            .await?;

        let wrong = provider
            .sign_in(&Credentials::new("chef@example.com", "nope"))
            .await;
        assert!(matches!(wrong.unwrap_err(), Error::Auth { .. }));

        let session = provider
            .sign_in(&Credentials::new("CHEF@example.com", "secret1"))
            .await?;
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn(session.clone()));
        assert_eq!(provider.current_session().await?, Some(session.clone()));

        provider.sign_out(SignOutScope::Local).await?;
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
        assert!(provider.current_session().await?.is_none());
        assert!(!provider.is_token_live(&session.token).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_global_sign_out_revokes_every_session() -> Result<()> {
        let db = setup_test_db().await?;
        let provider = LocalIdentityProvider::new(db);
        provider
            .sign_up(&Credentials::new("chef@example.com", "secret1"), chef_metadata())
            .await?;

        let first = provider
            .sign_in(&Credentials::new("chef@example.com", "secret1"))
            .await?;
        let second = provider
            .sign_in(&Credentials::new("chef@example.com", "secret1"))
            .await?;
        assert!(provider.is_token_live(&first.token).await);

        provider.sign_out(SignOutScope::Global).await?;
        assert!(!provider.is_token_live(&first.token).await);
        assert!(!provider.is_token_live(&second.token).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_identity_ends_current_session() -> Result<()> {
        let db = setup_test_db().await?;
        let provider = LocalIdentityProvider::new(db);
        let identity = provider
            .sign_up(&Credentials::new("chef@example.com", "secret1"), chef_metadata())
            .await?;
        provider
            .sign_in(&Credentials::new("chef@example.com", "secret1"))
            .await?;

        provider.delete_identity(identity.id).await?;
        assert!(provider.current_session().await?.is_none());

        let again = provider
            .sign_in(&Credentials::new("chef@example.com", "secret1"))
            .await;
        assert!(matches!(again.unwrap_err(), Error::Auth { .. }));
        Ok(())
    }
}

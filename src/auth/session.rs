//! Session lifecycle: `Uninitialized -> init -> Ready | SignedOut | Invalid`.
//!
//! Every time a session is (re)established the manager checks that the
//! authenticated identity still has a profile. When it does not, the local
//! session is cleared, the provider signs out locally, and the caller gets
//! [`Error::ProfileMissing`], which reads "Your session has expired".

use crate::{
    auth::provider::{AuthEvent, Credentials, IdentityProvider, Session, SignOutScope},
    entities::{Profile, UserRole, profile},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, instrument, warn};

/// Where the session lifecycle currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// `init` has not run yet
    Uninitialized,
    /// No session is held
    SignedOut,
    /// A session with a valid profile is held
    Ready(profile::Model),
    /// The last session failed validation and was cleared
    Invalid,
}

/// Process-wide session holder.
pub struct SessionManager<P> {
    db: DatabaseConnection,
    provider: P,
    state: RwLock<SessionState>,
}

impl<P: IdentityProvider> SessionManager<P> {
    /// Creates a manager in the `Uninitialized` state.
    #[must_use]
    pub fn new(db: DatabaseConnection, provider: P) -> Self {
        Self {
            db,
            provider,
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    /// The wrapped identity provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Session-change events from the provider.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.provider.subscribe()
    }

    async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Clears the local session after a failed check.
    async fn invalidate(&self) {
        self.set_state(SessionState::Invalid).await;
        if let Err(e) = self.provider.sign_out(SignOutScope::Local).await {
            warn!("Local sign-out after failed session check failed: {}", e);
        }
    }

    async fn validate(&self, session: &Session) -> Result<profile::Model> {
        let identity_id = session.identity.id;
        match Profile::find_by_id(identity_id).one(&self.db).await? {
            Some(profile) => {
                debug!("Session for identity {} is backed by a profile", identity_id);
                self.set_state(SessionState::Ready(profile.clone())).await;
                Ok(profile)
            }
            None => {
                warn!("Identity {} has no profile; ending session", identity_id);
                self.invalidate().await;
                Err(Error::ProfileMissing { identity_id })
            }
        }
    }

    /// Loads the provider's current session and validates it.
    ///
    /// # Errors
    /// Returns `ProfileMissing` if the identity has no profile (the session is
    /// cleared first), or the provider/database error that prevented the check.
    #[instrument(skip(self))]
    pub async fn init(&self) -> Result<SessionState> {
        let session = match self.provider.current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to load session: {}", e);
                self.invalidate().await;
                return Err(e);
            }
        };

        match session {
            Some(session) => {
                self.validate(&session).await?;
            }
            None => self.set_state(SessionState::SignedOut).await,
        }
        let state = self.state().await;
        info!("Session initialized: {:?}", state);
        Ok(state)
    }

    /// Signs in and validates the new session.
    ///
    /// # Errors
    /// Returns the provider's error for bad credentials, or `ProfileMissing`
    /// when the identity has no profile ("User profile not found").
    #[instrument(skip(self))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<profile::Model> {
        let session = self.provider.sign_in(credentials).await?;
        self.validate(&session).await
    }

    /// Signs out and moves to `SignedOut`.
    ///
    /// The local state is cleared even when the provider call fails.
    pub async fn sign_out(&self, scope: SignOutScope) -> Result<()> {
        self.set_state(SessionState::SignedOut).await;
        self.provider.sign_out(scope).await
    }

    /// Applies a session-change event received from [`Self::subscribe`].
    pub async fn handle_event(&self, event: AuthEvent) -> Result<SessionState> {
        match event {
            AuthEvent::SignedIn(session) => {
                self.validate(&session).await?;
            }
            AuthEvent::SignedOut => self.set_state(SessionState::SignedOut).await,
        }
        Ok(self.state().await)
    }

    /// Returns the signed-in profile if it has `role`.
    ///
    /// # Errors
    /// Returns `Auth` when nobody is signed in and `Forbidden` when the
    /// profile has a different role.
    pub async fn require_role(&self, role: UserRole) -> Result<profile::Model> {
        match self.state().await {
            SessionState::Ready(profile) if profile.role == role => Ok(profile),
            SessionState::Ready(_) => Err(Error::forbidden(format!(
                "You don't have {role} privileges"
            ))),
            _ => Err(Error::Auth {
                message: "You must be signed in".to_string(),
            }),
        }
    }
}

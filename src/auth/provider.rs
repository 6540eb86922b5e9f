use crate::{entities::UserRole, errors::Result};
use tokio::sync::broadcast;

/// Normalizes an email for storage and lookup (trimmed, lowercase).
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Email/password pair used for sign-up and sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email as typed by the user
    pub email: String,
    /// Plain-text password
    pub password: String,
}

impl Credentials {
    /// Builds a credential pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keeps passwords out of logs and `#[instrument]` spans.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Metadata attached to an identity at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMetadata {
    /// Role the profile will be created with
    pub role: UserRole,
    /// Display name
    pub full_name: Option<String>,
}

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Identity id, reused as the profile id
    pub id: i64,
    /// Normalized email
    pub email: String,
    /// Metadata attached at sign-up
    pub metadata: IdentityMetadata,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token
    pub token: String,
    /// Authenticated identity
    pub identity: Identity,
}

/// How far a sign-out reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutScope {
    /// End only the session held by this client
    Local,
    /// End every session of the identity
    Global,
}

/// Session-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A session was established
    SignedIn(Session),
    /// The client's session ended
    SignedOut,
}

/// Contract of the identity collaborator.
pub trait IdentityProvider: Send + Sync {
    /// Registers a new identity. Does not sign it in.
    fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: IdentityMetadata,
    ) -> impl Future<Output = Result<Identity>> + Send;

    /// Verifies credentials and makes the resulting session current.
    fn sign_in(&self, credentials: &Credentials) -> impl Future<Output = Result<Session>> + Send;

    /// Ends the current session (and, for `Global`, all of the identity's sessions).
    fn sign_out(&self, scope: SignOutScope) -> impl Future<Output = Result<()>> + Send;

    /// Returns the client's current session, if it is still valid.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// Removes an identity and every session it holds.
    fn delete_identity(&self, identity_id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Subscribes to session-change events.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

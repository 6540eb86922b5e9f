//! Identity and session handling.
//!
//! [`IdentityProvider`] is the seam to the identity collaborator (sign-up,
//! sign-in, sign-out, session retrieval, change events).
//! [`LocalIdentityProvider`] implements it on top of the `accounts` table.
//! [`SessionManager`] owns the process-wide session state and repairs it when
//! an identity has lost its profile.

/// In-process identity provider backed by the `accounts` table
pub mod local;
/// Identity provider contract and its value types
pub mod provider;
/// Session lifecycle and profile-integrity checks
pub mod session;

pub use local::LocalIdentityProvider;
pub use provider::{
    AuthEvent, Credentials, Identity, IdentityMetadata, IdentityProvider, Session, SignOutScope,
    normalize_email,
};
pub use session::{SessionManager, SessionState};

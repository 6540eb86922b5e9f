//! Unified error type for the catering lifecycle.
//!
//! Every operation returns [`Result`]. Callers at the operation boundary turn
//! an [`Error`] into a [`crate::notice::Notice`]; nothing here is retried.

use crate::entities::OrderStatus;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the failure
        message: String,
    },

    /// A missing or invalid input field
    #[error("{message}")]
    Validation {
        /// Human-readable explanation
        message: String,
    },

    /// Quote prices must be finite and strictly positive
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected price
        price: f64,
    },

    /// A record that must be unique already exists
    #[error("{message}")]
    Duplicate {
        /// Human-readable explanation
        message: String,
    },

    /// A record looked up by id does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record (e.g. "Quote")
        entity: &'static str,
        /// The id that was looked up
        id: String,
    },

    /// An authenticated identity has no matching profile row
    #[error("Your session has expired. Please sign in again.")]
    ProfileMissing {
        /// Identity whose profile is missing
        identity_id: i64,
    },

    /// The order status graph does not allow this step
    #[error("Cannot move order from {from} to {to}")]
    IllegalTransition {
        /// Current status (`None` when the quote has no status yet)
        from: OrderStatusLabel,
        /// Requested status
        to: OrderStatus,
    },

    /// Confirmation attempted before a chef quote was approved
    #[error("Please select a chef quote first")]
    NoApprovedQuote {
        /// The quote that has no approved chef quote
        quote_id: i64,
    },

    /// Bidding or selection attempted on a confirmed quote
    #[error("Quote {quote_id} is already confirmed")]
    QuoteConfirmed {
        /// The confirmed quote
        quote_id: i64,
    },

    /// The acting profile may not perform this operation
    #[error("Access denied: {message}")]
    Forbidden {
        /// Human-readable explanation
        message: String,
    },

    /// Sign-up or sign-in rejected by the identity provider
    #[error("Authentication failed: {message}")]
    Auth {
        /// Human-readable explanation
        message: String,
    },

    /// Any failed data-service call, message passed through verbatim
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Displayable wrapper for an optional current order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStatusLabel(pub Option<OrderStatus>);

impl std::fmt::Display for OrderStatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(status) => write!(f, "{status}"),
            None => f.write_str("no status"),
        }
    }
}

/// Coarse error taxonomy used when presenting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing/invalid input or a disallowed state change
    Validation,
    /// Email already registered, chef already quoted, ...
    Duplicate,
    /// Record missing, including a missing profile for a session
    NotFound,
    /// Data service or environment failure
    Service,
}

impl Error {
    /// Classifies the error for presentation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. }
            | Self::InvalidPrice { .. }
            | Self::IllegalTransition { .. }
            | Self::NoApprovedQuote { .. }
            | Self::QuoteConfirmed { .. }
            | Self::Forbidden { .. }
            | Self::Auth { .. } => ErrorKind::Validation,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::NotFound { .. } | Self::ProfileMissing { .. } => ErrorKind::NotFound,
            Self::Database(_) | Self::Config { .. } | Self::Io(_) | Self::EnvVar(_) => {
                ErrorKind::Service
            }
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(Error::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(
            Error::Duplicate {
                message: "dup".to_string()
            }
            .kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(Error::not_found("Quote", 3).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::ProfileMissing { identity_id: 1 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("boom".to_string())).kind(),
            ErrorKind::Service
        );
    }

    #[test]
    fn test_illegal_transition_message() {
        let err = Error::IllegalTransition {
            from: OrderStatusLabel(Some(OrderStatus::ReadyToDeliver)),
            to: OrderStatus::Delivered,
        };
        assert_eq!(
            err.to_string(),
            "Cannot move order from ready_to_deliver to delivered"
        );

        let err = Error::IllegalTransition {
            from: OrderStatusLabel(None),
            to: OrderStatus::OnTheWay,
        };
        assert_eq!(err.to_string(), "Cannot move order from no status to on_the_way");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            Error::not_found("Quote", 42).to_string(),
            "Quote not found: 42"
        );
    }
}

//! Transient user-facing notices.
//!
//! Every lifecycle operation ends in exactly one notice: a success message, or
//! a destructive notice carrying the error text. Errors are logged here, at
//! the operation boundary, and nowhere else.

use crate::errors::{Error, Result};
use tracing::error;

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The operation went through
    Success,
    /// The operation failed; nothing was retried
    Destructive,
}

/// A short-lived notification shown after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or failure styling
    pub level: NoticeLevel,
    /// One or two words
    pub title: String,
    /// What happened
    pub description: String,
}

impl Notice {
    /// A success notice.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this notice reports a failure.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.level == NoticeLevel::Destructive
    }
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("unique")
}

impl From<&Error> for Notice {
    fn from(e: &Error) -> Self {
        let title = match e {
            Error::ProfileMissing { .. } => "Session Error",
            Error::Forbidden { .. } => "Access Denied",
            Error::Auth { .. } => "Authentication Error",
            Error::Duplicate { .. } => "Already Exists",
            Error::Database(db) if is_unique_violation(db) => "Already Exists",
            _ => "Error",
        };
        Self {
            level: NoticeLevel::Destructive,
            title: title.to_string(),
            description: e.to_string(),
        }
    }
}

/// Turns an operation result into its notice, logging failures.
///
/// `on_success` builds the notice for the success value.
pub fn report<T, F>(operation: &str, result: &Result<T>, on_success: F) -> Notice
where
    F: FnOnce(&T) -> Notice,
{
    match result {
        Ok(value) => on_success(value),
        Err(e) => {
            error!("{} failed ({:?}): {}", operation, e.kind(), e);
            Notice::from(e)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::selection::confirm_quote;
    use crate::test_utils::*;

    #[test]
    fn test_error_titles() {
        let notice = Notice::from(&Error::ProfileMissing { identity_id: 4 });
        assert_eq!(notice.title, "Session Error");
        assert_eq!(
            notice.description,
            "Your session has expired. Please sign in again."
        );
        assert!(notice.is_destructive());

        let notice = Notice::from(&Error::forbidden("admins only"));
        assert_eq!(notice.title, "Access Denied");
        assert_eq!(notice.description, "Access denied: admins only");

        let notice = Notice::from(&Error::Database(sea_orm::DbErr::Custom(
            "UNIQUE constraint failed: profiles.email".to_string(),
        )));
        assert_eq!(notice.title, "Already Exists");

        let notice = Notice::from(&Error::validation("Party location is required"));
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.description, "Party location is required");
    }

    #[tokio::test]
    async fn test_report_failed_confirmation() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "cust@example.com").await?;
        let food = create_test_food_item(&db, "Samosa").await?;
        let quote = create_test_quote(&db, customer.id, &[(food.id, 1)]).await?;

        let result = confirm_quote(&db, quote.quote.id).await;
        let notice = report("confirm quote", &result, |_| {
            Notice::success("Success", "Quote confirmed")
        });
        assert_eq!(notice.level, NoticeLevel::Destructive);
        assert_eq!(notice.description, "Please select a chef quote first");

        let ok: Result<i64> = Ok(quote.quote.id);
        let notice = report("noop", &ok, |id| Notice::success("Success", format!("Quote {id}")));
        assert_eq!(notice.level, NoticeLevel::Success);
        Ok(())
    }
}

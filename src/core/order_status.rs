//! Order status state machine and the delivery dashboard.
//!
//! The status graph is linear:
//!
//! `pending_confirmation -> confirmed -> processing -> ready_to_deliver ->
//! on_the_way -> delivered -> received`
//!
//! Every write goes through [`transition_order_status`], which only accepts a
//! single step forward. Moving to `confirmed` is reserved to
//! [`crate::core::selection::confirm_quote`].

use crate::{
    core::details::{QuoteDetails, load_details},
    entities::{OrderStatus, Quote, UserRole, profile, quote},
    errors::{Error, OrderStatusLabel, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Statuses listed on the delivery dashboard.
pub const DELIVERY_STATUSES: [OrderStatus; 4] = [
    OrderStatus::ReadyToDeliver,
    OrderStatus::OnTheWay,
    OrderStatus::Delivered,
    OrderStatus::Received,
];

impl OrderStatus {
    /// The only status this one may move to, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PendingConfirmation => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::ReadyToDeliver),
            Self::ReadyToDeliver => Some(Self::OnTheWay),
            Self::OnTheWay => Some(Self::Delivered),
            Self::Delivered => Some(Self::Received),
            Self::Received => None,
        }
    }

    /// Whether `self -> to` is a legal step.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Whether delivery staff work on orders in this status.
    #[must_use]
    pub const fn is_delivery_stage(self) -> bool {
        matches!(
            self,
            Self::ReadyToDeliver | Self::OnTheWay | Self::Delivered | Self::Received
        )
    }
}

/// Checks a step from an optional current status.
///
/// Quotes stored without a status are treated as awaiting confirmation.
///
/// # Errors
/// Returns `IllegalTransition` when the step is not on the graph.
pub fn check_transition(from: Option<OrderStatus>, to: OrderStatus) -> Result<()> {
    let current = from.unwrap_or(OrderStatus::PendingConfirmation);
    if current.can_transition_to(to) {
        Ok(())
    } else {
        Err(Error::IllegalTransition {
            from: OrderStatusLabel(from),
            to,
        })
    }
}

/// Moves a quote's order status one step forward.
///
/// The write is conditional on the status read beforehand, so a concurrent
/// change turns into `IllegalTransition` instead of a skipped step.
///
/// # Errors
/// Returns an error if:
/// - The quote does not exist
/// - `to` is `confirmed` (use `confirm_quote`)
/// - The step is not legal from the current status
pub async fn transition_order_status<C>(
    db: &C,
    quote_id: i64,
    to: OrderStatus,
) -> Result<quote::Model>
where
    C: ConnectionTrait,
{
    if to == OrderStatus::Confirmed {
        return Err(Error::validation(
            "Orders are confirmed by confirming the quote",
        ));
    }

    let mut quote = Quote::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;
    let from = quote.order_status;
    check_transition(from, to)?;

    let mut update = Quote::update_many()
        .set(quote::ActiveModel {
            order_status: Set(Some(to)),
            ..Default::default()
        })
        .filter(quote::Column::Id.eq(quote_id));
    update = match from {
        Some(status) => update.filter(quote::Column::OrderStatus.eq(status)),
        None => update.filter(quote::Column::OrderStatus.is_null()),
    };
    let result = update.exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::IllegalTransition {
            from: OrderStatusLabel(from),
            to,
        });
    }

    info!(
        "Quote {} moved from {} to {}",
        quote_id,
        OrderStatusLabel(from),
        to
    );
    quote.order_status = Some(to);
    Ok(quote)
}

/// Sets the delivery progress of an order on the delivery dashboard.
///
/// # Errors
/// Returns `Validation` for statuses other than `on_the_way` and `delivered`
/// or for orders not on the dashboard, and `IllegalTransition` for skipped
/// or backward steps.
pub async fn update_delivery_status(
    db: &DatabaseConnection,
    quote_id: i64,
    new_status: OrderStatus,
) -> Result<quote::Model> {
    if !matches!(new_status, OrderStatus::OnTheWay | OrderStatus::Delivered) {
        return Err(Error::validation(format!(
            "Delivery status can only be set to on_the_way or delivered, not {new_status}"
        )));
    }

    let quote = Quote::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;
    if !quote
        .order_status
        .is_some_and(OrderStatus::is_delivery_stage)
    {
        return Err(Error::validation(format!(
            "Order {quote_id} is not ready for delivery"
        )));
    }

    transition_order_status(db, quote_id, new_status).await
}

/// Moves an order forward on behalf of `actor`.
///
/// - the confirmed chef: `processing`, `ready_to_deliver`
/// - delivery staff: `on_the_way`, `delivered`
/// - the owning customer: `received`
/// - admin: any legal step
///
/// # Errors
/// Returns `Forbidden` when the actor may not set `to` on this quote, plus
/// the errors of [`transition_order_status`].
pub async fn advance_order_status(
    db: &DatabaseConnection,
    actor: &profile::Model,
    quote_id: i64,
    to: OrderStatus,
) -> Result<quote::Model> {
    let quote = Quote::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Quote", quote_id))?;

    let allowed = match actor.role {
        UserRole::Admin => true,
        UserRole::Chef => {
            quote.chef_id == Some(actor.id)
                && matches!(to, OrderStatus::Processing | OrderStatus::ReadyToDeliver)
        }
        UserRole::Delivery => matches!(to, OrderStatus::OnTheWay | OrderStatus::Delivered),
        UserRole::Customer => quote.customer_id == actor.id && to == OrderStatus::Received,
    };
    if !allowed {
        return Err(Error::forbidden(format!(
            "a {} cannot set order {} to {}",
            actor.role, quote_id, to
        )));
    }

    transition_order_status(db, quote_id, to).await
}

/// Lists the orders on the delivery dashboard, newest first.
pub async fn list_delivery_orders(db: &DatabaseConnection) -> Result<Vec<QuoteDetails>> {
    let quotes = Quote::find()
        .filter(quote::Column::OrderStatus.is_in(DELIVERY_STATUSES))
        .order_by_desc(quote::Column::CreatedAt)
        .order_by_desc(quote::Column::Id)
        .all(db)
        .await?;
    debug!("Delivery dashboard has {} orders", quotes.len());
    load_details(db, quotes).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::Iterable;

    #[test]
    fn test_graph_is_linear() {
        let statuses: Vec<OrderStatus> = OrderStatus::iter().collect();
        for from in &statuses {
            let legal: Vec<_> = statuses
                .iter()
                .filter(|to| from.can_transition_to(**to))
                .collect();
            assert!(legal.len() <= 1, "{from} has {} successors", legal.len());
        }
        assert!(OrderStatus::ReadyToDeliver.can_transition_to(OrderStatus::OnTheWay));
        assert!(!OrderStatus::ReadyToDeliver.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::OnTheWay));
        assert!(OrderStatus::Received.next().is_none());
    }

    #[test]
    fn test_check_transition_without_status() {
        assert!(check_transition(None, OrderStatus::Confirmed).is_ok());
        assert!(matches!(
            check_transition(None, OrderStatus::OnTheWay).unwrap_err(),
            Error::IllegalTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_delivery_status_rejects_other_statuses() -> Result<()> {
        let db = setup_test_db().await?;
        for status in [OrderStatus::Processing, OrderStatus::Received] {
            let result = update_delivery_status(&db, 1, status).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_full_order_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_confirmed_order(&db).await?;
        let quote_id = order.quote.quote.id;

        // Not on the delivery board yet
        assert!(list_delivery_orders(&db).await?.is_empty());
        assert!(matches!(
            update_delivery_status(&db, quote_id, OrderStatus::OnTheWay)
                .await
                .unwrap_err(),
            Error::Validation { .. }
        ));

        advance_order_status(&db, &order.chef, quote_id, OrderStatus::Processing).await?;
        advance_order_status(&db, &order.chef, quote_id, OrderStatus::ReadyToDeliver).await?;

        let board = list_delivery_orders(&db).await?;
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].items.len(), 1);

        // Skipping on_the_way is rejected
        let err = update_delivery_status(&db, quote_id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot move order from ready_to_deliver to delivered"
        );

        update_delivery_status(&db, quote_id, OrderStatus::OnTheWay).await?;
        let delivered = update_delivery_status(&db, quote_id, OrderStatus::Delivered).await?;
        assert_eq!(delivered.order_status, Some(OrderStatus::Delivered));

        // Going back is rejected
        assert!(matches!(
            update_delivery_status(&db, quote_id, OrderStatus::OnTheWay)
                .await
                .unwrap_err(),
            Error::IllegalTransition { .. }
        ));

        let received =
            advance_order_status(&db, &order.customer, quote_id, OrderStatus::Received).await?;
        assert_eq!(received.order_status, Some(OrderStatus::Received));
        assert_eq!(list_delivery_orders(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_order_status_role_rules() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_confirmed_order(&db).await?;
        let quote_id = order.quote.quote.id;
        let other_chef = create_test_chef(&db, "other@example.com").await?;
        let driver = create_test_delivery(&db, "van@example.com").await?;
        let admin = create_test_profile(&db, "admin@example.com", UserRole::Admin).await?;

        assert!(matches!(
            advance_order_status(&db, &other_chef, quote_id, OrderStatus::Processing)
                .await
                .unwrap_err(),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            advance_order_status(&db, &driver, quote_id, OrderStatus::Processing)
                .await
                .unwrap_err(),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            advance_order_status(&db, &order.customer, quote_id, OrderStatus::Processing)
                .await
                .unwrap_err(),
            Error::Forbidden { .. }
        ));

        advance_order_status(&db, &admin, quote_id, OrderStatus::Processing).await?;
        assert!(matches!(
            advance_order_status(&db, &admin, quote_id, OrderStatus::OnTheWay)
                .await
                .unwrap_err(),
            Error::IllegalTransition { .. }
        ));
        assert!(matches!(
            advance_order_status(&db, &admin, quote_id, OrderStatus::Confirmed)
                .await
                .unwrap_err(),
            Error::Validation { .. }
        ));
        Ok(())
    }
}

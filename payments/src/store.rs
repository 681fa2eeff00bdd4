//! Dispatch helpers for strategies folding their own notification streams.

use crate::CheckoutStore;
use checkout_payments_core::action::{ActionStream, CheckoutAction};
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::state::CheckoutState;
use futures::StreamExt;

/// Fold `actions` into the store, stopping at the first error notification
///
/// Every notification up to and including the failing one is folded, so the
/// store records the failure before the caller sees it.
///
/// # Errors
///
/// - The error carried by the first failed notification
/// - [`PaymentError::Store`] if the store rejects an action
pub async fn dispatch_checked<A>(
    store: &CheckoutStore,
    actions: ActionStream<A>,
) -> Result<CheckoutState, PaymentError>
where
    A: Into<CheckoutAction> + Send + 'static,
{
    let mut actions = actions;
    while let Some(action) = actions.next().await {
        let action: CheckoutAction = action.into();
        let failure = action.error().cloned();

        store
            .send(action)
            .await
            .map_err(|error| PaymentError::Store(error.to_string()))?;

        if let Some(error) = failure {
            tracing::debug!(%error, "Dispatched stream ended with a failure");
            return Err(error);
        }
    }
    Ok(store.snapshot().await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{PaymentsConfig, create_checkout_store};
    use checkout_payments_core::action::OrderAction;
    use checkout_payments_core::payment::PaymentStatus;
    use checkout_payments_testing::{fixtures, test_clock};
    use std::sync::Arc;

    fn store() -> Arc<CheckoutStore> {
        create_checkout_store(
            fixtures::checkout_state(),
            Arc::new(test_clock()),
            &PaymentsConfig::default(),
        )
    }

    #[tokio::test]
    async fn folds_successful_stream() {
        let store = store();
        let order = fixtures::order("cc", PaymentStatus::Initialize);
        let actions: ActionStream<OrderAction> = Box::pin(futures::stream::iter(vec![
            OrderAction::SubmitOrderRequested,
            OrderAction::SubmitOrderSucceeded {
                order: order.clone(),
            },
        ]));

        let state = dispatch_checked(&store, actions).await.unwrap();

        assert_eq!(state.order(), Some(&order));
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let store = store();
        let error = PaymentError::Request {
            status: 400,
            message: "Bad Request".to_string(),
        };
        let actions: ActionStream<OrderAction> = Box::pin(futures::stream::iter(vec![
            OrderAction::SubmitOrderRequested,
            OrderAction::SubmitOrderFailed {
                error: error.clone(),
            },
            OrderAction::SubmitOrderSucceeded {
                order: fixtures::order("cc", PaymentStatus::Initialize),
            },
        ]));

        let result = dispatch_checked(&store, actions).await;

        assert_eq!(result, Err(error.clone()));
        let state = store.snapshot().await;
        assert_eq!(state.order.submit_error, Some(error));
        assert!(state.order().is_none());
    }

    #[tokio::test]
    async fn store_shutdown_is_reported() {
        let store = store();
        store.shutdown();
        let actions: ActionStream<OrderAction> =
            Box::pin(futures::stream::iter(vec![OrderAction::SubmitOrderRequested]));

        let result = dispatch_checked(&store, actions).await;

        assert!(matches!(result, Err(PaymentError::Store(_))));
    }
}

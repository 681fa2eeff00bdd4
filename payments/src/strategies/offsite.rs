use super::submit_order;
use crate::{CheckoutStore, OrderActionCreator, PaymentActionCreator, dispatch_checked};
use async_trait::async_trait;
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::OrderRequestBody;
use checkout_payments_core::state::CheckoutState;
use checkout_payments_core::strategy::{PaymentRequestOptions, PaymentStrategy};
use std::sync::Arc;

/// Hosted payments completed on the provider's page
///
/// Executing creates the order and asks the provider for a redirect. The
/// shopper returns with the order acknowledged, and `finalize` completes it.
pub struct OffsitePaymentStrategy {
    store: Arc<CheckoutStore>,
    order_action_creator: OrderActionCreator,
    payment_action_creator: PaymentActionCreator,
}

impl OffsitePaymentStrategy {
    /// Strategy submitting orders and hosted payments through the given creators
    #[must_use]
    pub fn new(
        store: Arc<CheckoutStore>,
        order_action_creator: OrderActionCreator,
        payment_action_creator: PaymentActionCreator,
    ) -> Self {
        Self {
            store,
            order_action_creator,
            payment_action_creator,
        }
    }
}

#[async_trait]
impl PaymentStrategy for OffsitePaymentStrategy {
    async fn initialize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Ok(self.store.snapshot().await)
    }

    #[tracing::instrument(skip_all, fields(method_id = %options.method_id))]
    async fn execute(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> Result<CheckoutState, PaymentError> {
        let state = submit_order(&self.store, &self.order_action_creator, &payload).await?;
        let request = PaymentActionCreator::payment_request(&state, &payload)?;

        dispatch_checked(
            &self.store,
            self.payment_action_creator.initialize_offsite_payment(request),
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(method_id = %options.method_id))]
    async fn finalize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        let state = self.store.snapshot().await;
        let order_id = state
            .order()
            .filter(|order| order.requires_finalization())
            .map(|order| order.order_id)
            .ok_or(PaymentError::OrderFinalizationNotRequired)?;

        tracing::debug!(order_id, "Finalizing hosted payment order");
        dispatch_checked(&self.store, self.order_action_creator.finalize_order(order_id)).await
    }

    async fn deinitialize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Ok(self.store.snapshot().await)
    }
}

use super::submit_order;
use crate::{CheckoutStore, OrderActionCreator};
use async_trait::async_trait;
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::OrderRequestBody;
use checkout_payments_core::state::CheckoutState;
use checkout_payments_core::strategy::{PaymentRequestOptions, PaymentStrategy};
use std::sync::Arc;

/// Payments settled outside checkout (bank deposit, cheque, cash on delivery)
pub struct OfflinePaymentStrategy {
    store: Arc<CheckoutStore>,
    order_action_creator: OrderActionCreator,
}

impl OfflinePaymentStrategy {
    /// Strategy submitting through `order_action_creator`
    #[must_use]
    pub fn new(store: Arc<CheckoutStore>, order_action_creator: OrderActionCreator) -> Self {
        Self {
            store,
            order_action_creator,
        }
    }
}

#[async_trait]
impl PaymentStrategy for OfflinePaymentStrategy {
    async fn initialize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Ok(self.store.snapshot().await)
    }

    async fn execute(
        &self,
        payload: OrderRequestBody,
        _options: PaymentRequestOptions,
    ) -> Result<CheckoutState, PaymentError> {
        submit_order(&self.store, &self.order_action_creator, &payload).await
    }

    async fn finalize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Err(PaymentError::OrderFinalizationNotRequired)
    }

    async fn deinitialize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Ok(self.store.snapshot().await)
    }
}

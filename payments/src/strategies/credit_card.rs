use super::submit_order;
use crate::{CheckoutStore, OrderActionCreator, PaymentActionCreator, dispatch_checked};
use async_trait::async_trait;
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::OrderRequestBody;
use checkout_payments_core::state::CheckoutState;
use checkout_payments_core::strategy::{PaymentRequestOptions, PaymentStrategy};
use std::sync::Arc;

/// Card payments submitted through the payment transport
///
/// The order is created first without card details, then the card is
/// submitted as a payment against it.
pub struct CreditCardPaymentStrategy {
    store: Arc<CheckoutStore>,
    order_action_creator: OrderActionCreator,
    payment_action_creator: PaymentActionCreator,
}

impl CreditCardPaymentStrategy {
    /// Strategy submitting orders and payments through the given creators
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
impl PaymentStrategy for CreditCardPaymentStrategy {
    async fn initialize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Ok(self.store.snapshot().await)
    }

    #[tracing::instrument(skip_all, fields(method_id = %options.method_id))]
    async fn execute(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> Result<CheckoutState, PaymentError> {
        if payload
            .payment
            .as_ref()
            .is_none_or(|payment| payment.payment_data.is_none())
        {
            return Err(PaymentError::InvalidArgument(
                "Unable to submit payment because \"payload.payment.paymentData\" argument is not provided."
                    .to_string(),
            ));
        }

        let state = submit_order(&self.store, &self.order_action_creator, &payload).await?;
        let request = PaymentActionCreator::payment_request(&state, &payload)?;
        tracing::debug!(order_id = request.order_id, "Submitting card payment");

        dispatch_checked(&self.store, self.payment_action_creator.submit_payment(request)).await
    }

    async fn finalize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Err(PaymentError::OrderFinalizationNotRequired)
    }

    async fn deinitialize(&self, _options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        Ok(self.store.snapshot().await)
    }
}

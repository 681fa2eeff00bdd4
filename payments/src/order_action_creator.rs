//! Order submission and finalization notifications.

use async_stream::stream;
use checkout_payments_core::action::{ActionStream, OrderAction};
use checkout_payments_core::client::CheckoutClient;
use checkout_payments_core::error::{MissingDataErrorType, PaymentError};
use checkout_payments_core::payment::OrderRequestBody;
use checkout_payments_core::state::CheckoutState;
use std::sync::Arc;

/// Wraps the checkout transport in request/outcome notification streams
#[derive(Clone)]
pub struct OrderActionCreator {
    client: Arc<dyn CheckoutClient>,
}

impl OrderActionCreator {
    /// Creator submitting through `client`
    #[must_use]
    pub fn new(client: Arc<dyn CheckoutClient>) -> Self {
        Self { client }
    }

    /// `[SubmitOrderRequested, SubmitOrderSucceeded | SubmitOrderFailed]`
    ///
    /// Payment details are stripped from the payload before it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingData`] when no checkout is loaded.
    pub fn submit_order(
        &self,
        state: &CheckoutState,
        payload: &OrderRequestBody,
    ) -> Result<ActionStream<OrderAction>, PaymentError> {
        if state.checkout().is_none() {
            return Err(MissingDataErrorType::MissingCheckout.into());
        }

        let client = Arc::clone(&self.client);
        let body = payload.without_payment_data();

        Ok(Box::pin(stream! {
            yield OrderAction::SubmitOrderRequested;

            match client.submit_order(&body).await {
                Ok(order) => yield OrderAction::SubmitOrderSucceeded { order },
                Err(error) => yield OrderAction::SubmitOrderFailed { error },
            }
        }))
    }

    /// `[FinalizeOrderRequested, FinalizeOrderSucceeded | FinalizeOrderFailed]`
    #[must_use]
    pub fn finalize_order(&self, order_id: u64) -> ActionStream<OrderAction> {
        let client = Arc::clone(&self.client);

        Box::pin(stream! {
            yield OrderAction::FinalizeOrderRequested { order_id };

            match client.finalize_order(order_id).await {
                Ok(order) => yield OrderAction::FinalizeOrderSucceeded { order },
                Err(error) => yield OrderAction::FinalizeOrderFailed { error },
            }
        })
    }
}

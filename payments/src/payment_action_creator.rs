//! Payment submission notifications.

use async_stream::stream;
use checkout_payments_core::action::{ActionStream, PaymentAction};
use checkout_payments_core::client::PaymentClient;
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::{OrderRequestBody, PaymentRequest};
use checkout_payments_core::state::CheckoutState;
use std::sync::Arc;

/// Wraps the payment transport in request/outcome notification streams
#[derive(Clone)]
pub struct PaymentActionCreator {
    client: Arc<dyn PaymentClient>,
}

impl PaymentActionCreator {
    /// Creator submitting through `client`
    #[must_use]
    pub fn new(client: Arc<dyn PaymentClient>) -> Self {
        Self { client }
    }

    /// Build the payment request for the submitted order
    ///
    /// # Errors
    ///
    /// - [`PaymentError::MissingData`] when no order has been submitted
    /// - [`PaymentError::InvalidArgument`] when `payload` has no payment block
    pub fn payment_request(
        state: &CheckoutState,
        payload: &OrderRequestBody,
    ) -> Result<PaymentRequest, PaymentError> {
        let order = state.order_or_err()?;
        let payment = payload.payment.as_ref().ok_or_else(|| {
            PaymentError::InvalidArgument(
                "Unable to submit payment because the payload has no payment block".to_string(),
            )
        })?;

        Ok(PaymentRequest {
            order_id: order.order_id,
            method_id: payment.name.clone(),
            gateway_id: payment.gateway.clone(),
            instrument: payment.payment_data.clone(),
            amount_cents: order.grand_total_cents,
        })
    }

    /// `[SubmitPaymentRequested, SubmitPaymentSucceeded | SubmitPaymentFailed]`
    #[must_use]
    pub fn submit_payment(&self, request: PaymentRequest) -> ActionStream<PaymentAction> {
        let client = Arc::clone(&self.client);

        Box::pin(stream! {
            yield PaymentAction::SubmitPaymentRequested;

            match client.submit_payment(&request).await {
                Ok(response) => yield PaymentAction::SubmitPaymentSucceeded { response },
                Err(error) => yield PaymentAction::SubmitPaymentFailed { error },
            }
        })
    }

    /// `[InitializeOffsitePaymentRequested, InitializeOffsitePaymentSucceeded | InitializeOffsitePaymentFailed]`
    #[must_use]
    pub fn initialize_offsite_payment(
        &self,
        request: PaymentRequest,
    ) -> ActionStream<PaymentAction> {
        let client = Arc::clone(&self.client);

        Box::pin(stream! {
            yield PaymentAction::InitializeOffsitePaymentRequested;

            match client.initialize_offsite_payment(&request).await {
                Ok(response) => yield PaymentAction::InitializeOffsitePaymentSucceeded { response },
                Err(error) => yield PaymentAction::InitializeOffsitePaymentFailed { error },
            }
        })
    }
}

//! Transport collaborators.
//!
//! The order and payment action creators talk to the platform through these
//! traits. Implementations own HTTP plumbing; this layer only sees typed
//! requests, typed responses and [`PaymentError`]s.

use crate::error::PaymentError;
use crate::payment::{Order, OrderRequestBody, PaymentRequest, PaymentResponse};
use async_trait::async_trait;

/// Checkout transport: order submission and finalization.
#[async_trait]
pub trait CheckoutClient: Send + Sync {
    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Request`] when the transport fails.
    async fn submit_order(&self, body: &OrderRequestBody) -> Result<Order, PaymentError>;

    /// Finalize an order a provider completed out of band.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Request`] when the transport fails.
    async fn finalize_order(&self, order_id: u64) -> Result<Order, PaymentError>;
}

/// Payment transport: payment submission.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Submit payment details for an order.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Request`] or [`PaymentError::PaymentDeclined`].
    async fn submit_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse, PaymentError>;

    /// Start a hosted payment, returning the redirect target.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Request`] when the transport fails.
    async fn initialize_offsite_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError>;
}

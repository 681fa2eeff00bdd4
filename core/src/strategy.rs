//! The payment strategy capability.
//!
//! One implementation exists per payment provider or payment method type.
//! Strategies are built once, shared behind `Arc<dyn PaymentStrategy>` and
//! reused across calls, so any per-instance setup (an initialized SDK handle,
//! a subscription) must live behind interior mutability.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          PaymentStrategy (trait)         │
//! │  ├── initialize(options)                 │
//! │  ├── execute(payload, options)           │
//! │  ├── finalize(options)                   │
//! │  └── deinitialize(options)               │
//! └──────────────────────────────────────────┘
//!                      ▲
//!     ┌────────────────┼─────────────────┐
//!  creditcard       offsite     nopaymentdatarequired ...
//! ```

use crate::error::PaymentError;
use crate::payment::OrderRequestBody;
use crate::state::CheckoutState;
use async_trait::async_trait;

/// Identifies the payment method a lifecycle call runs for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentRequestOptions {
    /// Payment method identifier
    pub method_id: String,
    /// Gateway identifier
    pub gateway_id: Option<String>,
}

impl PaymentRequestOptions {
    /// Options for a method with an optional gateway.
    #[must_use]
    pub fn new(method_id: impl Into<String>, gateway_id: Option<String>) -> Self {
        Self {
            method_id: method_id.into(),
            gateway_id,
        }
    }
}

/// Four-verb payment lifecycle.
///
/// Every verb resolves to the state snapshot after the strategy's own
/// dispatches have been folded. Strategies never mutate state directly.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Provider setup: load SDKs, fetch client tokens.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingData`] when required credentials are absent.
    async fn initialize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError>;

    /// Submit the order and its payment.
    ///
    /// # Errors
    ///
    /// Returns a normalized [`PaymentError`] when the provider or a transport fails.
    async fn execute(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> Result<CheckoutState, PaymentError>;

    /// Complete an order the provider finished out of band.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::OrderFinalizationNotRequired`] when nothing is pending.
    async fn finalize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError>;

    /// Release provider resources. Must succeed without a prior `initialize`.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] when teardown fails.
    async fn deinitialize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError>;
}

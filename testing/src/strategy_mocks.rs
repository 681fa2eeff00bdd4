//! Recording mocks for payment strategies and transports
//!
//! Each mock records what it was called with and answers with a configured
//! result, so tests can assert both the resolution path and the notification
//! sequence:
//! - [`MockPaymentStrategy`]: configurable per-verb failures and latency
//! - [`MockCheckoutClient`]: order submission/finalization transport
//! - [`MockPaymentClient`]: payment submission transport

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Poisoned locks only happen after a test already panicked

use async_trait::async_trait;
use checkout_payments_core::action::PaymentStrategyVerb;
use checkout_payments_core::client::{CheckoutClient, PaymentClient};
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::{
    Order, OrderRequestBody, PaymentRequest, PaymentResponse, PaymentStatus,
};
use checkout_payments_core::state::CheckoutState;
use checkout_payments_core::strategy::{PaymentRequestOptions, PaymentStrategy};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A recorded strategy invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyCall {
    /// `initialize(options)`
    Initialize(PaymentRequestOptions),
    /// `execute(payload, options)`
    Execute(OrderRequestBody, PaymentRequestOptions),
    /// `finalize(options)`
    Finalize(PaymentRequestOptions),
    /// `deinitialize(options)`
    Deinitialize(PaymentRequestOptions),
}

impl StrategyCall {
    /// The verb of this call
    #[must_use]
    pub const fn verb(&self) -> PaymentStrategyVerb {
        match self {
            Self::Initialize(_) => PaymentStrategyVerb::Initialize,
            Self::Execute(..) => PaymentStrategyVerb::Execute,
            Self::Finalize(_) => PaymentStrategyVerb::Finalize,
            Self::Deinitialize(_) => PaymentStrategyVerb::Deinitialize,
        }
    }
}

/// Payment strategy that records calls and answers with configured results
///
/// # Example
///
/// ```
/// use checkout_payments_testing::mocks::MockPaymentStrategy;
/// use checkout_payments_core::action::PaymentStrategyVerb;
/// use checkout_payments_core::error::PaymentError;
///
/// let strategy = MockPaymentStrategy::new()
///     .failing(PaymentStrategyVerb::Execute, PaymentError::PaymentCancelled);
/// assert!(strategy.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockPaymentStrategy {
    state: CheckoutState,
    failures: HashMap<PaymentStrategyVerb, PaymentError>,
    delay: Option<Duration>,
    calls: Mutex<Vec<StrategyCall>>,
    completed: AtomicUsize,
}

impl MockPaymentStrategy {
    /// Strategy answering every verb with an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer successful verbs with `state`
    #[must_use]
    pub fn with_state(mut self, state: CheckoutState) -> Self {
        self.state = state;
        self
    }

    /// Fail `verb` with `error`
    #[must_use]
    pub fn failing(mut self, verb: PaymentStrategyVerb, error: PaymentError) -> Self {
        self.failures.insert(verb, error);
        self
    }

    /// Sleep before answering
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<StrategyCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received for `verb`
    #[must_use]
    pub fn call_count(&self, verb: PaymentStrategyVerb) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.verb() == verb)
            .count()
    }

    /// Number of calls that ran to completion (including the configured delay)
    #[must_use]
    pub fn completed_calls(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    async fn answer(&self, call: StrategyCall) -> Result<CheckoutState, PaymentError> {
        let verb = call.verb();
        self.calls.lock().unwrap().push(call);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        match self.failures.get(&verb) {
            Some(error) => Err(error.clone()),
            None => Ok(self.state.clone()),
        }
    }
}

#[async_trait]
impl PaymentStrategy for MockPaymentStrategy {
    async fn initialize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        self.answer(StrategyCall::Initialize(options)).await
    }

    async fn execute(
        &self,
        payload: OrderRequestBody,
        options: PaymentRequestOptions,
    ) -> Result<CheckoutState, PaymentError> {
        self.answer(StrategyCall::Execute(payload, options)).await
    }

    async fn finalize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        self.answer(StrategyCall::Finalize(options)).await
    }

    async fn deinitialize(&self, options: PaymentRequestOptions) -> Result<CheckoutState, PaymentError> {
        self.answer(StrategyCall::Deinitialize(options)).await
    }
}

/// Checkout transport answering with configured orders
#[derive(Debug)]
pub struct MockCheckoutClient {
    submit_response: Result<Order, PaymentError>,
    finalize_response: Result<Order, PaymentError>,
    submitted: Mutex<Vec<OrderRequestBody>>,
    finalized: Mutex<Vec<u64>>,
}

impl MockCheckoutClient {
    /// Client answering submissions with `order` and finalizations with a
    /// completed copy of it
    #[must_use]
    pub fn new(order: Order) -> Self {
        let mut finalized = order.clone();
        finalized.is_complete = true;
        if let Some(payment) = finalized.payment.as_mut() {
            payment.status = PaymentStatus::Complete;
        }

        Self {
            submit_response: Ok(order),
            finalize_response: Ok(finalized),
            submitted: Mutex::new(Vec::new()),
            finalized: Mutex::new(Vec::new()),
        }
    }

    /// Fail order submission with `error`
    #[must_use]
    pub fn failing_submit(mut self, error: PaymentError) -> Self {
        self.submit_response = Err(error);
        self
    }

    /// Fail order finalization with `error`
    #[must_use]
    pub fn failing_finalize(mut self, error: PaymentError) -> Self {
        self.finalize_response = Err(error);
        self
    }

    /// Order bodies submitted so far
    #[must_use]
    pub fn submitted(&self) -> Vec<OrderRequestBody> {
        self.submitted.lock().unwrap().clone()
    }

    /// Order ids finalized so far
    #[must_use]
    pub fn finalized(&self) -> Vec<u64> {
        self.finalized.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutClient for MockCheckoutClient {
    async fn submit_order(&self, body: &OrderRequestBody) -> Result<Order, PaymentError> {
        self.submitted.lock().unwrap().push(body.clone());
        self.submit_response.clone()
    }

    async fn finalize_order(&self, order_id: u64) -> Result<Order, PaymentError> {
        self.finalized.lock().unwrap().push(order_id);
        self.finalize_response.clone()
    }
}

/// Payment transport answering with configured responses
#[derive(Debug)]
pub struct MockPaymentClient {
    submit_response: Result<PaymentResponse, PaymentError>,
    offsite_response: Result<PaymentResponse, PaymentError>,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl Default for MockPaymentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentClient {
    /// Client completing payments and redirecting hosted payments
    #[must_use]
    pub fn new() -> Self {
        Self {
            submit_response: Ok(PaymentResponse {
                status: PaymentStatus::Complete,
                transaction_id: Some("txn-1".to_string()),
                redirect_url: None,
            }),
            offsite_response: Ok(PaymentResponse {
                status: PaymentStatus::Acknowledge,
                transaction_id: None,
                redirect_url: Some("https://provider.example/pay".to_string()),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail payment submission with `error`
    #[must_use]
    pub fn failing_submit(mut self, error: PaymentError) -> Self {
        self.submit_response = Err(error);
        self
    }

    /// Fail hosted payment initialization with `error`
    #[must_use]
    pub fn failing_offsite(mut self, error: PaymentError) -> Self {
        self.offsite_response = Err(error);
        self
    }

    /// Payment requests received so far (both endpoints)
    #[must_use]
    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentClient for MockPaymentClient {
    async fn submit_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse, PaymentError> {
        self.requests.lock().unwrap().push(request.clone());
        self.submit_response.clone()
    }

    async fn initialize_offsite_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        self.requests.lock().unwrap().push(request.clone());
        self.offsite_response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_strategy_records_and_fails_configured_verb() {
        let strategy =
            MockPaymentStrategy::new().failing(PaymentStrategyVerb::Finalize, PaymentError::PaymentCancelled);
        let options = PaymentRequestOptions::new("cc", None);

        assert!(strategy.initialize(options.clone()).await.is_ok());
        assert_eq!(
            strategy.finalize(options.clone()).await,
            Err(PaymentError::PaymentCancelled)
        );
        assert_eq!(
            strategy.calls(),
            vec![
                StrategyCall::Initialize(options.clone()),
                StrategyCall::Finalize(options),
            ]
        );
        assert_eq!(strategy.completed_calls(), 2);
    }
}

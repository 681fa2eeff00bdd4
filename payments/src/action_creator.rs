//! The payment strategy action creator.
//!
//! Every verb follows the same protocol:
//!
//! ```text
//! precondition check ──Err──► (no notifications)
//!        │
//! strategy lookup ─────Err──► (no notifications)
//!        │
//!        ▼
//! <Verb>Requested ──► strategy call ──Ok──► <Verb>Succeeded
//!                                   └─Err─► <Verb>Failed { payload: error }
//! ```
//!
//! The returned stream is cold: nothing reaches the strategy until the
//! stream is first polled. That first poll starts the strategy call on its own
//! task and then yields `Requested`, so a consumer that stops after
//! `Requested` (or drops the stream) leaves the call running to completion.

use crate::CheckoutStore;
use crate::registry::{NO_PAYMENT_DATA_REQUIRED, PaymentStrategyRegistry};
use async_stream::stream;
use checkout_payments_core::action::{ActionStream, PaymentStrategyAction, PaymentStrategyVerb};
use checkout_payments_core::error::{MissingDataErrorType, PaymentError};
use checkout_payments_core::payment::OrderRequestBody;
use checkout_payments_core::state::CheckoutState;
use checkout_payments_core::strategy::{PaymentRequestOptions, PaymentStrategy};
use std::future::Future;
use std::sync::Arc;

/// Produces the notification streams of the four-verb payment lifecycle
#[derive(Clone)]
pub struct PaymentStrategyActionCreator {
    registry: Arc<PaymentStrategyRegistry>,
    store: Arc<CheckoutStore>,
}

impl PaymentStrategyActionCreator {
    /// Creator resolving strategies from `registry` against the state in `store`
    #[must_use]
    pub fn new(registry: Arc<PaymentStrategyRegistry>, store: Arc<CheckoutStore>) -> Self {
        Self { registry, store }
    }

    /// `[InitializeRequested, InitializeSucceeded | InitializeFailed]`
    ///
    /// # Errors
    ///
    /// - [`PaymentError::MissingData`] when the payment method is not loaded
    /// - [`PaymentError::Registry`] when no strategy handles the method
    #[tracing::instrument(skip(self), fields(verb = "initialize"))]
    pub async fn initialize(
        &self,
        method_id: &str,
        gateway_id: Option<&str>,
    ) -> Result<ActionStream<PaymentStrategyAction>, PaymentError> {
        let strategy = self.resolve(method_id, gateway_id).await?;
        let options = PaymentRequestOptions::new(method_id, gateway_id.map(str::to_string));

        Ok(lifecycle(PaymentStrategyVerb::Initialize, method_id, async move {
            strategy.initialize(options).await
        }))
    }

    /// `[DeinitializeRequested, DeinitializeSucceeded | DeinitializeFailed]`
    ///
    /// Valid without a prior `initialize`.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::MissingData`] when the payment method is not loaded
    /// - [`PaymentError::Registry`] when no strategy handles the method
    #[tracing::instrument(skip(self), fields(verb = "deinitialize"))]
    pub async fn deinitialize(
        &self,
        method_id: &str,
        gateway_id: Option<&str>,
    ) -> Result<ActionStream<PaymentStrategyAction>, PaymentError> {
        let strategy = self.resolve(method_id, gateway_id).await?;
        let options = PaymentRequestOptions::new(method_id, gateway_id.map(str::to_string));

        Ok(lifecycle(PaymentStrategyVerb::Deinitialize, method_id, async move {
            strategy.deinitialize(options).await
        }))
    }

    /// `[ExecuteRequested, ExecuteSucceeded | ExecuteFailed]`
    ///
    /// When the order needs no payment data (zero outstanding amount, or
    /// store credit covering it), the no-payment-data strategy runs
    /// regardless of the method named in `payload`.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::MissingData`] when payment is required and the
    ///   payload names no loaded payment method
    /// - [`PaymentError::Registry`] when no strategy handles the method
    #[tracing::instrument(skip_all, fields(verb = "execute", method_id = tracing::field::Empty))]
    pub async fn execute(
        &self,
        payload: OrderRequestBody,
    ) -> Result<ActionStream<PaymentStrategyAction>, PaymentError> {
        let ids = payload
            .payment_method_ids()
            .map(|(method_id, gateway_id)| (method_id.to_string(), gateway_id.map(str::to_string)));
        let use_store_credit = payload.use_store_credit;
        let payment_required = self
            .store
            .state(|state| state.is_payment_data_required(use_store_credit))
            .await;

        let (strategy, method_id, gateway_id) = if payment_required {
            let Some((method_id, gateway_id)) = ids else {
                tracing::warn!("Execute requested without a payment method");
                return Err(MissingDataErrorType::MissingPaymentMethod.into());
            };
            let strategy = self.resolve(&method_id, gateway_id.as_deref()).await?;
            (strategy, method_id, gateway_id)
        } else {
            let strategy = self.registry.get(NO_PAYMENT_DATA_REQUIRED)?;
            let (method_id, gateway_id) =
                ids.unwrap_or_else(|| (NO_PAYMENT_DATA_REQUIRED.to_string(), None));
            tracing::debug!(%method_id, "No payment data required");
            (strategy, method_id, gateway_id)
        };

        tracing::Span::current().record("method_id", method_id.as_str());
        let options = PaymentRequestOptions::new(method_id.clone(), gateway_id);

        Ok(lifecycle(PaymentStrategyVerb::Execute, &method_id, async move {
            strategy.execute(payload, options).await
        }))
    }

    /// `[FinalizeRequested, FinalizeSucceeded | FinalizeFailed]`
    ///
    /// The payment method comes from the payment attached to the current
    /// order.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::OrderFinalizationNotRequired`] when there is no
    ///   order awaiting finalization
    /// - [`PaymentError::MissingData`] when the order's payment method is not
    ///   loaded
    /// - [`PaymentError::Registry`] when no strategy handles the method
    #[tracing::instrument(skip_all, fields(verb = "finalize"))]
    pub async fn finalize(&self) -> Result<ActionStream<PaymentStrategyAction>, PaymentError> {
        let awaiting = self
            .store
            .state(|state| {
                state
                    .order()
                    .filter(|order| order.requires_finalization())
                    .and_then(|order| order.payment.as_ref())
                    .map(|payment| (payment.provider_id.clone(), payment.gateway_id.clone()))
            })
            .await;

        let Some((method_id, gateway_id)) = awaiting else {
            tracing::warn!("No order awaiting finalization");
            return Err(PaymentError::OrderFinalizationNotRequired);
        };

        let strategy = self.resolve(&method_id, gateway_id.as_deref()).await?;
        let options = PaymentRequestOptions::new(method_id.clone(), gateway_id);

        Ok(lifecycle(PaymentStrategyVerb::Finalize, &method_id, async move {
            strategy.finalize(options).await
        }))
    }

    async fn resolve(
        &self,
        method_id: &str,
        gateway_id: Option<&str>,
    ) -> Result<Arc<dyn PaymentStrategy>, PaymentError> {
        let method = self
            .store
            .state(|state| state.payment_method(method_id, gateway_id).cloned())
            .await;

        let Some(method) = method else {
            tracing::warn!(method_id, gateway_id, "Payment method is not loaded");
            return Err(MissingDataErrorType::MissingPaymentMethod.into());
        };

        self.registry.get_by_method(&method).map_err(|error| {
            tracing::warn!(method_id, gateway_id, %error, "No payment strategy for method");
            PaymentError::from(error)
        })
    }
}

/// Wrap one strategy call in its `Requested`/terminal notification pair
fn lifecycle<F>(
    verb: PaymentStrategyVerb,
    method_id: &str,
    call: F,
) -> ActionStream<PaymentStrategyAction>
where
    F: Future<Output = Result<CheckoutState, PaymentError>> + Send + 'static,
{
    let method_id = method_id.to_string();

    Box::pin(stream! {
        metrics::counter!(
            "payment_strategy.requests",
            "verb" => verb.as_str(),
            "method_id" => method_id.clone()
        )
        .increment(1);
        let handle = tokio::spawn(call);
        yield PaymentStrategyAction::requested(verb, method_id.clone());

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(PaymentError::Interrupted {
                method_id: method_id.clone(),
                reason: join_error.to_string(),
            }),
        };

        match outcome {
            Ok(_) => {
                metrics::counter!(
                    "payment_strategy.succeeded",
                    "verb" => verb.as_str(),
                    "method_id" => method_id.clone()
                )
                .increment(1);
                yield PaymentStrategyAction::succeeded(verb, method_id);
            },
            Err(error) => {
                tracing::info!(%verb, %method_id, %error, "Payment strategy failed");
                metrics::counter!(
                    "payment_strategy.failed",
                    "verb" => verb.as_str(),
                    "method_id" => method_id.clone()
                )
                .increment(1);
                yield PaymentStrategyAction::failed(verb, method_id, error);
            },
        }
    })
}

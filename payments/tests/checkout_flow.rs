//! Full checkout flows through the store, registry and built-in strategies.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use anyhow::{Context, Result};
use checkout_payments::{
    CheckoutStore, PaymentStrategyActionCreator, PaymentsConfig, create_checkout_store,
    create_payment_strategy_registry,
};
use checkout_payments_core::action::{
    ActionStream, CheckoutAction, PaymentStrategyAction, PaymentStrategyVerb,
};
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::{
    OrderPaymentRequestBody, OrderRequestBody, PaymentStatus,
};
use checkout_payments_core::state::CheckoutState;
use checkout_payments_testing::assertions::{assert_failed, assert_succeeded};
use checkout_payments_testing::mocks::{MockCheckoutClient, MockPaymentClient};
use checkout_payments_testing::{fixtures, init_test_tracing, test_clock};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

struct Checkout {
    store: Arc<CheckoutStore>,
    creator: PaymentStrategyActionCreator,
    checkout_client: Arc<MockCheckoutClient>,
    payment_client: Arc<MockPaymentClient>,
}

impl Checkout {
    async fn load(checkout_client: MockCheckoutClient, payment_client: MockPaymentClient) -> Result<Self> {
        init_test_tracing();
        let config = PaymentsConfig::from_lookup(|_| None)?;
        let store = create_checkout_store(CheckoutState::default(), Arc::new(test_clock()), &config);
        for action in fixtures::loading_actions() {
            store.send(action).await?;
        }

        let checkout_client = Arc::new(checkout_client);
        let payment_client = Arc::new(payment_client);
        let registry = create_payment_strategy_registry(
            Arc::clone(&store),
            checkout_client.clone(),
            payment_client.clone(),
            &config.registry,
        )?;
        let creator = PaymentStrategyActionCreator::new(Arc::new(registry), Arc::clone(&store));

        Ok(Self {
            store,
            creator,
            checkout_client,
            payment_client,
        })
    }

    /// Fold the stream into the store, returning what was folded
    async fn run(&self, actions: ActionStream<PaymentStrategyAction>) -> Result<Vec<PaymentStrategyAction>> {
        let mut folded = Vec::new();
        let mut actions = actions;
        while let Some(action) = actions.next().await {
            folded.push(action.clone());
            self.store.send(CheckoutAction::from(action)).await?;
        }
        Ok(folded)
    }
}

#[tokio::test]
async fn card_checkout_completes_order() -> Result<()> {
    let checkout = Checkout::load(
        MockCheckoutClient::new(fixtures::order("cc", PaymentStatus::Initialize)),
        MockPaymentClient::new(),
    )
    .await?;

    let initialized = checkout.run(checkout.creator.initialize("cc", None).await?).await?;
    assert_succeeded(&initialized, PaymentStrategyVerb::Initialize, "cc");

    let executed = checkout
        .run(checkout.creator.execute(fixtures::order_request_body("cc")).await?)
        .await?;
    assert_succeeded(&executed, PaymentStrategyVerb::Execute, "cc");

    let state = checkout.store.snapshot().await;
    let order = state.order().context("order should be loaded")?;
    assert!(order.is_complete);
    assert!(state.is_payment_strategy_initialized("cc"));
    assert_eq!(checkout.payment_client.requests().len(), 1);

    assert_eq!(
        checkout.creator.finalize().await.err(),
        Some(PaymentError::OrderFinalizationNotRequired)
    );
    Ok(())
}

#[tokio::test]
async fn hosted_checkout_finalizes_after_return() -> Result<()> {
    let checkout = Checkout::load(
        MockCheckoutClient::new(fixtures::order("paypal", PaymentStatus::Initialize)),
        MockPaymentClient::new(),
    )
    .await?;
    let payload = OrderRequestBody::with_payment(OrderPaymentRequestBody::new("paypal"));

    let executed = checkout.run(checkout.creator.execute(payload).await?).await?;
    assert_succeeded(&executed, PaymentStrategyVerb::Execute, "paypal");
    assert!(checkout.store.state(CheckoutState::is_order_finalization_required).await);

    let finalized = checkout.run(checkout.creator.finalize().await?).await?;
    assert_succeeded(&finalized, PaymentStrategyVerb::Finalize, "paypal");
    assert_eq!(checkout.checkout_client.finalized(), vec![295]);

    let state = checkout.store.snapshot().await;
    assert!(state.order().context("order should be loaded")?.is_complete);
    assert!(!state.is_order_finalization_required());
    Ok(())
}

#[tokio::test]
async fn declined_card_is_recorded_as_execute_failure() -> Result<()> {
    let declined = PaymentError::PaymentDeclined {
        reason: "Do not honor".to_string(),
    };
    let checkout = Checkout::load(
        MockCheckoutClient::new(fixtures::order("cc", PaymentStatus::Initialize)),
        MockPaymentClient::new().failing_submit(declined.clone()),
    )
    .await?;

    let executed = checkout
        .run(checkout.creator.execute(fixtures::order_request_body("cc")).await?)
        .await?;

    assert_failed(&executed, PaymentStrategyVerb::Execute, "cc", &declined);
    let state = checkout.store.snapshot().await;
    assert_eq!(
        state.payment_strategy_error(PaymentStrategyVerb::Execute, Some("cc")),
        Some(&declined)
    );
    assert!(!state.is_payment_strategy_pending(PaymentStrategyVerb::Execute, None));
    Ok(())
}

#[tokio::test]
async fn store_credit_checkout_skips_payment_transport() -> Result<()> {
    let checkout = Checkout::load(
        MockCheckoutClient::new(fixtures::order("storecredit", PaymentStatus::Complete)),
        MockPaymentClient::new(),
    )
    .await?;
    checkout
        .store
        .send(CheckoutAction::CheckoutLoaded {
            checkout: fixtures::checkout(),
            cart: fixtures::cart(),
            customer: fixtures::customer(fixtures::GRAND_TOTAL_CENTS),
        })
        .await?;
    let payload = fixtures::order_request_body("cc").use_store_credit(true);

    let executed = checkout.run(checkout.creator.execute(payload).await?).await?;

    assert_succeeded(&executed, PaymentStrategyVerb::Execute, "cc");
    assert!(checkout.payment_client.requests().is_empty());
    assert!(checkout.checkout_client.submitted()[0].payment.is_none());
    Ok(())
}

#[tokio::test]
async fn observers_see_requested_before_terminal() -> Result<()> {
    let checkout = Checkout::load(
        MockCheckoutClient::new(fixtures::order("cc", PaymentStatus::Initialize)),
        MockPaymentClient::new(),
    )
    .await?;
    let mut observer = checkout.store.subscribe_actions();

    checkout.run(checkout.creator.initialize("cc", None).await?).await?;

    let first = tokio::time::timeout(Duration::from_secs(1), observer.recv()).await??;
    let second = tokio::time::timeout(Duration::from_secs(1), observer.recv()).await??;
    assert_eq!(
        first,
        CheckoutAction::PaymentStrategy(PaymentStrategyAction::requested(
            PaymentStrategyVerb::Initialize,
            "cc"
        ))
    );
    assert_eq!(
        second,
        CheckoutAction::PaymentStrategy(PaymentStrategyAction::succeeded(
            PaymentStrategyVerb::Initialize,
            "cc"
        ))
    );
    Ok(())
}

#[tokio::test]
async fn shutdown_store_rejects_lifecycle_notifications() -> Result<()> {
    let checkout = Checkout::load(
        MockCheckoutClient::new(fixtures::order("cc", PaymentStatus::Initialize)),
        MockPaymentClient::new(),
    )
    .await?;
    checkout.store.shutdown();

    let result = checkout.run(checkout.creator.initialize("cc", None).await?).await;

    assert!(result.is_err());
    let pending = checkout
        .store
        .state(|state| state.is_payment_strategy_pending(PaymentStrategyVerb::Initialize, None))
        .await;
    assert!(!pending);
    Ok(())
}

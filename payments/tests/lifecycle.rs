//! Notification protocol of the payment strategy action creator.
//!
//! Every verb either fails before emitting anything or emits exactly
//! `[Requested, Succeeded | Failed]` tagged with the resolved method id.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use checkout_payments::registry::{CREDIT_CARD, NO_PAYMENT_DATA_REQUIRED, OFFSITE};
use checkout_payments::{
    CheckoutStore, PaymentStrategyActionCreator, PaymentStrategyRegistry, PaymentsConfig,
    create_checkout_store,
};
use checkout_payments_core::action::{CheckoutAction, PaymentStrategyAction, PaymentStrategyVerb};
use checkout_payments_core::error::{MissingDataErrorType, PaymentError};
use checkout_payments_core::payment::{
    OrderPaymentRequestBody, OrderRequestBody, PaymentMethod, PaymentStatus,
};
use checkout_payments_core::state::CheckoutState;
use checkout_payments_core::strategy::PaymentRequestOptions;
use checkout_payments_testing::assertions::{assert_failed, assert_succeeded, assert_well_formed};
use checkout_payments_testing::mocks::{MockPaymentStrategy, StrategyCall};
use checkout_payments_testing::properties::{arb_gateway_id, arb_method_id};
use checkout_payments_testing::{collect_actions, fixtures, init_test_tracing, test_clock};
use futures::StreamExt;
use proptest::prelude::*;
use std::sync::Arc;

/// One mock per key a fixture method can resolve to
struct Harness {
    store: Arc<CheckoutStore>,
    creator: PaymentStrategyActionCreator,
    braintree: Arc<MockPaymentStrategy>,
    adyenv2: Arc<MockPaymentStrategy>,
    credit_card: Arc<MockPaymentStrategy>,
    offsite: Arc<MockPaymentStrategy>,
    no_payment: Arc<MockPaymentStrategy>,
}

impl Harness {
    fn new(state: CheckoutState) -> Self {
        Self::with_strategies(state, MockPaymentStrategy::new(), MockPaymentStrategy::new())
    }

    fn with_strategies(
        state: CheckoutState,
        credit_card: MockPaymentStrategy,
        offsite: MockPaymentStrategy,
    ) -> Self {
        init_test_tracing();
        let store = create_checkout_store(state, Arc::new(test_clock()), &PaymentsConfig::default());

        let braintree = Arc::new(MockPaymentStrategy::new());
        let adyenv2 = Arc::new(MockPaymentStrategy::new());
        let credit_card = Arc::new(credit_card);
        let offsite = Arc::new(offsite);
        let no_payment = Arc::new(MockPaymentStrategy::new());

        let registry = PaymentStrategyRegistry::builder()
            .register("braintree", braintree.clone())
            .unwrap()
            .register("adyenv2", adyenv2.clone())
            .unwrap()
            .register(CREDIT_CARD, credit_card.clone())
            .unwrap()
            .register(OFFSITE, offsite.clone())
            .unwrap()
            .register(NO_PAYMENT_DATA_REQUIRED, no_payment.clone())
            .unwrap()
            .build();

        let creator = PaymentStrategyActionCreator::new(Arc::new(registry), Arc::clone(&store));

        Self {
            store,
            creator,
            braintree,
            adyenv2,
            credit_card,
            offsite,
            no_payment,
        }
    }

    fn total_calls(&self) -> usize {
        [
            &self.braintree,
            &self.adyenv2,
            &self.credit_card,
            &self.offsite,
            &self.no_payment,
        ]
        .iter()
        .map(|strategy| strategy.calls().len())
        .sum()
    }
}

#[tokio::test]
async fn initialize_known_method_emits_requested_and_succeeded() {
    let harness = Harness::new(fixtures::checkout_state());

    let actions = collect_actions(harness.creator.initialize("cc", None).await.unwrap()).await;

    let wire: Vec<serde_json::Value> = actions
        .iter()
        .map(|action| serde_json::to_value(action).unwrap())
        .collect();
    assert_eq!(
        wire,
        vec![
            serde_json::json!({ "type": "InitializeRequested", "meta": { "methodId": "cc" } }),
            serde_json::json!({ "type": "InitializeSucceeded", "meta": { "methodId": "cc" } }),
        ]
    );
}

#[tokio::test]
async fn each_verb_invokes_the_strategy_the_registry_resolves() {
    let state = fixtures::checkout_state();
    let harness = Harness::new(state.clone());

    collect_actions(harness.creator.initialize("braintree", None).await.unwrap()).await;
    collect_actions(harness.creator.initialize("scheme", Some("adyenv2")).await.unwrap()).await;
    collect_actions(harness.creator.deinitialize("paypal", None).await.unwrap()).await;
    collect_actions(harness.creator.execute(fixtures::order_request_body("cc")).await.unwrap()).await;

    assert_eq!(
        harness.braintree.calls(),
        vec![StrategyCall::Initialize(PaymentRequestOptions::new("braintree", None))]
    );
    assert_eq!(
        harness.adyenv2.calls(),
        vec![StrategyCall::Initialize(PaymentRequestOptions::new(
            "scheme",
            Some("adyenv2".to_string())
        ))]
    );
    assert_eq!(
        harness.offsite.calls(),
        vec![StrategyCall::Deinitialize(PaymentRequestOptions::new("paypal", None))]
    );
    assert_eq!(
        harness.credit_card.calls(),
        vec![StrategyCall::Execute(
            fixtures::order_request_body("cc"),
            PaymentRequestOptions::new("cc", None)
        )]
    );
    assert!(harness.no_payment.calls().is_empty());
}

#[tokio::test]
async fn failed_notification_carries_the_original_error() {
    let error = PaymentError::Request {
        status: 502,
        message: "Bad Gateway".to_string(),
    };
    let harness = Harness::with_strategies(
        fixtures::checkout_state(),
        MockPaymentStrategy::new().failing(PaymentStrategyVerb::Initialize, error.clone()),
        MockPaymentStrategy::new(),
    );

    let actions = collect_actions(harness.creator.initialize("cc", None).await.unwrap()).await;

    assert_failed(&actions, PaymentStrategyVerb::Initialize, "cc", &error);
    assert!(actions[1].error);
    assert_eq!(actions[1].payload.as_ref(), Some(&error));
}

#[tokio::test]
async fn unknown_method_rejects_with_missing_data_and_no_notifications() {
    let harness = Harness::new(fixtures::checkout_state());

    let initialize = harness.creator.initialize("klarna", None).await;
    let deinitialize = harness.creator.deinitialize("klarna", None).await;

    for result in [initialize, deinitialize] {
        let error = result.err().expect("unknown method must be rejected");
        assert_eq!(error.missing_data(), Some(MissingDataErrorType::MissingPaymentMethod));
        assert!(error.is_precondition());
    }
    assert_eq!(harness.total_calls(), 0);
}

#[tokio::test]
async fn execute_without_payment_method_rejects_when_payment_required() {
    let harness = Harness::new(fixtures::checkout_state());

    let result = harness.creator.execute(OrderRequestBody::default()).await;

    assert_eq!(
        result.err().and_then(|error| error.missing_data()),
        Some(MissingDataErrorType::MissingPaymentMethod)
    );
    assert_eq!(harness.total_calls(), 0);
}

#[tokio::test]
async fn store_credit_routes_execute_to_no_payment_strategy() {
    let harness = Harness::new(fixtures::checkout_state_with_store_credit(
        fixtures::GRAND_TOTAL_CENTS,
    ));
    let payload = OrderRequestBody::with_payment(OrderPaymentRequestBody::new("braintree"))
        .use_store_credit(true);

    let actions = collect_actions(harness.creator.execute(payload.clone()).await.unwrap()).await;

    assert_succeeded(&actions, PaymentStrategyVerb::Execute, "braintree");
    assert_eq!(
        harness.no_payment.calls(),
        vec![StrategyCall::Execute(
            payload,
            PaymentRequestOptions::new("braintree", None)
        )]
    );
    assert!(harness.braintree.calls().is_empty());
}

#[tokio::test]
async fn store_credit_ignored_when_not_applied() {
    let harness = Harness::new(fixtures::checkout_state_with_store_credit(
        fixtures::GRAND_TOTAL_CENTS,
    ));
    let payload = OrderRequestBody::with_payment(OrderPaymentRequestBody::new("braintree"));

    let actions = collect_actions(harness.creator.execute(payload).await.unwrap()).await;

    assert_succeeded(&actions, PaymentStrategyVerb::Execute, "braintree");
    assert_eq!(harness.braintree.call_count(PaymentStrategyVerb::Execute), 1);
    assert!(harness.no_payment.calls().is_empty());
}

#[tokio::test]
async fn execute_without_payment_block_uses_sentinel_method_id() {
    let mut state = fixtures::checkout_state();
    if let Some(checkout) = state.checkout.as_mut() {
        checkout.grand_total_cents = 0;
    }
    let harness = Harness::new(state);

    let actions = collect_actions(harness.creator.execute(OrderRequestBody::default()).await.unwrap()).await;

    assert_succeeded(&actions, PaymentStrategyVerb::Execute, NO_PAYMENT_DATA_REQUIRED);
    assert_eq!(harness.no_payment.call_count(PaymentStrategyVerb::Execute), 1);
}

#[tokio::test]
async fn finalize_without_pending_order_is_not_required() {
    for state in [
        fixtures::checkout_state(),
        fixtures::checkout_state_with_order(fixtures::order("paypal", PaymentStatus::Complete)),
        fixtures::checkout_state_with_order(fixtures::order("paypal", PaymentStatus::Initialize)),
    ] {
        let harness = Harness::new(state);

        let result = harness.creator.finalize().await;

        assert_eq!(result.err(), Some(PaymentError::OrderFinalizationNotRequired));
        assert_eq!(harness.total_calls(), 0);
    }
}

#[tokio::test]
async fn finalize_pending_order_runs_its_strategy() {
    let harness = Harness::new(fixtures::checkout_state_with_order(fixtures::order(
        "paypal",
        PaymentStatus::Acknowledge,
    )));

    let actions = collect_actions(harness.creator.finalize().await.unwrap()).await;

    assert_succeeded(&actions, PaymentStrategyVerb::Finalize, "paypal");
    assert_eq!(
        harness.offsite.calls(),
        vec![StrategyCall::Finalize(PaymentRequestOptions::new("paypal", None))]
    );
}

#[tokio::test]
async fn finalize_with_unloaded_order_method_is_missing_data() {
    let harness = Harness::new(fixtures::checkout_state_with_order(fixtures::order(
        "afterpay",
        PaymentStatus::Finalize,
    )));

    let result = harness.creator.finalize().await;

    assert_eq!(
        result.err().and_then(|error| error.missing_data()),
        Some(MissingDataErrorType::MissingPaymentMethod)
    );
}

#[tokio::test]
async fn deinitialize_without_initialize_succeeds() {
    let harness = Harness::new(fixtures::checkout_state());

    let actions = collect_actions(harness.creator.deinitialize("cc", None).await.unwrap()).await;

    assert_succeeded(&actions, PaymentStrategyVerb::Deinitialize, "cc");
}

#[tokio::test]
async fn dispatched_lifecycle_updates_strategy_state() {
    let harness = Harness::new(fixtures::checkout_state());

    let state = harness
        .store
        .dispatch(harness.creator.initialize("cc", None).await.unwrap().map(CheckoutAction::from))
        .await
        .unwrap();
    assert!(state.is_payment_strategy_initialized("cc"));
    assert!(!state.is_payment_strategy_pending(PaymentStrategyVerb::Initialize, None));

    let state = harness
        .store
        .dispatch(harness.creator.deinitialize("cc", None).await.unwrap().map(CheckoutAction::from))
        .await
        .unwrap();
    assert!(!state.is_payment_strategy_initialized("cc"));
}

#[tokio::test]
async fn concurrent_lifecycles_fold_without_corruption() {
    let harness = Arc::new(Harness::new(fixtures::checkout_state()));

    let handles: Vec<_> = ["cc", "braintree", "paypal"]
        .into_iter()
        .map(|method_id| {
            let harness = Arc::clone(&harness);
            tokio::spawn(async move {
                let actions = harness.creator.initialize(method_id, None).await;
                match actions {
                    Ok(actions) => harness
                        .store
                        .dispatch(actions.map(CheckoutAction::from))
                        .await
                        .map(|_| true),
                    Err(_) => Ok(false),
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    let state = harness.store.snapshot().await;
    for method_id in ["cc", "braintree", "paypal"] {
        assert!(state.is_payment_strategy_initialized(method_id), "{method_id}");
    }
    assert!(state.payment_strategies.pending.is_empty());
}

fn state_with_method(method: &PaymentMethod) -> CheckoutState {
    let mut state = CheckoutState::default();
    state.payment_methods.data = vec![method.clone()];
    state
}

proptest! {
    #[test]
    fn initialize_sequence_is_tagged_with_any_method_id(
        method_id in arb_method_id(),
        gateway_id in arb_gateway_id(),
    ) {
        let mut method = PaymentMethod::new(method_id.clone());
        method.gateway = gateway_id.clone();

        let actions = tokio_test::block_on(async {
            let harness = Harness::new(state_with_method(&method));
            collect_actions(
                harness
                    .creator
                    .initialize(&method_id, gateway_id.as_deref())
                    .await
                    .unwrap(),
            )
            .await
        });

        assert_well_formed(&actions);
        prop_assert_eq!(&actions[0], &PaymentStrategyAction::requested(PaymentStrategyVerb::Initialize, method_id.clone()));
        prop_assert_eq!(actions[1].method_id(), method_id.as_str());
    }

    #[test]
    fn unknown_method_id_never_emits(method_id in arb_method_id()) {
        let result = tokio_test::block_on(async {
            let harness = Harness::new(CheckoutState::default());
            let result = harness.creator.deinitialize(&method_id, None).await.map(|_| ());
            (result, harness.total_calls())
        });

        prop_assert_eq!(
            result.0.err().and_then(|error| error.missing_data()),
            Some(MissingDataErrorType::MissingPaymentMethod)
        );
        prop_assert_eq!(result.1, 0);
    }
}

//! # Checkout Payments Testing
//!
//! Testing utilities and helpers for checkout payment orchestration.
//!
//! This crate provides:
//! - A fixed clock for deterministic reducers
//! - Fixtures for payment methods, orders and checkout state
//! - Mock strategies and transports that record their calls
//! - Assertion helpers for notification sequences
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use checkout_payments_testing::{collect_actions, fixtures, mocks::MockPaymentStrategy};
//!
//! #[tokio::test]
//! async fn initializes_credit_card() {
//!     let strategy = Arc::new(MockPaymentStrategy::new());
//!     let creator = action_creator_with(strategy.clone(), fixtures::checkout_state());
//!
//!     let actions = collect_actions(creator.initialize("cc", None).await?).await;
//!
//!     assertions::assert_succeeded(&actions, PaymentStrategyVerb::Initialize, "cc");
//! }
//! ```

use chrono::{DateTime, Utc};
use checkout_payments_core::action::ActionStream;
use checkout_payments_core::environment::Clock;
use futures::StreamExt;

mod strategy_mocks;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits and collaborators
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    pub use crate::strategy_mocks::{
        MockCheckoutClient, MockPaymentClient, MockPaymentStrategy, StrategyCall,
    };

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use checkout_payments_testing::mocks::FixedClock;
    /// use checkout_payments_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Fixtures mirroring a loaded checkout
pub mod fixtures {
    use checkout_payments_core::action::CheckoutAction;
    use checkout_payments_core::payment::{
        Cart, Checkout, Customer, Order, OrderPayment, OrderPaymentRequestBody,
        OrderRequestBody, PaymentInstrument, PaymentMethod, PaymentMethodType, PaymentStatus,
    };
    use checkout_payments_core::state::CheckoutState;

    /// Checkout grand total used by the fixtures
    pub const GRAND_TOTAL_CENTS: i64 = 19_000;

    /// Credit card method served through the API (`cc`)
    #[must_use]
    pub fn credit_card() -> PaymentMethod {
        PaymentMethod::new("cc")
    }

    /// Braintree card method with a client token
    #[must_use]
    pub fn braintree() -> PaymentMethod {
        PaymentMethod::new("braintree").with_client_token("clientToken")
    }

    /// PayPal hosted method
    #[must_use]
    pub fn paypal() -> PaymentMethod {
        PaymentMethod::new("paypal").with_type(PaymentMethodType::Hosted)
    }

    /// Card scheme served through the `adyenv2` gateway
    #[must_use]
    pub fn adyen_scheme() -> PaymentMethod {
        PaymentMethod::new("scheme").with_gateway("adyenv2")
    }

    /// Offline bank deposit
    #[must_use]
    pub fn bank_deposit() -> PaymentMethod {
        PaymentMethod::new("bankdeposit").with_type(PaymentMethodType::Offline)
    }

    /// Every fixture payment method
    #[must_use]
    pub fn payment_methods() -> Vec<PaymentMethod> {
        vec![credit_card(), braintree(), paypal(), adyen_scheme(), bank_deposit()]
    }

    /// Checkout with the fixture grand total
    #[must_use]
    pub fn checkout() -> Checkout {
        Checkout {
            id: "b20deef40f9699e48671bbc3fef6ca44dc80e3c7".to_string(),
            grand_total_cents: GRAND_TOTAL_CENTS,
        }
    }

    /// Cart backing the checkout
    #[must_use]
    pub fn cart() -> Cart {
        Cart {
            id: "b20deef40f9699e48671bbc3fef6ca44dc80e3c7".to_string(),
            base_amount_cents: 20_000,
            currency: "USD".to_string(),
        }
    }

    /// Customer holding `store_credit_cents`
    #[must_use]
    pub fn customer(store_credit_cents: i64) -> Customer {
        Customer {
            id: Some(4),
            email: "test@bigcommerce.com".to_string(),
            store_credit_cents,
        }
    }

    /// Order paid with `provider_id` whose payment is at `status`
    #[must_use]
    pub fn order(provider_id: &str, status: PaymentStatus) -> Order {
        Order {
            order_id: 295,
            cart_id: cart().id,
            is_complete: matches!(status, PaymentStatus::Complete),
            grand_total_cents: GRAND_TOTAL_CENTS,
            payment: Some(OrderPayment {
                provider_id: provider_id.to_string(),
                gateway_id: None,
                status,
                amount_cents: GRAND_TOTAL_CENTS,
            }),
        }
    }

    /// Fully loaded checkout state without an order
    #[must_use]
    pub fn checkout_state() -> CheckoutState {
        checkout_state_with_store_credit(0)
    }

    /// Fully loaded checkout state whose customer has store credit
    #[must_use]
    pub fn checkout_state_with_store_credit(store_credit_cents: i64) -> CheckoutState {
        let mut state = CheckoutState {
            checkout: Some(checkout()),
            cart: Some(cart()),
            customer: Some(customer(store_credit_cents)),
            ..CheckoutState::default()
        };
        state.payment_methods.data = payment_methods();
        state
    }

    /// Fully loaded checkout state with an order
    #[must_use]
    pub fn checkout_state_with_order(order: Order) -> CheckoutState {
        let mut state = checkout_state();
        state.order.data = Some(order);
        state
    }

    /// Loading actions that populate an empty store like [`checkout_state`]
    #[must_use]
    pub fn loading_actions() -> Vec<CheckoutAction> {
        vec![
            CheckoutAction::CheckoutLoaded {
                checkout: checkout(),
                cart: cart(),
                customer: customer(0),
            },
            CheckoutAction::PaymentMethodsLoaded(payment_methods()),
        ]
    }

    /// Card details
    #[must_use]
    pub fn credit_card_instrument() -> PaymentInstrument {
        PaymentInstrument::CreditCard {
            cc_number: "4111111111111111".to_string(),
            cc_name: "BigCommerce".to_string(),
            cc_expiry: checkout_payments_core::payment::CardExpiry {
                month: 10,
                year: 2030,
            },
            cc_cvv: Some("123".to_string()),
        }
    }

    /// Order payload paying with `method_id`
    #[must_use]
    pub fn order_request_body(method_id: &str) -> OrderRequestBody {
        OrderRequestBody::with_payment(
            OrderPaymentRequestBody::new(method_id).with_payment_data(credit_card_instrument()),
        )
    }
}

/// Property-based testing utilities
///
/// proptest strategies for identifiers used across the payment lifecycle.
pub mod properties {
    use proptest::prelude::*;

    /// Arbitrary payment method identifier
    pub fn arb_method_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}"
    }

    /// Arbitrary optional gateway identifier
    pub fn arb_gateway_id() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-z][a-z0-9]{0,11}")
    }
}

/// Drain an action stream into a vector
pub async fn collect_actions<A>(actions: ActionStream<A>) -> Vec<A> {
    actions.collect().await
}

/// Install a test-friendly tracing subscriber (idempotent)
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

//! # Checkout Payments
//!
//! Payment strategy dispatch and lifecycle protocol for checkout.
//!
//! # Architecture
//!
//! ```text
//! caller ──► PaymentStrategyActionCreator ──► PaymentStrategyRegistry
//!                  │                                 │
//!                  │ Requested                       ▼
//!                  │                          Arc<dyn PaymentStrategy>
//!                  │                                 │ initialize / execute /
//!                  │                                 │ finalize / deinitialize
//!                  │ Succeeded | Failed  ◄───────────┘
//!                  ▼
//!            CheckoutStore (CheckoutReducer folds every notification)
//! ```
//!
//! Each lifecycle verb either fails before producing anything (missing
//! payment method, order not awaiting finalization, no registered strategy)
//! or returns a stream of exactly two notifications: `Requested` followed
//! by `Succeeded` or `Failed`. Strategy failures are data, never `Err`.
//!
//! # Usage
//!
//! ```ignore
//! let store = create_checkout_store(CheckoutState::default(), Arc::new(SystemClock), &config);
//! let registry = Arc::new(create_payment_strategy_registry(
//!     Arc::clone(&store),
//!     checkout_client,
//!     payment_client,
//!     &config.registry,
//! )?);
//! let creator = PaymentStrategyActionCreator::new(registry, Arc::clone(&store));
//!
//! let actions = creator.initialize("cc", None).await?;
//! store.dispatch(actions.map(CheckoutAction::from)).await?;
//! ```
//!
//! Callers serialize lifecycle calls per checkout session; nothing here
//! prevents two concurrent calls for the same payment method.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use checkout_payments_core::action::CheckoutAction;
use checkout_payments_core::environment::Clock;
use checkout_payments_core::state::CheckoutState;
use checkout_payments_runtime::Store;
use std::sync::Arc;

mod action_creator;
pub mod config;
mod order_action_creator;
mod payment_action_creator;
mod reducer;
pub mod registry;
pub mod strategies;
mod store;

pub use action_creator::PaymentStrategyActionCreator;
pub use config::{ConfigError, PaymentsConfig, RegistryConfig};
pub use order_action_creator::OrderActionCreator;
pub use payment_action_creator::PaymentActionCreator;
pub use reducer::CheckoutReducer;
pub use registry::{
    PaymentStrategyRegistry, PaymentStrategyRegistryBuilder, create_payment_strategy_registry,
    default_registry_builder,
};
pub use store::dispatch_checked;

/// Dependencies injected into [`CheckoutReducer`]
#[derive(Clone)]
pub struct CheckoutEnvironment {
    /// Time source for initialization timestamps
    pub clock: Arc<dyn Clock>,
}

impl CheckoutEnvironment {
    /// Environment reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// The checkout state store
pub type CheckoutStore = Store<CheckoutState, CheckoutAction, CheckoutEnvironment, CheckoutReducer>;

/// Build the shared checkout store
#[must_use]
pub fn create_checkout_store(
    initial_state: CheckoutState,
    clock: Arc<dyn Clock>,
    config: &PaymentsConfig,
) -> Arc<CheckoutStore> {
    Arc::new(Store::with_config(
        initial_state,
        CheckoutReducer,
        CheckoutEnvironment::new(clock),
        &config.store_config(),
    ))
}

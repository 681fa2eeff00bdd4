//! # Checkout Payments Core
//!
//! Core traits and types for checkout payment orchestration.
//!
//! This crate provides the vocabulary shared by the store runtime, the
//! payment strategies and the action creators that drive them:
//!
//! ## Core Concepts
//!
//! - **State**: [`state::CheckoutState`], the aggregate the store holds
//! - **Action**: Notifications folded into state ([`action::CheckoutAction`])
//! - **Reducer**: Pure function `(State, Action, Environment) → State`
//! - **Strategy**: Provider-specific four-verb payment lifecycle
//!   ([`strategy::PaymentStrategy`])
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use checkout_payments_core::reducer::Reducer;
//!
//! impl Reducer for CheckoutReducer {
//!     type State = CheckoutState;
//!     type Action = CheckoutAction;
//!     type Environment = CheckoutEnvironment;
//!
//!     fn reduce(&self, state: &mut CheckoutState, action: CheckoutAction, env: &CheckoutEnvironment) {
//!         // Fold the notification into state
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Notifications (the action records folded by the store)
pub mod action;

/// Transport collaborators used by order and payment submission
pub mod client;

/// Error taxonomy: precondition, lookup and provider errors
pub mod error;

/// Payment, order and checkout domain types
pub mod payment;

/// Read accessors over [`state::CheckoutState`]
pub mod selector;

/// Checkout state and its sub-states
pub mod state;

/// The payment strategy capability
pub mod strategy;

/// Reducer module - The core trait for state folding
///
/// Reducers are pure functions: `(State, Action, Environment) → State`.
/// They never perform I/O; asynchronous work happens in strategies and
/// action creators, which only talk to state through dispatched actions.
pub mod reducer {
    /// The Reducer trait - folds one action into state
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for OrderReducer {
    ///     type State = OrderState;
    ///     type Action = OrderAction;
    ///     type Environment = ();
    ///
    ///     fn reduce(&self, state: &mut OrderState, action: OrderAction, _env: &()) {
    ///         if let OrderAction::SubmitOrderSucceeded { order } = action {
    ///             state.data = Some(order);
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Fold an action into state
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - Dependency injection traits
///
/// All time-dependent behavior reads the clock through this trait so that
/// reducers stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

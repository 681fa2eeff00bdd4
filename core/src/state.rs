//! Checkout state held by the store.
//!
//! State is owned data, cheap to clone as a snapshot, and only ever changed
//! by the reducer folding dispatched actions.

use crate::action::PaymentStrategyVerb;
use crate::error::PaymentError;
use crate::payment::{Cart, Checkout, Customer, Order, PaymentMethod, PaymentResponse};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Aggregate checkout state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckoutState {
    /// Checkout totals
    pub checkout: Option<Checkout>,
    /// Shopper's cart
    pub cart: Option<Cart>,
    /// Shopper
    pub customer: Option<Customer>,
    /// Current order
    pub order: OrderState,
    /// Payment submission progress
    pub payment: PaymentState,
    /// Payment methods available to the checkout
    pub payment_methods: PaymentMethodsState,
    /// Lifecycle progress of payment strategies
    pub payment_strategies: PaymentStrategyState,
}

/// Order sub-state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderState {
    /// The current order
    pub data: Option<Order>,
    /// Order submission in flight
    pub is_submitting: bool,
    /// Order finalization in flight
    pub is_finalizing: bool,
    /// Last submission error
    pub submit_error: Option<PaymentError>,
    /// Last finalization error
    pub finalize_error: Option<PaymentError>,
}

/// Payment submission sub-state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentState {
    /// Last response from the payment transport
    pub last_response: Option<PaymentResponse>,
    /// Payment submission in flight
    pub is_submitting: bool,
    /// Hosted payment initialization in flight
    pub is_initializing_offsite: bool,
    /// Last submission error
    pub submit_error: Option<PaymentError>,
    /// Last hosted payment initialization error
    pub offsite_error: Option<PaymentError>,
}

/// Payment methods sub-state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentMethodsState {
    /// Loaded payment methods
    pub data: Vec<PaymentMethod>,
}

/// Per-method strategy data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentStrategyData {
    /// Whether the strategy for this method is initialized
    pub is_initialized: bool,
    /// When it was last initialized
    pub initialized_at: Option<DateTime<Utc>>,
}

/// A failed lifecycle verb.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentStrategyFailure {
    /// Method the verb ran for
    pub method_id: String,
    /// The error carried by the `Failed` notification
    pub error: PaymentError,
}

/// Payment strategy sub-state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentStrategyState {
    /// Keyed by method id
    pub data: HashMap<String, PaymentStrategyData>,
    /// Verbs in flight and the method they run for
    pub pending: HashMap<PaymentStrategyVerb, String>,
    /// Last failure per verb
    pub errors: HashMap<PaymentStrategyVerb, PaymentStrategyFailure>,
}

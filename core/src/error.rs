//! Error types for checkout payment operations.
//!
//! Three classes of failure exist and callers handle them differently:
//!
//! - **Precondition errors** ([`PaymentError::MissingData`],
//!   [`PaymentError::OrderFinalizationNotRequired`]) are detected before any
//!   notification is produced and are returned directly.
//! - **Lookup errors** ([`RegistryError`]) mean no strategy matches a key or
//!   payment method. They are also returned directly.
//! - **Provider errors** (everything else) happen inside a strategy call and
//!   travel as the payload of a `Failed` notification.
//!
//! All errors are `Clone + PartialEq` so a notification can carry the exact
//! error a strategy produced.

use std::fmt;
use thiserror::Error;

/// What piece of data was missing when a [`MissingDataError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingDataErrorType {
    /// Checkout has not been loaded
    MissingCheckout,
    /// Cart has not been loaded
    MissingCart,
    /// Customer has not been loaded
    MissingCustomer,
    /// No order exists in state
    MissingOrder,
    /// The order has no identifier yet
    MissingOrderId,
    /// The order request has no payment block
    MissingPayment,
    /// Payment method is not present in state
    MissingPaymentMethod,
    /// Client token required by the provider is absent
    MissingClientToken,
    /// Tokenized payment instrument is absent
    MissingPaymentToken,
}

impl MissingDataErrorType {
    /// Human readable name of the missing data.
    #[must_use]
    pub const fn subject(self) -> &'static str {
        match self {
            Self::MissingCheckout => "checkout data",
            Self::MissingCart => "cart data",
            Self::MissingCustomer => "customer data",
            Self::MissingOrder => "order data",
            Self::MissingOrderId => "order id",
            Self::MissingPayment => "payment data",
            Self::MissingPaymentMethod => "payment method data",
            Self::MissingClientToken => "client token",
            Self::MissingPaymentToken => "payment token",
        }
    }
}

impl fmt::Display for MissingDataErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subject())
    }
}

/// Required data is not available in state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to proceed because {kind} is not available.")]
pub struct MissingDataError {
    /// The kind of data that is missing
    pub kind: MissingDataErrorType,
}

impl MissingDataError {
    /// Create a new missing data error.
    #[must_use]
    pub const fn new(kind: MissingDataErrorType) -> Self {
        Self { kind }
    }
}

impl From<MissingDataErrorType> for MissingDataError {
    fn from(kind: MissingDataErrorType) -> Self {
        Self::new(kind)
    }
}

/// Strategy registry lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Nothing is registered under the requested key.
    #[error("No payment strategy is registered under '{0}'")]
    NotRegistered(String),

    /// No key derived from the payment method resolves to a strategy.
    #[error("No payment strategy can handle payment method '{method_id}' (gateway: {})", .gateway_id.as_deref().unwrap_or("none"))]
    NoStrategyForMethod {
        /// Payment method identifier
        method_id: String,
        /// Gateway identifier, if the method has one
        gateway_id: Option<String>,
    },

    /// A key was registered twice while building the registry.
    #[error("A payment strategy is already registered under '{0}'")]
    AlreadyRegistered(String),
}

/// Errors produced by payment strategy operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Required data is missing from state or from the request.
    #[error(transparent)]
    MissingData(#[from] MissingDataError),

    /// The current order is not waiting for finalization.
    #[error("The current order does not need to be finalized at this stage.")]
    OrderFinalizationNotRequired,

    /// No strategy could be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The request carries invalid or incomplete arguments.
    #[error("Invalid payment arguments: {0}")]
    InvalidArgument(String),

    /// The customer cancelled the payment with the provider.
    #[error("The payment was cancelled by the customer")]
    PaymentCancelled,

    /// The provider declined the payment.
    #[error("The payment was declined: {reason}")]
    PaymentDeclined {
        /// Provider supplied reason
        reason: String,
    },

    /// A transport request failed.
    #[error("Request failed with status {status}: {message}")]
    Request {
        /// Transport status code
        status: u16,
        /// Transport supplied message
        message: String,
    },

    /// The detached strategy task ended without producing a result.
    #[error("Payment strategy task for '{method_id}' was interrupted: {reason}")]
    Interrupted {
        /// Method the strategy was running for
        method_id: String,
        /// Why the task ended
        reason: String,
    },

    /// The checkout store refused an action.
    #[error("Checkout store rejected the action: {0}")]
    Store(String),
}

impl PaymentError {
    /// Whether this error is a precondition failure that must be surfaced
    /// directly rather than as a `Failed` notification.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingData(_) | Self::OrderFinalizationNotRequired
        )
    }

    /// Whether this error came from a registry lookup.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::Registry(_))
    }

    /// The missing data kind, if this is a missing data error.
    #[must_use]
    pub const fn missing_data(&self) -> Option<MissingDataErrorType> {
        match self {
            Self::MissingData(error) => Some(error.kind),
            _ => None,
        }
    }
}

impl From<MissingDataErrorType> for PaymentError {
    fn from(kind: MissingDataErrorType) -> Self {
        Self::MissingData(MissingDataError::new(kind))
    }
}

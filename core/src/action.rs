//! Notifications folded by the checkout store.
//!
//! Every lifecycle call produces a short, ordered stream of actions:
//! a `Requested` action first, then exactly one terminal `Succeeded` or
//! `Failed` action. Payment strategy notifications follow the wire contract
//!
//! ```text
//! { "type": "InitializeRequested", "meta": { "methodId": "cc" } }
//! { "type": "InitializeFailed", "meta": { "methodId": "cc" }, "error": true, "payload": "..." }
//! ```

use crate::error::PaymentError;
use crate::payment::{Cart, Checkout, Customer, Order, PaymentMethod, PaymentResponse};
use futures::stream::BoxStream;
use serde::{Serialize, Serializer};
use std::fmt;

/// A finite, single-consumer stream of actions produced by one lifecycle call.
pub type ActionStream<A> = BoxStream<'static, A>;

/// The four payment strategy lifecycle verbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentStrategyVerb {
    /// Provider setup
    Initialize,
    /// Payment submission
    Execute,
    /// Out-of-band order completion
    Finalize,
    /// Provider teardown
    Deinitialize,
}

impl PaymentStrategyVerb {
    /// Lowercase verb name, used as a metric and log label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Execute => "execute",
            Self::Finalize => "finalize",
            Self::Deinitialize => "deinitialize",
        }
    }
}

impl fmt::Display for PaymentStrategyVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of a lifecycle call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    /// Call started
    Requested,
    /// Call completed
    Succeeded,
    /// Call failed
    Failed,
}

/// Type tag of a payment strategy notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum PaymentStrategyActionType {
    InitializeRequested,
    InitializeSucceeded,
    InitializeFailed,
    ExecuteRequested,
    ExecuteSucceeded,
    ExecuteFailed,
    FinalizeRequested,
    FinalizeSucceeded,
    FinalizeFailed,
    DeinitializeRequested,
    DeinitializeSucceeded,
    DeinitializeFailed,
}

impl PaymentStrategyActionType {
    /// Tag for a verb at a given phase.
    #[must_use]
    pub const fn new(verb: PaymentStrategyVerb, phase: ActionPhase) -> Self {
        use ActionPhase::{Failed, Requested, Succeeded};
        use PaymentStrategyVerb::{Deinitialize, Execute, Finalize, Initialize};

        match (verb, phase) {
            (Initialize, Requested) => Self::InitializeRequested,
            (Initialize, Succeeded) => Self::InitializeSucceeded,
            (Initialize, Failed) => Self::InitializeFailed,
            (Execute, Requested) => Self::ExecuteRequested,
            (Execute, Succeeded) => Self::ExecuteSucceeded,
            (Execute, Failed) => Self::ExecuteFailed,
            (Finalize, Requested) => Self::FinalizeRequested,
            (Finalize, Succeeded) => Self::FinalizeSucceeded,
            (Finalize, Failed) => Self::FinalizeFailed,
            (Deinitialize, Requested) => Self::DeinitializeRequested,
            (Deinitialize, Succeeded) => Self::DeinitializeSucceeded,
            (Deinitialize, Failed) => Self::DeinitializeFailed,
        }
    }

    /// The verb this tag belongs to.
    #[must_use]
    pub const fn verb(self) -> PaymentStrategyVerb {
        match self {
            Self::InitializeRequested | Self::InitializeSucceeded | Self::InitializeFailed => {
                PaymentStrategyVerb::Initialize
            },
            Self::ExecuteRequested | Self::ExecuteSucceeded | Self::ExecuteFailed => {
                PaymentStrategyVerb::Execute
            },
            Self::FinalizeRequested | Self::FinalizeSucceeded | Self::FinalizeFailed => {
                PaymentStrategyVerb::Finalize
            },
            Self::DeinitializeRequested
            | Self::DeinitializeSucceeded
            | Self::DeinitializeFailed => PaymentStrategyVerb::Deinitialize,
        }
    }

    /// The phase this tag belongs to.
    #[must_use]
    pub const fn phase(self) -> ActionPhase {
        match self {
            Self::InitializeRequested
            | Self::ExecuteRequested
            | Self::FinalizeRequested
            | Self::DeinitializeRequested => ActionPhase::Requested,
            Self::InitializeSucceeded
            | Self::ExecuteSucceeded
            | Self::FinalizeSucceeded
            | Self::DeinitializeSucceeded => ActionPhase::Succeeded,
            Self::InitializeFailed
            | Self::ExecuteFailed
            | Self::FinalizeFailed
            | Self::DeinitializeFailed => ActionPhase::Failed,
        }
    }
}

/// Metadata attached to every payment strategy notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStrategyMeta {
    /// The method the lifecycle call resolved
    pub method_id: String,
}

/// A payment strategy lifecycle notification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentStrategyAction {
    /// Type tag
    #[serde(rename = "type")]
    pub kind: PaymentStrategyActionType,
    /// Metadata
    pub meta: PaymentStrategyMeta,
    /// Error marker, set only on `Failed`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    /// The error carried by a `Failed` notification
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error_payload"
    )]
    pub payload: Option<PaymentError>,
}

impl PaymentStrategyAction {
    /// `<Verb>Requested`.
    #[must_use]
    pub fn requested(verb: PaymentStrategyVerb, method_id: impl Into<String>) -> Self {
        Self::with_phase(verb, ActionPhase::Requested, method_id)
    }

    /// `<Verb>Succeeded`.
    #[must_use]
    pub fn succeeded(verb: PaymentStrategyVerb, method_id: impl Into<String>) -> Self {
        Self::with_phase(verb, ActionPhase::Succeeded, method_id)
    }

    /// `<Verb>Failed` carrying `error`.
    #[must_use]
    pub fn failed(
        verb: PaymentStrategyVerb,
        method_id: impl Into<String>,
        error: PaymentError,
    ) -> Self {
        Self {
            kind: PaymentStrategyActionType::new(verb, ActionPhase::Failed),
            meta: PaymentStrategyMeta {
                method_id: method_id.into(),
            },
            error: true,
            payload: Some(error),
        }
    }

    fn with_phase(verb: PaymentStrategyVerb, phase: ActionPhase, method_id: impl Into<String>) -> Self {
        Self {
            kind: PaymentStrategyActionType::new(verb, phase),
            meta: PaymentStrategyMeta {
                method_id: method_id.into(),
            },
            error: false,
            payload: None,
        }
    }

    /// The method id carried in `meta`.
    #[must_use]
    pub fn method_id(&self) -> &str {
        &self.meta.method_id
    }
}

fn serialize_error_payload<S>(payload: &Option<PaymentError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match payload {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Order submission and finalization notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderAction {
    /// Order submission started
    SubmitOrderRequested,
    /// Order submitted
    SubmitOrderSucceeded {
        /// The created order
        order: Order,
    },
    /// Order submission failed
    SubmitOrderFailed {
        /// Transport error
        error: PaymentError,
    },
    /// Order finalization started
    FinalizeOrderRequested {
        /// Order being finalized
        order_id: u64,
    },
    /// Order finalized
    FinalizeOrderSucceeded {
        /// The finalized order
        order: Order,
    },
    /// Order finalization failed
    FinalizeOrderFailed {
        /// Transport error
        error: PaymentError,
    },
}

/// Payment submission notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentAction {
    /// Payment submission started
    SubmitPaymentRequested,
    /// Payment submitted
    SubmitPaymentSucceeded {
        /// Transport response
        response: PaymentResponse,
    },
    /// Payment submission failed
    SubmitPaymentFailed {
        /// Transport error
        error: PaymentError,
    },
    /// Hosted payment initialization started
    InitializeOffsitePaymentRequested,
    /// Hosted payment initialized
    InitializeOffsitePaymentSucceeded {
        /// Transport response, carrying the redirect target
        response: PaymentResponse,
    },
    /// Hosted payment initialization failed
    InitializeOffsitePaymentFailed {
        /// Transport error
        error: PaymentError,
    },
}

/// Every action the checkout store folds.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckoutAction {
    /// Checkout, cart and customer loaded upstream
    CheckoutLoaded {
        /// Checkout totals
        checkout: Checkout,
        /// Cart
        cart: Cart,
        /// Customer
        customer: Customer,
    },
    /// Payment methods loaded upstream
    PaymentMethodsLoaded(Vec<PaymentMethod>),
    /// A single payment method (re)loaded upstream
    PaymentMethodLoaded(PaymentMethod),
    /// Current order loaded upstream
    OrderLoaded(Order),
    /// Payment strategy lifecycle notification
    PaymentStrategy(PaymentStrategyAction),
    /// Order notification
    Order(OrderAction),
    /// Payment notification
    Payment(PaymentAction),
}

impl CheckoutAction {
    /// The error carried by a failed notification.
    #[must_use]
    pub const fn error(&self) -> Option<&PaymentError> {
        match self {
            Self::PaymentStrategy(action) if action.error => action.payload.as_ref(),
            Self::Order(
                OrderAction::SubmitOrderFailed { error } | OrderAction::FinalizeOrderFailed { error },
            )
            | Self::Payment(
                PaymentAction::SubmitPaymentFailed { error }
                | PaymentAction::InitializeOffsitePaymentFailed { error },
            ) => Some(error),
            _ => None,
        }
    }
}

impl From<PaymentStrategyAction> for CheckoutAction {
    fn from(action: PaymentStrategyAction) -> Self {
        Self::PaymentStrategy(action)
    }
}

impl From<OrderAction> for CheckoutAction {
    fn from(action: OrderAction) -> Self {
        Self::Order(action)
    }
}

impl From<PaymentAction> for CheckoutAction {
    fn from(action: PaymentAction) -> Self {
        Self::Payment(action)
    }
}

//! Payment, order and checkout domain types.
//!
//! These are the snapshots loaded upstream (checkout, cart, customer,
//! payment methods) and the payloads exchanged with the transports when an
//! order or payment is submitted. Amounts are integer minor units (cents).

use serde::{Deserialize, Serialize};

/// How a payment method collects payment details.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethodType {
    /// Details are collected in the storefront and sent through the API
    #[default]
    Api,
    /// The shopper is redirected to a provider hosted page
    Hosted,
    /// Payment happens outside the checkout (bank deposit, cheque)
    Offline,
    /// Provider offers several options behind one method
    MultiOption,
}

/// Display and behavior configuration of a payment method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodConfig {
    /// Name shown to the shopper
    pub display_name: Option<String>,
    /// Whether the method runs against the provider's sandbox
    #[serde(default)]
    pub test_mode: bool,
    /// Whether instruments can be stored for reuse
    #[serde(default)]
    pub is_vaulting_enabled: bool,
}

/// A payment method available to the current checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Method identifier (`"cc"`, `"paypal"`, `"klarna"`)
    pub id: String,
    /// Gateway identifier when the method is served through a gateway
    pub gateway: Option<String>,
    /// How the method collects payment details
    #[serde(rename = "type", default)]
    pub method_type: PaymentMethodType,
    /// Token used to bootstrap a provider SDK
    pub client_token: Option<String>,
    /// Pre-tokenized instrument handed over by the provider
    pub nonce: Option<String>,
    /// Display configuration
    #[serde(default)]
    pub config: PaymentMethodConfig,
}

impl PaymentMethod {
    /// Create an API payment method with no gateway.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gateway: None,
            method_type: PaymentMethodType::Api,
            client_token: None,
            nonce: None,
            config: PaymentMethodConfig::default(),
        }
    }

    /// Set the gateway identifier.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Set the method type.
    #[must_use]
    pub const fn with_type(mut self, method_type: PaymentMethodType) -> Self {
        self.method_type = method_type;
        self
    }

    /// Set the client token.
    #[must_use]
    pub fn with_client_token(mut self, token: impl Into<String>) -> Self {
        self.client_token = Some(token.into());
        self
    }

    /// Whether this method matches an id and an optional gateway.
    ///
    /// Without a gateway only the id has to match.
    #[must_use]
    pub fn matches(&self, method_id: &str, gateway_id: Option<&str>) -> bool {
        self.id == method_id
            && gateway_id.is_none_or(|gateway| self.gateway.as_deref() == Some(gateway))
    }
}

/// Card expiry date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardExpiry {
    /// Month, 1-12
    pub month: u8,
    /// Four digit year
    pub year: u16,
}

/// Payment details sent along with an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaymentInstrument {
    /// Raw card details
    #[serde(rename_all = "camelCase")]
    CreditCard {
        /// Card number
        cc_number: String,
        /// Cardholder name
        cc_name: String,
        /// Expiry date
        cc_expiry: CardExpiry,
        /// Verification value
        cc_cvv: Option<String>,
    },
    /// Provider issued single-use token
    Nonce {
        /// The token
        nonce: String,
    },
    /// Previously stored instrument
    #[serde(rename_all = "camelCase")]
    Vaulted {
        /// Stored instrument identifier
        instrument_id: String,
    },
}

/// The `payment` block of an order submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentRequestBody {
    /// Payment method identifier
    pub name: String,
    /// Gateway identifier
    pub gateway: Option<String>,
    /// Payment details
    pub payment_data: Option<PaymentInstrument>,
}

impl OrderPaymentRequestBody {
    /// Create a payment block for a method.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gateway: None,
            payment_data: None,
        }
    }

    /// Set the gateway identifier.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Set the payment details.
    #[must_use]
    pub fn with_payment_data(mut self, data: PaymentInstrument) -> Self {
        self.payment_data = Some(data);
        self
    }
}

/// Order submission payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestBody {
    /// Payment block
    pub payment: Option<OrderPaymentRequestBody>,
    /// Whether the shopper applies store credit
    #[serde(default)]
    pub use_store_credit: bool,
    /// Message left by the shopper
    pub customer_message: Option<String>,
}

impl OrderRequestBody {
    /// Create a payload paying with the given payment block.
    #[must_use]
    pub const fn with_payment(payment: OrderPaymentRequestBody) -> Self {
        Self {
            payment: Some(payment),
            use_store_credit: false,
            customer_message: None,
        }
    }

    /// Set the store credit flag.
    #[must_use]
    pub const fn use_store_credit(mut self, use_store_credit: bool) -> Self {
        self.use_store_credit = use_store_credit;
        self
    }

    /// Method and gateway identifiers named by the payment block.
    #[must_use]
    pub fn payment_method_ids(&self) -> Option<(&str, Option<&str>)> {
        self.payment
            .as_ref()
            .map(|payment| (payment.name.as_str(), payment.gateway.as_deref()))
    }

    /// The payload as sent to the order endpoint: payment details never leave
    /// through order submission, only the method name and gateway.
    #[must_use]
    pub fn without_payment_data(&self) -> Self {
        let mut body = self.clone();
        if let Some(payment) = body.payment.as_mut() {
            payment.payment_data = None;
        }
        body
    }
}

/// Progress of the payment attached to an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment has not been submitted
    Initialize,
    /// Provider acknowledged the payment, order awaits finalization
    Acknowledge,
    /// Provider asked the storefront to finalize the order
    Finalize,
    /// Payment captured or authorized
    Complete,
    /// Provider declined the payment
    Declined,
}

/// The payment attached to an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    /// Method identifier
    pub provider_id: String,
    /// Gateway identifier
    pub gateway_id: Option<String>,
    /// Payment progress
    pub status: PaymentStatus,
    /// Amount charged to this payment
    pub amount_cents: i64,
}

/// A submitted order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    pub order_id: u64,
    /// Cart the order was created from
    pub cart_id: String,
    /// Whether the order has been completed
    pub is_complete: bool,
    /// Order total
    pub grand_total_cents: i64,
    /// Payment attached to the order
    pub payment: Option<OrderPayment>,
}

impl Order {
    /// Whether the order waits for an out-of-band finalization.
    #[must_use]
    pub fn requires_finalization(&self) -> bool {
        !self.is_complete
            && self.payment.as_ref().is_some_and(|payment| {
                matches!(
                    payment.status,
                    PaymentStatus::Acknowledge | PaymentStatus::Finalize
                )
            })
    }
}

/// Checkout totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    /// Checkout identifier
    pub id: String,
    /// Amount due, including taxes and shipping
    pub grand_total_cents: i64,
}

/// The shopper's cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart identifier
    pub id: String,
    /// Subtotal before discounts
    pub base_amount_cents: i64,
    /// ISO currency code
    pub currency: String,
}

/// The shopper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer identifier, absent for guests
    pub id: Option<u64>,
    /// Email address
    pub email: String,
    /// Store credit available to the customer
    pub store_credit_cents: i64,
}

/// Payment submission payload sent to the payment transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Order being paid
    pub order_id: u64,
    /// Method identifier
    pub method_id: String,
    /// Gateway identifier
    pub gateway_id: Option<String>,
    /// Payment details
    pub instrument: Option<PaymentInstrument>,
    /// Amount to charge
    pub amount_cents: i64,
}

/// Payment transport response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Resulting payment status
    pub status: PaymentStatus,
    /// Provider transaction reference
    pub transaction_id: Option<String>,
    /// Where to send the shopper for hosted payments
    pub redirect_url: Option<String>,
}

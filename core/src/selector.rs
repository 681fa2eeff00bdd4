//! Read accessors over [`CheckoutState`].
//!
//! Action creators and strategies never reach into sub-states directly;
//! they ask these selectors, which also own the "required data is absent"
//! error mapping.

use crate::action::PaymentStrategyVerb;
use crate::error::{MissingDataErrorType, PaymentError};
use crate::payment::{Cart, Checkout, Customer, Order, PaymentMethod};
use crate::state::CheckoutState;

impl CheckoutState {
    /// Find a payment method by id and, when given, gateway.
    #[must_use]
    pub fn payment_method(
        &self,
        method_id: &str,
        gateway_id: Option<&str>,
    ) -> Option<&PaymentMethod> {
        self.payment_methods
            .data
            .iter()
            .find(|method| method.matches(method_id, gateway_id))
    }

    /// Find a payment method or fail with a missing data error.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingData`] when the method is not loaded.
    pub fn payment_method_or_err(
        &self,
        method_id: &str,
        gateway_id: Option<&str>,
    ) -> Result<&PaymentMethod, PaymentError> {
        self.payment_method(method_id, gateway_id)
            .ok_or_else(|| MissingDataErrorType::MissingPaymentMethod.into())
    }

    /// The current order.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.data.as_ref()
    }

    /// The current order or a missing data error.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingData`] when no order exists.
    pub fn order_or_err(&self) -> Result<&Order, PaymentError> {
        self.order()
            .ok_or_else(|| MissingDataErrorType::MissingOrder.into())
    }

    /// The checkout totals.
    #[must_use]
    pub const fn checkout(&self) -> Option<&Checkout> {
        self.checkout.as_ref()
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// The customer.
    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Whether the shopper still owes money once store credit (if used) is
    /// applied.
    ///
    /// A missing checkout counts as a zero total and a missing customer as
    /// zero store credit.
    #[must_use]
    pub fn is_payment_data_required(&self, use_store_credit: bool) -> bool {
        let grand_total = self.checkout().map_or(0, |checkout| checkout.grand_total_cents);
        let store_credit = self.customer().map_or(0, |customer| customer.store_credit_cents);

        let outstanding = if use_store_credit {
            grand_total.saturating_sub(store_credit)
        } else {
            grand_total
        };

        outstanding > 0
    }

    /// Whether the current order waits for an out-of-band finalization.
    #[must_use]
    pub fn is_order_finalization_required(&self) -> bool {
        self.order().is_some_and(Order::requires_finalization)
    }

    /// Whether the strategy for a method has been initialized.
    #[must_use]
    pub fn is_payment_strategy_initialized(&self, method_id: &str) -> bool {
        self.payment_strategies
            .data
            .get(method_id)
            .is_some_and(|data| data.is_initialized)
    }

    /// Whether a verb is in flight, optionally for a specific method.
    #[must_use]
    pub fn is_payment_strategy_pending(
        &self,
        verb: PaymentStrategyVerb,
        method_id: Option<&str>,
    ) -> bool {
        self.payment_strategies
            .pending
            .get(&verb)
            .is_some_and(|pending| method_id.is_none_or(|id| pending == id))
    }

    /// Last error of a verb, optionally for a specific method.
    #[must_use]
    pub fn payment_strategy_error(
        &self,
        verb: PaymentStrategyVerb,
        method_id: Option<&str>,
    ) -> Option<&PaymentError> {
        self.payment_strategies
            .errors
            .get(&verb)
            .filter(|failure| method_id.is_none_or(|id| failure.method_id == id))
            .map(|failure| &failure.error)
    }
}

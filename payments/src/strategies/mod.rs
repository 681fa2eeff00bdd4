//! Provider-neutral payment strategies.
//!
//! Each strategy drives the shared order and payment action creators and
//! folds their notifications into the store with
//! [`dispatch_checked`](crate::dispatch_checked), so a transport failure
//! becomes the strategy's own failure.

mod credit_card;
mod no_payment_data_required;
mod offline;
mod offsite;

pub use credit_card::CreditCardPaymentStrategy;
pub use no_payment_data_required::NoPaymentDataRequiredPaymentStrategy;
pub use offline::OfflinePaymentStrategy;
pub use offsite::OffsitePaymentStrategy;

use crate::{CheckoutStore, OrderActionCreator, dispatch_checked};
use checkout_payments_core::error::PaymentError;
use checkout_payments_core::payment::OrderRequestBody;
use checkout_payments_core::state::CheckoutState;

/// Submit `payload` as an order and fold the outcome
async fn submit_order(
    store: &CheckoutStore,
    order_action_creator: &OrderActionCreator,
    payload: &OrderRequestBody,
) -> Result<CheckoutState, PaymentError> {
    let state = store.snapshot().await;
    let actions = order_action_creator.submit_order(&state, payload)?;
    dispatch_checked(store, actions).await
}

//! Folds checkout notifications into [`CheckoutState`].

use crate::CheckoutEnvironment;
use checkout_payments_core::action::{
    ActionPhase, CheckoutAction, OrderAction, PaymentAction, PaymentStrategyAction,
    PaymentStrategyVerb,
};
use checkout_payments_core::payment::{PaymentResponse, PaymentStatus};
use checkout_payments_core::reducer::Reducer;
use checkout_payments_core::state::{
    CheckoutState, OrderState, PaymentState, PaymentStrategyData, PaymentStrategyFailure,
    PaymentStrategyState,
};

/// Reducer for the whole checkout state
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckoutReducer;

impl Reducer for CheckoutReducer {
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        match action {
            CheckoutAction::CheckoutLoaded {
                checkout,
                cart,
                customer,
            } => {
                state.checkout = Some(checkout);
                state.cart = Some(cart);
                state.customer = Some(customer);
            },
            CheckoutAction::PaymentMethodsLoaded(methods) => {
                state.payment_methods.data = methods;
            },
            CheckoutAction::PaymentMethodLoaded(method) => {
                let methods = &mut state.payment_methods.data;
                match methods
                    .iter_mut()
                    .find(|existing| existing.id == method.id && existing.gateway == method.gateway)
                {
                    Some(existing) => *existing = method,
                    None => methods.push(method),
                }
            },
            CheckoutAction::OrderLoaded(order) => {
                state.order.data = Some(order);
            },
            CheckoutAction::PaymentStrategy(action) => {
                reduce_payment_strategy(&mut state.payment_strategies, action, env);
            },
            CheckoutAction::Order(action) => reduce_order(&mut state.order, action),
            CheckoutAction::Payment(action) => {
                if let PaymentAction::SubmitPaymentSucceeded { response }
                | PaymentAction::InitializeOffsitePaymentSucceeded { response } = &action
                {
                    apply_payment_response(state, response);
                }
                reduce_payment(&mut state.payment, action);
            },
        }
    }
}

fn reduce_payment_strategy(
    state: &mut PaymentStrategyState,
    action: PaymentStrategyAction,
    env: &CheckoutEnvironment,
) {
    let verb = action.kind.verb();
    let method_id = action.meta.method_id;

    match action.kind.phase() {
        ActionPhase::Requested => {
            state.errors.remove(&verb);
            state.pending.insert(verb, method_id);
        },
        ActionPhase::Succeeded => {
            clear_pending(state, verb, &method_id);
            match verb {
                PaymentStrategyVerb::Initialize => {
                    state.data.insert(
                        method_id,
                        PaymentStrategyData {
                            is_initialized: true,
                            initialized_at: Some(env.clock.now()),
                        },
                    );
                },
                PaymentStrategyVerb::Deinitialize => {
                    state.data.insert(method_id, PaymentStrategyData::default());
                },
                PaymentStrategyVerb::Execute | PaymentStrategyVerb::Finalize => {},
            }
        },
        ActionPhase::Failed => {
            clear_pending(state, verb, &method_id);
            if let Some(error) = action.payload {
                state
                    .errors
                    .insert(verb, PaymentStrategyFailure { method_id, error });
            }
        },
    }
}

// A terminal action only clears the pending marker it owns; another method
// may have been requested in between.
fn clear_pending(state: &mut PaymentStrategyState, verb: PaymentStrategyVerb, method_id: &str) {
    if state.pending.get(&verb).is_some_and(|pending| pending == method_id) {
        state.pending.remove(&verb);
    }
}

fn reduce_order(state: &mut OrderState, action: OrderAction) {
    match action {
        OrderAction::SubmitOrderRequested => {
            state.is_submitting = true;
            state.submit_error = None;
        },
        OrderAction::SubmitOrderSucceeded { order } => {
            state.is_submitting = false;
            state.data = Some(order);
        },
        OrderAction::SubmitOrderFailed { error } => {
            state.is_submitting = false;
            state.submit_error = Some(error);
        },
        OrderAction::FinalizeOrderRequested { .. } => {
            state.is_finalizing = true;
            state.finalize_error = None;
        },
        OrderAction::FinalizeOrderSucceeded { order } => {
            state.is_finalizing = false;
            state.data = Some(order);
        },
        OrderAction::FinalizeOrderFailed { error } => {
            state.is_finalizing = false;
            state.finalize_error = Some(error);
        },
    }
}

fn reduce_payment(state: &mut PaymentState, action: PaymentAction) {
    match action {
        PaymentAction::SubmitPaymentRequested => {
            state.is_submitting = true;
            state.submit_error = None;
        },
        PaymentAction::SubmitPaymentSucceeded { response } => {
            state.is_submitting = false;
            state.last_response = Some(response);
        },
        PaymentAction::SubmitPaymentFailed { error } => {
            state.is_submitting = false;
            state.submit_error = Some(error);
        },
        PaymentAction::InitializeOffsitePaymentRequested => {
            state.is_initializing_offsite = true;
            state.offsite_error = None;
        },
        PaymentAction::InitializeOffsitePaymentSucceeded { response } => {
            state.is_initializing_offsite = false;
            state.last_response = Some(response);
        },
        PaymentAction::InitializeOffsitePaymentFailed { error } => {
            state.is_initializing_offsite = false;
            state.offsite_error = Some(error);
        },
    }
}

// The payment transport answers with the new payment status; mirror it on the
// order so finalization and completion selectors see it.
fn apply_payment_response(state: &mut CheckoutState, response: &PaymentResponse) {
    if let Some(order) = state.order.data.as_mut() {
        if let Some(payment) = order.payment.as_mut() {
            payment.status = response.status;
        }
        if response.status == PaymentStatus::Complete {
            order.is_complete = true;
        }
    }
}

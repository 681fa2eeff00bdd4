//! Payment strategy registry.
//!
//! Maps strategy keys to shared strategy instances. Built once through
//! [`PaymentStrategyRegistryBuilder`] and read-only afterwards, so lookups
//! need no locking.
//!
//! Lookup by payment method tries, in order:
//! 1. the gateway id (`adyenv2` for the `scheme` method of that gateway)
//! 2. the method id (`braintree`, `paypal`, `cc`)
//! 3. the key derived from the method type, when fallback is enabled
//!    (`api` → `creditcard`, `hosted` → `offsite`, `offline` → `offline`)
//!
//! Nothing matching is a [`RegistryError`], never a silent default.

use crate::config::RegistryConfig;
use crate::strategies::{
    CreditCardPaymentStrategy, NoPaymentDataRequiredPaymentStrategy, OfflinePaymentStrategy,
    OffsitePaymentStrategy,
};
use crate::{CheckoutStore, OrderActionCreator, PaymentActionCreator};
use checkout_payments_core::client::{CheckoutClient, PaymentClient};
use checkout_payments_core::error::RegistryError;
use checkout_payments_core::payment::{PaymentMethod, PaymentMethodType};
use checkout_payments_core::strategy::PaymentStrategy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key of the strategy used when the order needs no payment data
pub const NO_PAYMENT_DATA_REQUIRED: &str = "nopaymentdatarequired";
/// Key of the built-in card strategy
pub const CREDIT_CARD: &str = "creditcard";
/// Key of the built-in hosted payment strategy
pub const OFFSITE: &str = "offsite";
/// Key of the built-in offline payment strategy
pub const OFFLINE: &str = "offline";

/// Collects strategies before freezing them into a [`PaymentStrategyRegistry`]
#[derive(Default)]
pub struct PaymentStrategyRegistryBuilder {
    strategies: HashMap<String, Arc<dyn PaymentStrategy>>,
    method_type_fallback: bool,
}

impl PaymentStrategyRegistryBuilder {
    /// Empty builder with method-type fallback enabled
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
            method_type_fallback: true,
        }
    }

    /// Register `strategy` under `key`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `key` is taken.
    pub fn register(
        mut self,
        key: impl Into<String>,
        strategy: Arc<dyn PaymentStrategy>,
    ) -> Result<Self, RegistryError> {
        let key = key.into();
        if self.strategies.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(key));
        }
        self.strategies.insert(key, strategy);
        Ok(self)
    }

    /// Enable or disable resolution by payment method type
    #[must_use]
    pub const fn method_type_fallback(mut self, enabled: bool) -> Self {
        self.method_type_fallback = enabled;
        self
    }

    /// Freeze the registry
    #[must_use]
    pub fn build(self) -> PaymentStrategyRegistry {
        PaymentStrategyRegistry {
            strategies: self.strategies,
            method_type_fallback: self.method_type_fallback,
        }
    }
}

/// Read-only map from strategy key to strategy
pub struct PaymentStrategyRegistry {
    strategies: HashMap<String, Arc<dyn PaymentStrategy>>,
    method_type_fallback: bool,
}

impl fmt::Debug for PaymentStrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentStrategyRegistry")
            .field("keys", &self.keys())
            .field("method_type_fallback", &self.method_type_fallback)
            .finish()
    }
}

impl PaymentStrategyRegistry {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> PaymentStrategyRegistryBuilder {
        PaymentStrategyRegistryBuilder::new()
    }

    /// Strategy registered under `key`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] when nothing is registered
    /// under `key`.
    pub fn get(&self, key: &str) -> Result<Arc<dyn PaymentStrategy>, RegistryError> {
        self.strategies
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered(key.to_string()))
    }

    /// Strategy handling `method`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoStrategyForMethod`] when no derived key
    /// resolves.
    pub fn get_by_method(&self, method: &PaymentMethod) -> Result<Arc<dyn PaymentStrategy>, RegistryError> {
        let type_key = self
            .method_type_fallback
            .then(|| method_type_key(method.method_type))
            .flatten();

        let resolved = method
            .gateway
            .as_deref()
            .into_iter()
            .chain(std::iter::once(method.id.as_str()))
            .chain(type_key)
            .find_map(|key| self.strategies.get(key).map(|strategy| (key, strategy)));

        match resolved {
            Some((key, strategy)) => {
                tracing::debug!(method_id = %method.id, key, "Resolved payment strategy");
                Ok(Arc::clone(strategy))
            },
            None => Err(RegistryError::NoStrategyForMethod {
                method_id: method.id.clone(),
                gateway_id: method.gateway.clone(),
            }),
        }
    }

    /// Whether a strategy is registered under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    /// Registered keys, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

const fn method_type_key(method_type: PaymentMethodType) -> Option<&'static str> {
    match method_type {
        PaymentMethodType::Api => Some(CREDIT_CARD),
        PaymentMethodType::Hosted => Some(OFFSITE),
        PaymentMethodType::Offline => Some(OFFLINE),
        PaymentMethodType::MultiOption => None,
    }
}

/// Builder holding the built-in strategies allowed by `config`
///
/// Vendor strategies can be registered on the returned builder before
/// [`build`](PaymentStrategyRegistryBuilder::build).
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyRegistered`] if a built-in key is
/// registered twice.
pub fn default_registry_builder(
    store: &Arc<CheckoutStore>,
    checkout_client: Arc<dyn CheckoutClient>,
    payment_client: Arc<dyn PaymentClient>,
    config: &RegistryConfig,
) -> Result<PaymentStrategyRegistryBuilder, RegistryError> {
    let order_action_creator = OrderActionCreator::new(checkout_client);
    let payment_action_creator = PaymentActionCreator::new(payment_client);

    let built_in: [(&str, Arc<dyn PaymentStrategy>); 4] = [
        (
            NO_PAYMENT_DATA_REQUIRED,
            Arc::new(NoPaymentDataRequiredPaymentStrategy::new(
                Arc::clone(store),
                order_action_creator.clone(),
            )),
        ),
        (
            CREDIT_CARD,
            Arc::new(CreditCardPaymentStrategy::new(
                Arc::clone(store),
                order_action_creator.clone(),
                payment_action_creator.clone(),
            )),
        ),
        (
            OFFSITE,
            Arc::new(OffsitePaymentStrategy::new(
                Arc::clone(store),
                order_action_creator.clone(),
                payment_action_creator,
            )),
        ),
        (
            OFFLINE,
            Arc::new(OfflinePaymentStrategy::new(Arc::clone(store), order_action_creator)),
        ),
    ];

    let mut builder = PaymentStrategyRegistry::builder().method_type_fallback(config.method_type_fallback);
    for (key, strategy) in built_in {
        if config.is_disabled(key) {
            tracing::info!(key, "Payment strategy disabled by configuration");
            continue;
        }
        builder = builder.register(key, strategy)?;
    }
    Ok(builder)
}

/// Registry holding the built-in strategies allowed by `config`
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyRegistered`] if a built-in key is
/// registered twice.
pub fn create_payment_strategy_registry(
    store: Arc<CheckoutStore>,
    checkout_client: Arc<dyn CheckoutClient>,
    payment_client: Arc<dyn PaymentClient>,
    config: &RegistryConfig,
) -> Result<PaymentStrategyRegistry, RegistryError> {
    let registry = default_registry_builder(&store, checkout_client, payment_client, config)?.build();
    tracing::info!(keys = ?registry.keys(), "Payment strategy registry created");
    Ok(registry)
}

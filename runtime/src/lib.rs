//! # Checkout Payments Runtime
//!
//! Runtime implementation of the checkout state store.
//!
//! The [`Store`] owns state behind a lock and folds every dispatched action
//! through a reducer under a single write lock, so concurrent notification
//! streams interleave without corrupting state.
//!
//! ## Core Components
//!
//! - **Store**: Manages state and applies actions through the reducer
//! - **Stream dispatch**: Folds a notification stream item by item
//! - **Action broadcast**: Lets observers (UI layers) watch every folded action
//!
//! ## Example
//!
//! ```ignore
//! use checkout_payments_runtime::Store;
//!
//! let store = Store::new(CheckoutState::default(), CheckoutReducer, environment);
//!
//! // Fold a single action
//! store.send(CheckoutAction::PaymentMethodsLoaded(methods)).await?;
//!
//! // Fold a notification stream produced by an action creator
//! let actions = creator.initialize("cc", None).await?;
//! let state = store.dispatch(actions.map(CheckoutAction::from)).await?;
//!
//! // Read state
//! let loaded = store.state(|s| s.payment_methods.data.len()).await;
//! ```

use checkout_payments_core::reducer::Reducer;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for a matching action
        ///
        /// Returned by `wait_for` when the timeout expires before a matching
        /// action is folded.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use checkout_payments_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for slow observers
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Store module - The runtime for checkout state
pub mod store {
    use super::{Arc, AtomicBool, Duration, Ordering, Reducer, RwLock, StoreConfig, StoreError};
    use futures::{Stream, StreamExt};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (state folding)
    /// 3. Environment (injected dependencies)
    /// 4. Action broadcast (observers)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: AtomicBool,
        /// Every folded action is broadcast to observers after the fold.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`] (broadcast capacity 16).
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, &StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let store = Store::with_config(
        ///     CheckoutState::default(),
        ///     CheckoutReducer,
        ///     environment,
        ///     &StoreConfig::default().with_broadcast_capacity(256),
        /// );
        /// ```
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: &StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Broadcasts the action to observers
        ///
        /// Concurrent `send()` calls serialize at the write lock, which makes
        /// the fold last-applied-wins per field.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::trace!(?action, "Folding action");
            metrics::counter!("store.actions.total").increment(1);

            {
                let mut state = self.state.write().await;
                self.reducer
                    .reduce(&mut *state, action.clone(), &self.environment);
            }

            // No receivers is not an error: nobody is observing.
            let _ = self.action_broadcast.send(action);

            Ok(())
        }

        /// Fold a stream of actions in order and return the resulting state
        ///
        /// Each item is applied with [`send`](Self::send) before the next one
        /// is polled, so intermediate states are observable between items.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store shuts down
        /// while the stream is being folded; remaining items are dropped.
        pub async fn dispatch<St>(&self, actions: St) -> Result<S, StoreError>
        where
            St: Stream<Item = A> + Send,
            S: Clone,
        {
            let mut actions = std::pin::pin!(actions);
            while let Some(action) = actions.next().await {
                self.send(action).await?;
            }
            Ok(self.snapshot().await)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.payment_methods.data.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Clone the current state
        pub async fn snapshot(&self) -> S
        where
            S: Clone,
        {
            self.state(S::clone).await
        }

        /// Subscribe to every action folded from now on
        ///
        /// If the receiver lags it skips old actions and receives
        /// `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Wait for the next folded action matching `predicate`
        ///
        /// Subscribe happens before the wait starts; actions folded earlier are
        /// not seen. Pair it with a concurrent dispatch.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before `timeout`
        /// - [`StoreError::ChannelClosed`]: the store was dropped
        pub async fn wait_for<F>(&self, predicate: F, timeout: Duration) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Stop accepting actions
        ///
        /// Actions already being folded complete; every later `send()` fails
        /// with [`StoreError::ShutdownInProgress`].
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Whether [`shutdown`](Self::shutdown) has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }
    }
}

pub use store::Store;

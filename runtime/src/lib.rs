//! # Todo Store Runtime
//!
//! Runtime implementation for the todo store.
//!
//! This crate provides the [`Store`] that coordinates reducer execution,
//! publishes each new state and runs the effects reducers return.
//!
//! ## Core Components
//!
//! - **Store**: Holds the current state and the reducer that replaces it
//! - **Publication**: Every processed action installs a new `Arc<S>` and
//!   notifies listeners, watch receivers and action observers before `send`
//!   returns
//! - **Effect Executor**: Runs effect descriptions and feeds produced actions
//!   back into the reducer
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let _subscription = store.listen(|state| println!("{state:?}"));
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use todo_store_core::{SmallVec, effect::Effect, reducer::Reducer};

pub use error::StoreError;
pub use store::{Store, Subscription};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept producing actions past the configured limit
        ///
        /// Every action applied before the limit was hit stays applied and
        /// published; the remaining queued actions are dropped.
        #[error("Effect feedback exceeded {limit} actions in a single send")]
        FeedbackLimitExceeded {
            /// The configured `max_actions_per_send`
            limit: usize,
        },
    }
}

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use todo_store_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_action_broadcast_capacity(256)
///     .with_max_actions_per_send(8);
///
/// assert_eq!(config.action_broadcast_capacity, 256);
/// assert_eq!(config.max_actions_per_send, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for each lagging action observer
    pub action_broadcast_capacity: usize,
    /// Upper bound on actions processed by one `send`, including effect feedback
    pub max_actions_per_send: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    ///
    /// Both values are raised to at least 1.
    #[must_use]
    pub const fn new(action_broadcast_capacity: usize, max_actions_per_send: usize) -> Self {
        Self {
            action_broadcast_capacity: 0,
            max_actions_per_send: 0,
        }
        .with_action_broadcast_capacity(action_broadcast_capacity)
        .with_max_actions_per_send(max_actions_per_send)
    }

    /// Set the action broadcast capacity
    ///
    /// Values below 1 are raised to 1, the smallest capacity a broadcast
    /// channel accepts.
    #[must_use]
    pub const fn with_action_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.action_broadcast_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }

    /// Set the per-send action limit
    ///
    /// Values below 1 are raised to 1 so the action passed to `send` is
    /// always processed.
    #[must_use]
    pub const fn with_max_actions_per_send(mut self, limit: usize) -> Self {
        self.max_actions_per_send = if limit == 0 { 1 } else { limit };
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            action_broadcast_capacity: 16,
            max_actions_per_send: 64,
        }
    }
}

/// Callback invoked with every newly published state
type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Registered state listeners, in registration order
struct ListenerRegistry<S> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener<S>)>>,
}

impl<S> ListenerRegistry<S> {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn insert(&self, listener: Listener<S>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Call every listener with `state` while it is still the current state
    ///
    /// The registry lock is released before any listener runs, so listeners
    /// may subscribe, unsubscribe or send further actions. Delivery stops as
    /// soon as `is_current` reports a newer state, since that state's own
    /// publication reaches every listener.
    fn notify(&self, state: &Arc<S>, is_current: impl Fn(&Arc<S>) -> bool) {
        let listeners: Vec<Listener<S>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let mut notified = 0_u64;
        for listener in &listeners {
            if !is_current(state) {
                tracing::trace!(
                    skipped = listeners.len() as u64 - notified,
                    "State superseded before all listeners ran"
                );
                break;
            }
            listener(state);
            notified += 1;
        }

        metrics::counter!("store.listeners.notified").increment(notified);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, Effect, Listener, ListenerRegistry, Reducer, SmallVec, StoreConfig, StoreError,
        VecDeque,
    };
    use std::sync::Weak;
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (an `Arc<S>` inside a watch cell, replaced on every action)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Subscribers (listeners, watch receivers, action observers)
    /// 5. Effect execution (with feedback loop)
    ///
    /// Cloning a store yields another handle to the same state.
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
        state: Arc<watch::Sender<Arc<S>>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        listeners: Arc<ListenerRegistry<S>>,
        /// Every action the reducer processes, in processing order.
        action_broadcast: broadcast::Sender<A>,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone + Send + Sync + 'static,
        A: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_max_actions_per_send(16);
        /// let store = Store::with_config(MyState::default(), MyReducer, env, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (state, _) = watch::channel(Arc::new(initial_state));
            let (action_broadcast, _) = broadcast::channel(config.action_broadcast_capacity.max(1));

            Self {
                state: Arc::new(state),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                listeners: Arc::new(ListenerRegistry::new()),
                action_broadcast,
                config,
            }
        }

        /// Send an action to the store
        ///
        /// This method:
        /// 1. Copies the current state and runs the reducer on the copy
        /// 2. Installs the result as the new state and notifies subscribers
        /// 3. Executes returned effects
        /// 4. Processes actions produced by effects the same way, first in
        ///    first out, until none are left
        ///
        /// Everything happens on the calling thread before `send` returns.
        /// The reducer runs while the state cell is write-locked, so sends
        /// from several handles are serialized.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] when more than
        /// `max_actions_per_send` actions would be processed.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) -> Result<(), StoreError> {
            let limit = self.config.max_actions_per_send.max(1);
            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;

            while let Some(action) = queue.pop_front() {
                if processed == limit {
                    tracing::error!(
                        limit,
                        dropped = queue.len() + 1,
                        "Effect feedback exceeded the per-send action limit"
                    );
                    metrics::counter!("store.feedback.limit_exceeded").increment(1);
                    return Err(StoreError::FeedbackLimitExceeded { limit });
                }
                processed += 1;

                let effects = self.apply(action);
                tracing::trace!("Executing {} effects", effects.len());
                for effect in effects {
                    self.execute_effect(effect, &mut queue);
                }
            }

            tracing::debug!(processed, "Action processing completed");
            Ok(())
        }

        /// Reduce one action and publish the resulting state
        fn apply(&self, action: A) -> SmallVec<[Effect<A>; 4]> {
            metrics::counter!("store.actions.total").increment(1);

            let observed = action.clone();
            let mut effects = SmallVec::new();
            let mut published = None;

            self.state.send_modify(|current| {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let mut next = S::clone(&**current);
                let start = std::time::Instant::now();
                effects = self.reducer.reduce(&mut next, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                let next = Arc::new(next);
                *current = Arc::clone(&next);
                published = Some(next);
            });

            #[allow(clippy::cast_precision_loss)]
            metrics::histogram!("store.effects.count").record(effects.len() as f64);

            if let Some(state) = published {
                self.listeners
                    .notify(&state, |candidate| Arc::ptr_eq(candidate, &*self.state.borrow()));
            }

            // No observers is not an error
            let _ = self.action_broadcast.send(observed);

            effects
        }

        /// Execute an effect, queueing any action it produces
        fn execute_effect(&self, effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {},
                Effect::Send(action) => queue.push_back(*action),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        self.execute_effect(effect, queue);
                    }
                },
                Effect::Run(run) => {
                    if let Some(action) = run() {
                        queue.push_back(action);
                    } else {
                        tracing::trace!("Run effect produced no action");
                    }
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len());
        /// ```
        ///
        /// The closure sees a snapshot; it may safely call back into the store.
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let snapshot = self.snapshot();
            f(&snapshot)
        }

        /// The current state object
        ///
        /// Later actions publish a new object; the returned one never changes.
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::clone(&self.state.borrow())
        }

        /// Watch published states
        ///
        /// The receiver starts at the current state; `changed().await` wakes
        /// after each publication and `borrow_and_update()` yields the latest.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
            self.state.subscribe()
        }

        /// Register a listener called synchronously with every new state
        ///
        /// Listeners run in registration order, after the state is installed.
        /// A listener that sends an action publishes a newer state to every
        /// listener first; listeners still waiting for the older state then
        /// skip it, so the last state each listener sees is the current one.
        /// The listener stays registered until the returned [`Subscription`]
        /// is dropped.
        #[must_use = "dropping the subscription unregisters the listener"]
        pub fn listen<F>(&self, listener: F) -> Subscription
        where
            F: Fn(&Arc<S>) + Send + Sync + 'static,
        {
            let listener: Listener<S> = Arc::new(listener);
            let id = self.listeners.insert(listener);
            tracing::trace!(listener_id = id, "Listener registered");

            let registry: Weak<ListenerRegistry<S>> = Arc::downgrade(&self.listeners);
            Subscription {
                id,
                detach: Some(Box::new(move || {
                    registry
                        .upgrade()
                        .is_some_and(|registry| registry.remove(id))
                })),
            }
        }

        /// Number of listeners currently registered
        #[must_use]
        pub fn listener_count(&self) -> usize {
            self.listeners.len()
        }

        /// Observe every action the reducer processes
        ///
        /// Includes actions produced by effects. Observers that fall more than
        /// `action_broadcast_capacity` actions behind receive
        /// `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                listeners: Arc::clone(&self.listeners),
                action_broadcast: self.action_broadcast.clone(),
                config: self.config.clone(),
            }
        }
    }

    /// Handle for a listener registered with [`Store::listen`]
    ///
    /// Dropping it unregisters the listener.
    pub struct Subscription {
        id: u64,
        detach: Option<Box<dyn FnOnce() -> bool + Send + Sync>>,
    }

    impl Subscription {
        /// Identifier of the registered listener
        #[must_use]
        pub const fn id(&self) -> u64 {
            self.id
        }

        /// Unregister now
        ///
        /// Returns `false` if the store was already gone.
        pub fn unsubscribe(mut self) -> bool {
            self.detach.take().is_some_and(|detach| detach())
        }
    }

    impl Drop for Subscription {
        fn drop(&mut self) {
            if let Some(detach) = self.detach.take() {
                detach();
            }
        }
    }

    impl std::fmt::Debug for Subscription {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Subscription")
                .field("id", &self.id)
                .field("active", &self.detach.is_some())
                .finish()
        }
    }
}

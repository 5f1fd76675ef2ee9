//! # Todo Store Core
//!
//! Core traits and types for the todo store.
//!
//! This crate provides the abstractions every store is built from: a pure
//! reducer that turns `(State, Action, Environment)` into a new state plus a
//! list of effect descriptions, and the effect type itself.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable domain state
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Follow-up work described as a value, executed by the runtime
//! - **Environment**: Injected dependencies
//!
//! ## Example
//!
//! ```
//! use todo_store_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct DraftState {
//!     text: String,
//! }
//!
//! enum DraftAction {
//!     Set(String),
//!     Clear,
//! }
//!
//! struct DraftReducer;
//!
//! impl Reducer for DraftReducer {
//!     type State = DraftState;
//!     type Action = DraftAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut DraftState,
//!         action: DraftAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<DraftAction>; 4]> {
//!         match action {
//!             DraftAction::Set(text) => state.text = text,
//!             DraftAction::Clear => state.text.clear(),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = DraftState::default();
//! DraftReducer.reduce(&mut state, DraftAction::Set("milk".into()), &());
//! assert_eq!(state.text, "milk");
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// The store hands the reducer a private copy of the current state, so
        /// mutating `state` in place never affects snapshots other observers
        /// already hold.
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to the next state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Follow-up work descriptions
///
/// Effects are values returned by reducers. The store executes them after the
/// new state has been published, on the calling thread, and feeds any action
/// they produce back into the reducer before `send` returns.
pub mod effect {
    /// Effect type - describes follow-up work to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Dispatch another action after the current one
        Send(Box<Action>),

        /// Run effects one after another
        Sequential(Vec<Effect<Action>>),

        /// Synchronous computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Run(Box<dyn FnOnce() -> Option<Action> + Send>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Send(action) => f.debug_tuple("Effect::Send").field(action).finish(),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Run(_) => write!(f, "Effect::Run(<closure>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Dispatch `action` once the current action has been applied
        #[must_use]
        pub fn send(action: Action) -> Effect<Action> {
            Effect::Send(Box::new(action))
        }

        /// Wrap a closure as a [`Effect::Run`]
        #[must_use]
        pub fn run<F>(f: F) -> Effect<Action>
        where
            F: FnOnce() -> Option<Action> + Send + 'static,
        {
            Effect::Run(Box::new(f))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
                Effect::Send(_) | Effect::Run(_) => false,
            }
        }
    }
}

//! Generic finite state machine container.
//!
//! States are stateless behavior objects shared by every agent of a kind.
//! Anything a state needs to remember between ticks lives on the agent, so one
//! [`StateTable`] can back any number of [`StateMachine`]s.
//!
//! The machine itself is stored on the agent (see [`Agent::machine`]). All
//! lifecycle entry points therefore take the agent rather than `&mut self`:
//! the table is cloned out of the agent before a state runs, which leaves the
//! agent free to be borrowed mutably by that state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

/// Identifier of a registered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0)
    }
}

/// Error types for state machine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    /// No state registered under this id
    #[error("no state registered for {0}")]
    UnknownState(StateId),
    /// A state with this id is already registered
    #[error("state already registered: {0}")]
    DuplicateState(StateId),
}

/// Result type for state machine operations.
pub type FsmResult<T> = Result<T, FsmError>;

/// An entity driven by a [`StateMachine`].
pub trait Agent: Sized + 'static {
    /// Collaborators handed to every state call (ports, world access).
    type Env: ?Sized;
    /// Arguments passed to `State::enter`.
    type Args: Clone + Default + fmt::Debug;

    /// The agent's state machine.
    fn machine(&self) -> &StateMachine<Self>;

    /// The agent's state machine, mutably.
    fn machine_mut(&mut self) -> &mut StateMachine<Self>;
}

/// Outcome of a state's per-tick update.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<P> {
    /// Remain in the current state.
    Stay,
    /// Switch to the given state, entering it with `P`.
    Switch(StateId, P),
    /// Return to the previous state, or the table's fallback if there is none.
    Revert,
}

/// A behavior object with an enter/update/exit lifecycle.
///
/// Implementations must not hold per-agent data.
pub trait State<A: Agent>: Send + Sync {
    /// Identifier the state is registered under.
    fn id(&self) -> StateId;

    /// Human readable name for logging.
    fn name(&self) -> &'static str;

    /// Called once when the agent enters this state.
    fn enter(&self, agent: &mut A, env: &mut A::Env, args: A::Args);

    /// Called once per tick while this state is current.
    fn update(&self, agent: &mut A, env: &mut A::Env, dt: f32) -> Transition<A::Args>;

    /// Called once when the agent leaves this state.
    fn exit(&self, agent: &mut A, env: &mut A::Env);
}

/// Registry of states keyed by [`StateId`], plus the fallback used by
/// [`Transition::Revert`] when there is no previous state.
pub struct StateTable<A: Agent> {
    states: HashMap<StateId, Arc<dyn State<A>>>,
    fallback: StateId,
}

impl<A: Agent> StateTable<A> {
    /// Creates an empty table. `fallback` must be registered before use.
    #[must_use]
    pub fn new(fallback: StateId) -> Self {
        Self {
            states: HashMap::new(),
            fallback,
        }
    }

    /// Registers a state under its own id.
    pub fn register<S: State<A> + 'static>(&mut self, state: S) -> FsmResult<()> {
        let id = state.id();
        if self.states.contains_key(&id) {
            return Err(FsmError::DuplicateState(id));
        }
        self.states.insert(id, Arc::new(state));
        Ok(())
    }

    /// Returns the state registered under `id`.
    #[must_use]
    pub fn get(&self, id: StateId) -> Option<&Arc<dyn State<A>>> {
        self.states.get(&id)
    }

    /// Returns whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    /// Returns the fallback state id.
    #[must_use]
    pub fn fallback(&self) -> StateId {
        self.fallback
    }

    /// Returns the number of registered states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns whether no states are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn name_of(&self, id: Option<StateId>) -> &'static str {
        id.and_then(|id| self.get(id))
            .map_or("none", |state| state.name())
    }
}

impl<A: Agent> fmt::Debug for StateTable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.states.keys().copied().collect();
        ids.sort();
        f.debug_struct("StateTable")
            .field("states", &ids)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Per-agent container holding the current and previous state.
pub struct StateMachine<A: Agent> {
    table: Arc<StateTable<A>>,
    current: Option<StateId>,
    previous: Option<StateId>,
}

impl<A: Agent> StateMachine<A> {
    /// Creates a machine with no active state.
    #[must_use]
    pub fn new(table: Arc<StateTable<A>>) -> Self {
        Self {
            table,
            current: None,
            previous: None,
        }
    }

    /// Returns the state table backing this machine.
    #[must_use]
    pub fn table(&self) -> &Arc<StateTable<A>> {
        &self.table
    }

    /// Returns the active state, if any.
    #[must_use]
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Returns the state active before the current one, or `None` if the
    /// current state is the first one since creation.
    #[must_use]
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    /// Returns whether `id` is the active state.
    #[must_use]
    pub fn is_in_state(&self, id: StateId) -> bool {
        self.current == Some(id)
    }

    /// Name of the active state, `"none"` before the first switch.
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.table.name_of(self.current)
    }

    /// Exits the current state (if any) and enters `next` with `args`.
    ///
    /// Switching to the state that is already current runs a full exit/enter
    /// cycle but leaves the previous state untouched.
    pub fn switch_state(agent: &mut A, env: &mut A::Env, next: StateId, args: A::Args) -> FsmResult<()> {
        let table = Arc::clone(&agent.machine().table);
        let next_state = table.get(next).ok_or(FsmError::UnknownState(next))?;
        let current = agent.machine().current;

        debug!(
            "State switch: {} -> {} ({:?})",
            table.name_of(current),
            next_state.name(),
            args
        );

        if let Some(state) = current.and_then(|id| table.get(id)) {
            state.exit(agent, env);
        }

        let machine = agent.machine_mut();
        if current != Some(next) {
            machine.previous = current;
        }
        machine.current = Some(next);

        next_state.enter(agent, env, args);
        Ok(())
    }

    /// Switches to the previous state, or to the table's fallback when there
    /// is no previous state. Returns the state that was entered.
    pub fn revert(agent: &mut A, env: &mut A::Env) -> FsmResult<StateId> {
        let machine = agent.machine();
        let target = machine.previous.unwrap_or(machine.table.fallback);
        Self::switch_state(agent, env, target, A::Args::default())?;
        Ok(target)
    }

    /// Runs one tick of the current state and applies the transition it
    /// requests. Does nothing before the first switch.
    pub fn update(agent: &mut A, env: &mut A::Env, dt: f32) -> FsmResult<()> {
        let table = Arc::clone(&agent.machine().table);
        let Some(current) = agent.machine().current else {
            return Ok(());
        };
        let state = table.get(current).ok_or(FsmError::UnknownState(current))?;

        match state.update(agent, env, dt) {
            Transition::Stay => Ok(()),
            Transition::Switch(next, args) => Self::switch_state(agent, env, next, args),
            Transition::Revert => Self::revert(agent, env).map(|_| ()),
        }
    }
}

impl<A: Agent> fmt::Debug for StateMachine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

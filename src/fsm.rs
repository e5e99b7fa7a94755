//! Generic finite-state-machine engine.
//!
//! `K` is the state identifier (an enum implementing [`StateKey`]) and `C` is
//! the context the hooks and guards operate on, usually the owning actor.
//! The context is passed into every call rather than captured, so the machine
//! can live next to its actor as a plain component.
//!
//! # Usage
//! ```ignore
//! let mut fsm = StateMachine::<Mode, Body>::new();
//! fsm.add_state(Mode::Idle, Hooks::new().on_update(|b: &mut Body| b.vel = 0.0));
//! fsm.add_state(Mode::Run, Hooks::new().on_update(|b: &mut Body| b.vel = 2.0));
//! fsm.add_transition(&[Mode::Idle], Mode::Run, |b: &Body| b.wants_run);
//! fsm.validate()?;
//! fsm.change_state(Mode::Idle, &mut body);
//! // Each tick:
//! fsm.update(&mut body);
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A closed set of state identifiers.
pub trait StateKey: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Dense index into `ALL`.
    fn index(self) -> usize;

    fn name(self) -> &'static str;
}

/// Behaviour attached to one state. All hooks default to no-ops.
pub trait State<C>: Send + Sync {
    /// Fired exactly once when the state becomes current.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Fired every tick while the state is current.
    fn on_update(&mut self, _ctx: &mut C) {}

    /// Fired exactly once when the state stops being current.
    fn on_exit(&mut self, _ctx: &mut C) {}
}

/// Transition predicate evaluated against the context.
pub trait Guard<C>: Send + Sync {
    fn check(&self, ctx: &C) -> bool;
}

impl<C, F> Guard<C> for F
where
    F: Fn(&C) -> bool + Send + Sync,
{
    fn check(&self, ctx: &C) -> bool {
        self(ctx)
    }
}

type Hook<C> = Box<dyn FnMut(&mut C) + Send + Sync>;

/// A [`State`] assembled from optional closures.
pub struct Hooks<C> {
    enter: Option<Hook<C>>,
    update: Option<Hook<C>>,
    exit: Option<Hook<C>>,
}

impl<C> Hooks<C> {
    pub fn new() -> Self {
        Self {
            enter: None,
            update: None,
            exit: None,
        }
    }

    pub fn on_enter(mut self, f: impl FnMut(&mut C) + Send + Sync + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut C) + Send + Sync + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_exit(mut self, f: impl FnMut(&mut C) + Send + Sync + 'static) -> Self {
        self.exit = Some(Box::new(f));
        self
    }
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> State<C> for Hooks<C> {
    fn on_enter(&mut self, ctx: &mut C) {
        if let Some(f) = self.enter.as_mut() {
            f(ctx);
        }
    }

    fn on_update(&mut self, ctx: &mut C) {
        if let Some(f) = self.update.as_mut() {
            f(ctx);
        }
    }

    fn on_exit(&mut self, ctx: &mut C) {
        if let Some(f) = self.exit.as_mut() {
            f(ctx);
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("state `{0}` has no registered behaviour")]
    Unregistered(&'static str),
}

struct Transition<K, C> {
    source: K,
    destination: K,
    guard: Arc<dyn Guard<C>>,
}

/// State container with guarded transitions evaluated every tick.
///
/// Tables are indexed by [`StateKey::index`], so lookups never hash and an
/// unknown identifier cannot be expressed.
pub struct StateMachine<K: StateKey, C> {
    states: Vec<Option<Box<dyn State<C>>>>,
    /// Outgoing transitions per source, in registration order.
    transitions: Vec<Vec<Transition<K, C>>>,
    current: Option<K>,
    previous: Option<K>,
    ticks_in_state: u32,
}

impl<K: StateKey, C: 'static> StateMachine<K, C> {
    /// An empty machine with no current state.
    pub fn new() -> Self {
        Self {
            states: K::ALL.iter().map(|_| None).collect(),
            transitions: K::ALL.iter().map(|_| Vec::new()).collect(),
            current: None,
            previous: None,
            ticks_in_state: 0,
        }
    }

    /// Register `state` under `key`. Registering the same key again replaces
    /// the earlier behaviour.
    pub fn add_state(&mut self, key: K, state: impl State<C> + 'static) {
        self.states[key.index()] = Some(Box::new(state));
    }

    /// Append one transition `source -> destination` for every source.
    /// Evaluation order within a source follows call order.
    pub fn add_transition(
        &mut self,
        sources: &[K],
        destination: K,
        guard: impl Guard<C> + 'static,
    ) {
        let guard: Arc<dyn Guard<C>> = Arc::new(guard);
        for &source in sources {
            self.transitions[source.index()].push(Transition {
                source,
                destination,
                guard: Arc::clone(&guard),
            });
        }
    }

    /// Check that every variant of `K` has a registered state.
    pub fn validate(&self) -> Result<(), FsmError> {
        for &key in K::ALL {
            if self.states[key.index()].is_none() {
                return Err(FsmError::Unregistered(key.name()));
            }
        }
        Ok(())
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    /// Ticks spent in the current state since it was entered.
    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    /// Destinations reachable from `from`, in evaluation order.
    pub fn destinations(&self, from: K) -> impl Iterator<Item = K> + '_ {
        self.transitions[from.index()].iter().map(|t| t.destination)
    }

    /// Make `key` current. Returns `false` for a self-transition, in which
    /// case no hooks fire.
    ///
    /// # Panics
    ///
    /// Panics if `key` has no registered state. [`validate`](Self::validate)
    /// rules this out at construction.
    pub fn change_state(&mut self, key: K, ctx: &mut C) -> bool {
        let Self {
            states,
            current,
            previous,
            ticks_in_state,
            ..
        } = self;
        switch(states, current, previous, ticks_in_state, key, ctx)
    }

    /// Run one tick: scan the current state's transitions in order, then
    /// update whichever state is current afterwards.
    ///
    /// Returns the state entered during this tick, if any.
    pub fn update(&mut self, ctx: &mut C) -> Option<K> {
        let Self {
            states,
            transitions,
            current,
            previous,
            ticks_in_state,
        } = self;
        let origin = (*current)?;
        let mut entered = None;

        for transition in &transitions[origin.index()] {
            // Once an earlier entry has fired, the source no longer matches
            // and the rest of the old list is inert.
            if *current != Some(transition.source) {
                continue;
            }
            if transition.guard.check(ctx)
                && switch(
                    states,
                    current,
                    previous,
                    ticks_in_state,
                    transition.destination,
                    ctx,
                )
            {
                entered = Some(transition.destination);
            }
        }

        if entered.is_none() {
            *ticks_in_state = ticks_in_state.saturating_add(1);
        }
        if let Some(key) = *current {
            if let Some(state) = states[key.index()].as_mut() {
                state.on_update(ctx);
            }
        }
        entered
    }
}

impl<K: StateKey, C: 'static> Default for StateMachine<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

fn switch<K: StateKey, C>(
    states: &mut [Option<Box<dyn State<C>>>],
    current: &mut Option<K>,
    previous: &mut Option<K>,
    ticks_in_state: &mut u32,
    key: K,
    ctx: &mut C,
) -> bool {
    if *current == Some(key) {
        return false;
    }
    assert!(
        states[key.index()].is_some(),
        "state `{}` was never registered",
        key.name()
    );

    if let Some(old) = *current {
        if let Some(state) = states[old.index()].as_mut() {
            state.on_exit(ctx);
        }
    }
    log::debug!(
        "{} -> {}",
        current.map_or("<none>", |k| k.name()),
        key.name()
    );
    *previous = *current;
    *current = Some(key);
    *ticks_in_state = 0;
    if let Some(state) = states[key.index()].as_mut() {
        state.on_enter(ctx);
    }
    true
}

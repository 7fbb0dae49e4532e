use std::fmt;

use hashbrown::HashMap;
use log::trace;

use crate::state::{StateId, StateSet};
use crate::{Simulate, Symbol};

/// What the canonical key of a DFA state is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Positions of a regex syntax tree (direct construction).
    Positions,
    /// States of an NFA (subset construction).
    NfaStates,
    /// States of another DFA merged into one equivalence class (minimization).
    Classes,
}

/// A node in the DFA, contains is_accept and a transition hashmap.
#[derive(Debug, Clone)]
pub struct DfaState<Σ: Symbol> {
    key: StateSet,
    name: String,
    transitions: HashMap<Σ, StateId>,
    is_accept: bool,
}

impl<Σ: Symbol> DfaState<Σ> {
    fn new(key: StateSet, name: String) -> Self {
        Self {
            key,
            name,
            transitions: HashMap::new(),
            is_accept: false,
        }
    }

    /// Returns the next state given the provided symbol, if it exists.
    pub fn get_transition(&self, symbol: Σ) -> Option<StateId> {
        self.transitions.get(&symbol).copied()
    }

    /// Returns the accept state flag.
    pub fn is_accept(&self) -> bool {
        self.is_accept
    }

    /// The canonical set this state was built from.
    pub fn key(&self) -> &StateSet {
        &self.key
    }

    /// The display name of this state.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A deterministic finite automaton with a partial transition function.
///
/// A missing transition rejects the input, it is never an implicit self loop. States are
/// numbered in discovery order, the start state is always state 0.
#[derive(Debug, Clone)]
pub struct Dfa<Σ: Symbol> {
    kind: StateKind,
    states: Vec<DfaState<Σ>>,
    lookup: HashMap<StateSet, StateId>,
}

impl<Σ: Symbol> Dfa<Σ> {
    /// What the state keys of this DFA are made of.
    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        0
    }

    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Iterates all state ids.
    pub fn states(&self) -> std::ops::Range<StateId> {
        0..self.states.len()
    }

    /// Returns the state with the given id.
    pub fn state(&self, state: StateId) -> Option<&DfaState<Σ>> {
        self.states.get(state)
    }

    /// Returns the target of the transition from `state` on `symbol`, if it exists.
    pub fn transition(&self, state: StateId, symbol: Σ) -> Option<StateId> {
        self.states.get(state)?.get_transition(symbol)
    }

    /// Returns if the state is accepting. Unknown states are not.
    pub fn is_accept(&self, state: StateId) -> bool {
        self.states.get(state).is_some_and(DfaState::is_accept)
    }

    /// The set of accepting states.
    pub fn accepting(&self) -> StateSet {
        self.states().filter(|&state| self.is_accept(state)).collect()
    }

    /// The canonical key of a state.
    pub fn key(&self, state: StateId) -> Option<&StateSet> {
        self.states.get(state).map(DfaState::key)
    }

    /// The display name of a state.
    pub fn name(&self, state: StateId) -> Option<&str> {
        self.states.get(state).map(DfaState::name)
    }

    /// Finds the state built from the given canonical key.
    pub fn find(&self, key: &StateSet) -> Option<StateId> {
        self.lookup.get(key).copied()
    }

    /// All symbols which label at least one transition, sorted.
    pub fn alphabet(&self) -> Vec<Σ> {
        let mut alphabet: Vec<Σ> = self
            .states
            .iter()
            .flat_map(|state| state.transitions.keys().copied())
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();
        alphabet
    }

    /// Every transition as `(source, symbol, target)`, sorted.
    pub fn transitions(&self) -> Vec<(StateId, Σ, StateId)> {
        let mut edges: Vec<_> = self
            .states
            .iter()
            .enumerate()
            .flat_map(|(source, state)| {
                state
                    .transitions
                    .iter()
                    .map(move |(&symbol, &target)| (source, symbol, target))
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}

impl<Σ: Symbol> Simulate<Σ> for Dfa<Σ> {
    /// Walks the transition table, rejecting as soon as a transition is missing.
    fn simulate_iter(&self, input: impl Iterator<Item = Σ>) -> bool {
        let mut cur = self.start();
        for symbol in input {
            match self.transition(cur, symbol) {
                Some(next) => cur = next,
                None => return false,
            }
        }
        self.is_accept(cur)
    }
}

impl<Σ: Symbol + fmt::Display> fmt::Display for Dfa<Σ> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.states[self.start()].name)?;
        for state in &self.states {
            let marker = if state.is_accept { "*" } else { "" };
            write!(f, "{}{} {}:", state.name, marker, state.key)?;
            let mut transitions: Vec<_> = state.transitions.iter().collect();
            transitions.sort_unstable();
            for (i, (symbol, &target)) in transitions.into_iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{sep}{symbol} -> {}", self.states[target].name)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Display name of the state discovered in position `index`: `A`..`Z`, then `AA`, `AB`, ...
pub fn state_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        name.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    name.reverse();
    // Only ASCII uppercase letters were pushed.
    String::from_utf8(name).unwrap_or_default()
}

// MARK: Builder
/// Builds a [`Dfa`] one state at a time, deduplicating states by their canonical key.
///
/// The start state is created together with the builder. Every newly discovered key is
/// given the next free display name.
#[derive(Debug)]
pub struct DfaBuilder<Σ: Symbol> {
    dfa: Dfa<Σ>,
}

impl<Σ: Symbol> DfaBuilder<Σ> {
    /// Creates a builder whose start state is built from `start_key`.
    pub fn new(kind: StateKind, start_key: StateSet) -> Self {
        let mut builder = Self {
            dfa: Dfa {
                kind,
                states: Vec::new(),
                lookup: HashMap::new(),
            },
        };
        builder.intern(start_key);
        builder
    }

    /// Returns the state for `key`, creating it if it was not seen before.
    /// The flag is true when the state was created by this call.
    pub fn intern(&mut self, key: StateSet) -> (StateId, bool) {
        if let Some(&state) = self.dfa.lookup.get(&key) {
            return (state, false);
        }
        let state = self.dfa.states.len();
        let name = state_name(state);
        trace!("new state {name} = {key}");
        self.dfa.lookup.insert(key.clone(), state);
        self.dfa.states.push(DfaState::new(key, name));
        (state, true)
    }

    /// Adds a transition, replacing a previous one on the same symbol.
    ///
    /// # Panics
    /// If `source` was not interned.
    pub fn add_transition(&mut self, source: StateId, symbol: Σ, target: StateId) {
        debug_assert!(target < self.dfa.states.len());
        let previous = self.dfa.states[source].transitions.insert(symbol, target);
        debug_assert!(previous.is_none_or(|previous| previous == target));
    }

    /// Sets the accept state flag.
    ///
    /// # Panics
    /// If `state` was not interned.
    pub fn set_accept(&mut self, state: StateId, accept: bool) {
        self.dfa.states[state].is_accept = accept;
    }

    /// The canonical key of an interned state.
    pub fn key(&self, state: StateId) -> Option<&StateSet> {
        self.dfa.key(state)
    }

    /// Number of states interned so far.
    pub fn num_states(&self) -> usize {
        self.dfa.num_states()
    }

    /// Finishes construction.
    pub fn build(self) -> Dfa<Σ> {
        self.dfa
    }
}

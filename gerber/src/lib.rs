#![warn(missing_docs)]

//! Finite automata over an arbitrary symbol type `Σ`: construction of epsilon NFAs from
//! Thompson fragments, determinization by subset construction, DFA minimization and
//! simulation.
//!
//! States are stored in vectors and referenced by [`StateId`]. DFA states additionally
//! carry a canonical [`StateSet`] key telling what they were built from (tree positions,
//! NFA states or classes of a previous DFA) and a short display name.

pub mod dfa;
pub mod minimize;
pub mod nfa;
pub mod state;
pub mod subset;

use std::fmt;
use std::hash::Hash;

pub use dfa::{Dfa, DfaBuilder, StateKind};
pub use nfa::Nfa;
pub use state::{StateId, StateSet};
pub use subset::subset_construction;

/// Marker trait for the symbol type of an automaton.
///
/// Symbols need a total order so that alphabets, transition lists and state numbering
/// come out the same on every run.
pub trait Symbol: Eq + Hash + Copy + Ord + fmt::Debug {}

impl<T: Eq + Hash + Copy + Ord + fmt::Debug> Symbol for T {}

/// Running an automaton over an input sequence.
pub trait Simulate<Σ: Symbol> {
    /// Tests the provided input sequence on an iterator, returning true if the automaton accepts it.
    fn simulate_iter(&self, input: impl Iterator<Item = Σ>) -> bool;

    /// Tests the provided input sequence, returning true if the automaton accepts it.
    fn simulate_slice(&self, input: &[Σ]) -> bool {
        self.simulate_iter(input.iter().copied())
    }
}

/// Errors raised by automaton algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Partition refinement left a state without a class, or put two states with different
    /// transitions into the same class. Indicates a bug, never a property of the input.
    InconsistentPartition {
        /// The state that could not be mapped consistently.
        state: StateId,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentPartition { state } => {
                write!(f, "state {state} is not consistently mapped to an equivalence class")
            }
        }
    }
}

impl std::error::Error for Error {}

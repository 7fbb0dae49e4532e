//! Subset construction algorithm for converting an epsilon NFA to a DFA.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::dfa::{Dfa, DfaBuilder, StateKind};
use crate::nfa::Nfa;
use crate::Symbol;

/// Convert an epsilon NFA to a DFA using the powerset construction.
///
/// Each DFA state is the epsilon closure of a set of NFA states, keyed by that set. States
/// are explored breadth first starting from the closure of the NFA start state, so they
/// are numbered and named in discovery order. Symbols leading to an empty set of NFA states
/// get no transition. A DFA state accepts iff it contains the NFA accept state.
pub fn subset_construction<Σ: Symbol>(nfa: &Nfa<Σ>) -> Dfa<Σ> {
    let alphabet = nfa.alphabet();
    let start = nfa.epsilon_closure([nfa.start()]);

    let mut builder = DfaBuilder::new(StateKind::NfaStates, start.clone());
    builder.set_accept(0, start.contains(nfa.accept()));

    let mut worklist = VecDeque::from([(0, start)]);
    while let Some((current, nfa_states)) = worklist.pop_front() {
        for &symbol in &alphabet {
            let next = nfa.step(&nfa_states, symbol);
            if next.is_empty() {
                continue;
            }

            let accept = next.contains(nfa.accept());
            let (target, created) = builder.intern(next.clone());
            if created {
                builder.set_accept(target, accept);
                worklist.push_back((target, next));
            }
            trace!("{current} -{symbol:?}-> {target}");
            builder.add_transition(current, symbol, target);
        }
    }

    debug!(
        "subset construction: {} nfa states -> {} dfa states",
        nfa.num_states(),
        builder.num_states()
    );
    builder.build()
}

impl<Σ: Symbol> Dfa<Σ> {
    /// Determinizes `nfa`, see [`subset_construction`].
    pub fn from_nfa(nfa: &Nfa<Σ>) -> Self {
        subset_construction(nfa)
    }
}

//! DFA minimization by partition refinement.
//!
//! States are first restricted to the ones that are reachable from the start state and can
//! still reach an accepting state; a transition into any other state rejects just like a
//! missing transition does. The remaining states are split into accepting and
//! non-accepting classes, and every round splits each class by the classes its states
//! move to on every symbol. When a round splits nothing the classes are exactly the
//! Myhill-Nerode equivalence classes and each one becomes a state of the minimized DFA.

use std::collections::VecDeque;

use hashbrown::HashMap;
use log::{debug, trace};

use crate::dfa::{Dfa, DfaBuilder, StateKind};
use crate::state::{StateId, StateSet};
use crate::{Error, Symbol};

type Partition = Vec<Vec<StateId>>;

/// For every symbol of the alphabet, the class the state moves to, or `None` if it rejects.
type Signature = Vec<Option<usize>>;

impl<Σ: Symbol> Dfa<Σ> {
    /// Minimize the DFA. Returns a new, language equivalent DFA with the fewest states.
    ///
    /// The states of the result are [`StateKind::Classes`]: each key holds the ids of the
    /// states of `self` which were merged. The class of the start state comes first, the
    /// other classes are ordered by their smallest member.
    pub fn minimize(&self) -> Result<Dfa<Σ>, Error> {
        let alphabet = self.alphabet();
        let live = self.live_states(&alphabet);
        trace!("live states: {live}");

        let (accepting, rejecting): (Vec<StateId>, Vec<StateId>) =
            live.iter().partition(|&state| self.is_accept(state));
        let mut partition: Partition = [accepting, rejecting]
            .into_iter()
            .filter(|class| !class.is_empty())
            .collect();

        let mut class_of = self.class_map(&partition);
        let mut round = 0;
        loop {
            round += 1;
            let refined = self.refine(&partition, &class_of, &alphabet, &live)?;
            trace!("round {round}: {} -> {} classes", partition.len(), refined.len());
            // Refinement only ever splits classes, same count means same partition.
            let stable = refined.len() == partition.len();
            partition = refined;
            if stable {
                break;
            }
            class_of = self.class_map(&partition);
        }

        let minimized = self.from_partition(partition, &alphabet, &live)?;
        debug!(
            "minimized {} states to {} in {round} rounds",
            self.num_states(),
            minimized.num_states()
        );
        Ok(minimized)
    }

    /// States reachable from the start state which can also reach an accepting state. The
    /// start state is always kept, even if the language is empty.
    fn live_states(&self, alphabet: &[Σ]) -> StateSet {
        let mut reachable = StateSet::singleton(self.start());
        let mut queue = VecDeque::from([self.start()]);
        let mut predecessors: Vec<Vec<StateId>> = vec![Vec::new(); self.num_states()];
        while let Some(state) = queue.pop_front() {
            for &symbol in alphabet {
                if let Some(next) = self.transition(state, symbol) {
                    predecessors[next].push(state);
                    if reachable.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        let mut productive: StateSet = reachable.iter().filter(|&state| self.is_accept(state)).collect();
        let mut queue: VecDeque<StateId> = productive.iter().collect();
        while let Some(state) = queue.pop_front() {
            for &previous in &predecessors[state] {
                if productive.insert(previous) {
                    queue.push_back(previous);
                }
            }
        }

        productive.insert(self.start());
        productive
    }

    fn class_map(&self, partition: &[Vec<StateId>]) -> Vec<Option<usize>> {
        let mut class_of = vec![None; self.num_states()];
        for (class, states) in partition.iter().enumerate() {
            for &state in states {
                class_of[state] = Some(class);
            }
        }
        class_of
    }

    fn signature(
        &self,
        state: StateId,
        class_of: &[Option<usize>],
        alphabet: &[Σ],
        live: &StateSet,
    ) -> Result<Signature, Error> {
        alphabet
            .iter()
            .map(|&symbol| match self.transition(state, symbol) {
                Some(target) if live.contains(target) => class_of[target]
                    .map(Some)
                    .ok_or(Error::InconsistentPartition { state: target }),
                _ => Ok(None),
            })
            .collect()
    }

    /// Splits every class into groups of states with equal signatures.
    fn refine(
        &self,
        partition: &[Vec<StateId>],
        class_of: &[Option<usize>],
        alphabet: &[Σ],
        live: &StateSet,
    ) -> Result<Partition, Error> {
        let mut refined = Partition::with_capacity(partition.len());
        for class in partition {
            if class.len() == 1 {
                refined.push(class.clone());
                continue;
            }
            let mut groups: HashMap<Signature, usize> = HashMap::new();
            let first_group = refined.len();
            for &state in class {
                let signature = self.signature(state, class_of, alphabet, live)?;
                let next_group = first_group + groups.len();
                let group = *groups.entry(signature).or_insert(next_group);
                if group == refined.len() {
                    refined.push(Vec::new());
                }
                refined[group].push(state);
            }
            if groups.len() > 1 {
                trace!("split {class:?} into {:?}", &refined[first_group..]);
            }
        }
        Ok(refined)
    }

    fn from_partition(
        &self,
        mut partition: Partition,
        alphabet: &[Σ],
        live: &StateSet,
    ) -> Result<Dfa<Σ>, Error> {
        let start = self.start();
        partition.sort_by_key(|class| (!class.contains(&start), class.first().copied()));
        let class_of = self.class_map(&partition);

        let keys: Vec<StateSet> = partition
            .iter()
            .map(|class| class.iter().copied().collect())
            .collect();
        let accepting = self.accepting();

        let mut builder = DfaBuilder::new(StateKind::Classes, keys[0].clone());
        for key in keys.iter().skip(1) {
            builder.intern(key.clone());
        }

        for (class, states) in partition.iter().enumerate() {
            builder.set_accept(class, keys[class].intersects(&accepting));

            let representative = states[0];
            let expected = self.signature(representative, &class_of, alphabet, live)?;
            for &state in &states[1..] {
                if self.signature(state, &class_of, alphabet, live)? != expected {
                    return Err(Error::InconsistentPartition { state });
                }
            }

            for (&symbol, target) in alphabet.iter().zip(expected) {
                if let Some(target) = target {
                    builder.add_transition(class, symbol, target);
                }
            }
        }

        Ok(builder.build())
    }
}

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use log::trace;
use smallvec::SmallVec;

use crate::state::{StateId, StateSet};
use crate::{Simulate, Symbol};

/// Most Thompson states have one or two targets per symbol, more than that spills to the heap.
const TARGETS_HINT: usize = 2;

type Targets = SmallVec<[StateId; TARGETS_HINT]>;

/// A state in the NFA. Transitions are keyed by `Some(symbol)`, `None` is the epsilon transition.
#[derive(Clone, Debug)]
pub struct NfaState<Σ: Symbol> {
    transitions: HashMap<Option<Σ>, Targets>,
}

impl<Σ: Symbol> NfaState<Σ> {
    /// Creates a new state with no transitions.
    pub fn new() -> Self {
        Self {
            transitions: HashMap::new(),
        }
    }

    /// Returns the targets of the transitions on the given symbol (`None` for epsilon).
    pub fn get_transitions(&self, symbol: Option<Σ>) -> &[StateId] {
        self.transitions
            .get(&symbol)
            .map(|targets| targets.as_slice())
            .unwrap_or(&[])
    }

    fn push_transition(&mut self, symbol: Option<Σ>, target: StateId) {
        let targets = self.transitions.entry(symbol).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    fn displace(&mut self, offset: usize) {
        for targets in self.transitions.values_mut() {
            for target in targets.iter_mut() {
                *target += offset;
            }
        }
    }
}

impl<Σ: Symbol> Default for NfaState<Σ> {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-deterministic finite automaton with epsilon transitions.
///
/// States live in a vector and refer to each other by index. The start state is always
/// state 0 and there is exactly one accept state, which is the shape produced by Thompson's
/// construction. The combinators [`Nfa::concat`], [`Nfa::union`] and [`Nfa::star`] consume
/// their operands and splice their state tables into a new fragment, renumbering states by
/// an offset, so fragments never share states.
#[derive(Clone, Debug)]
pub struct Nfa<Σ: Symbol> {
    states: Vec<NfaState<Σ>>,
    accept: StateId,
}

impl<Σ: Symbol> Nfa<Σ> {
    /// Fragment matching exactly `symbol`: `0 -symbol-> 1`.
    pub fn literal(symbol: Σ) -> Self {
        Self::two_states(Some(symbol))
    }

    /// Fragment matching the empty string: `0 -ε-> 1`.
    pub fn epsilon() -> Self {
        Self::two_states(None)
    }

    fn two_states(symbol: Option<Σ>) -> Self {
        let mut nfa = Self {
            states: vec![NfaState::new(), NfaState::new()],
            accept: 1,
        };
        nfa.push_transition(0, symbol, 1);
        nfa
    }

    /// Fragment matching `self` followed by `other`.
    ///
    /// The states of `other` are appended after the states of `self` and the old accept
    /// state gets an epsilon transition to the relocated start of `other`.
    pub fn concat(mut self, other: Self) -> Self {
        let old_accept = self.accept;
        let (other_start, other_accept) = self.append(other);
        self.push_transition(old_accept, None, other_start);
        self.accept = other_accept;
        self
    }

    /// Fragment matching either `self` or `other`.
    ///
    /// Layout: new start (0), new accept (1), then the states of `self`, then those of `other`.
    pub fn union(mut self, other: Self) -> Self {
        let (right_start, right_accept) = self.append(other);
        // Shift both operands up by two in place to make room for the new start and accept.
        self.states.insert(0, NfaState::new());
        self.states.insert(0, NfaState::new());
        for state in &mut self.states[2..] {
            state.displace(2);
        }
        let (left_start, left_accept) = (2, self.accept + 2);
        let (right_start, right_accept) = (right_start + 2, right_accept + 2);
        self.accept = 1;
        self.push_transition(0, None, left_start);
        self.push_transition(0, None, right_start);
        self.push_transition(left_accept, None, 1);
        self.push_transition(right_accept, None, 1);
        self
    }

    /// Fragment matching zero or more repetitions of `self`.
    ///
    /// Layout: new start (0), new accept (1), then the states of `self`. The new start can
    /// skip straight to the new accept, the old accept loops back to the old start or exits.
    pub fn star(self) -> Self {
        let mut nfa = Self::with_entry_and_exit(self.states.len());
        let (inner_start, inner_accept) = nfa.append(self);
        nfa.push_transition(0, None, inner_start);
        nfa.push_transition(0, None, 1);
        nfa.push_transition(inner_accept, None, inner_start);
        nfa.push_transition(inner_accept, None, 1);
        nfa
    }

    fn with_entry_and_exit(capacity_hint: usize) -> Self {
        let mut states = Vec::with_capacity(capacity_hint + 2);
        states.push(NfaState::new());
        states.push(NfaState::new());
        Self { states, accept: 1 }
    }

    /// Moves the states of `other` after ours and returns its relocated (start, accept).
    fn append(&mut self, other: Self) -> (StateId, StateId) {
        let offset = self.states.len();
        self.states.extend(other.states.into_iter().map(|mut state| {
            state.displace(offset);
            state
        }));
        (offset, other.accept + offset)
    }

    /// Pushes a transition from `source` to `target` on `symbol` (`None` for epsilon).
    ///
    /// # Panics
    /// If `source` is not a state of this NFA.
    pub fn push_transition(&mut self, source: StateId, symbol: Option<Σ>, target: StateId) {
        self.states[source].push_transition(symbol, target);
    }

    /// The start state, always 0.
    pub fn start(&self) -> StateId {
        0
    }

    /// The single accept state.
    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the state with the given index.
    pub fn state(&self, state: StateId) -> Option<&NfaState<Σ>> {
        self.states.get(state)
    }

    /// All symbols which label at least one transition, sorted. Epsilon is not a symbol.
    pub fn alphabet(&self) -> Vec<Σ> {
        let mut alphabet: Vec<Σ> = self
            .states
            .iter()
            .flat_map(|state| state.transitions.keys().filter_map(|symbol| *symbol))
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();
        alphabet
    }

    /// Every transition as `(source, symbol, target)`, sorted. `None` is epsilon.
    pub fn transitions(&self) -> Vec<(StateId, Option<Σ>, StateId)> {
        let mut edges: Vec<_> = self
            .states
            .iter()
            .enumerate()
            .flat_map(|(source, state)| {
                state.transitions.iter().flat_map(move |(symbol, targets)| {
                    targets.iter().map(move |&target| (source, *symbol, target))
                })
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// All states reachable from `states` through zero or more epsilon transitions.
    /// Ids which are not states of this NFA are skipped.
    ///
    /// Depth first with a visited guard, epsilon cycles (nested stars) terminate.
    pub fn epsilon_closure(&self, states: impl IntoIterator<Item = StateId>) -> StateSet {
        let mut visited: HashSet<StateId> = HashSet::new();
        let mut stack: Vec<StateId> = states.into_iter().collect();

        while let Some(state) = stack.pop() {
            let Some(nfa_state) = self.states.get(state) else {
                continue;
            };
            if !visited.insert(state) {
                continue;
            }
            for &next in nfa_state.get_transitions(None) {
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }

        // Sorted once here rather than on every insert.
        visited.into_iter().collect()
    }

    /// States reachable from any state of `states` by a single `symbol` transition.
    /// Ids which are not states of this NFA are skipped.
    pub fn move_on(&self, states: &StateSet, symbol: Σ) -> StateSet {
        states
            .iter()
            .filter_map(|state| self.states.get(state))
            .flat_map(|state| state.get_transitions(Some(symbol)).iter().copied())
            .collect()
    }

    /// Epsilon closure of the `symbol` successors of `states`, an empty set means no match.
    pub fn step(&self, states: &StateSet, symbol: Σ) -> StateSet {
        let moved = self.move_on(states, symbol);
        if moved.is_empty() {
            return moved;
        }
        self.epsilon_closure(moved.iter())
    }

    /// States which can be reached from the start state through any transitions.
    pub fn reachable_states(&self) -> StateSet {
        let mut reachable = StateSet::singleton(self.start());
        let mut queue = VecDeque::from([self.start()]);
        while let Some(state) = queue.pop_front() {
            for targets in self.states[state].transitions.values() {
                for &target in targets {
                    if reachable.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }
        reachable
    }
}

impl<Σ: Symbol> Simulate<Σ> for Nfa<Σ> {
    /// Simulates the NFA on the set of all states it can be in at once.
    fn simulate_iter(&self, input: impl Iterator<Item = Σ>) -> bool {
        let mut current = self.epsilon_closure([self.start()]);
        for symbol in input {
            current = self.step(&current, symbol);
            trace!("nfa on {symbol:?}: {current}");
            if current.is_empty() {
                return false;
            }
        }
        current.contains(self.accept)
    }
}

//MARK: Tests
#[cfg(test)]
mod test {
    use super::*;

    fn chars(input: &str) -> Vec<char> {
        input.chars().collect()
    }

    #[test]
    fn test_literal_and_epsilon() {
        let a = Nfa::literal('a');
        assert_eq!(a.num_states(), 2);
        assert_eq!(a.accept(), 1);
        assert_eq!(a.transitions(), vec![(0, Some('a'), 1)]);
        assert!(a.simulate_slice(&['a']));
        assert!(!a.simulate_slice(&[]));

        let e = Nfa::<char>::epsilon();
        assert_eq!(e.transitions(), vec![(0, None, 1)]);
        assert!(e.simulate_slice(&[]));
        assert!(!e.simulate_slice(&['a']));
    }

    #[test]
    fn test_concat_layout() {
        let nfa = Nfa::literal('a').concat(Nfa::literal('b'));
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.accept(), 3);
        assert_eq!(
            nfa.transitions(),
            vec![(0, Some('a'), 1), (1, None, 2), (2, Some('b'), 3)]
        );
        assert!(nfa.simulate_slice(&chars("ab")));
        assert!(!nfa.simulate_slice(&chars("a")));
        assert!(!nfa.simulate_slice(&chars("ba")));
    }

    #[test]
    fn test_union_layout() {
        let nfa = Nfa::literal('a').union(Nfa::literal('b'));
        assert_eq!(nfa.num_states(), 6);
        assert_eq!(nfa.accept(), 1);
        assert_eq!(
            nfa.transitions(),
            vec![
                (0, None, 2),
                (0, None, 4),
                (2, Some('a'), 3),
                (3, None, 1),
                (4, Some('b'), 5),
                (5, None, 1),
            ]
        );
        assert!(nfa.simulate_slice(&chars("a")));
        assert!(nfa.simulate_slice(&chars("b")));
        assert!(!nfa.simulate_slice(&chars("ab")));
        assert!(!nfa.simulate_slice(&[]));
    }

    #[test]
    fn test_star_layout() {
        let nfa = Nfa::literal('a').star();
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(
            nfa.transitions(),
            vec![
                (0, None, 1),
                (0, None, 2),
                (2, Some('a'), 3),
                (3, None, 1),
                (3, None, 2),
            ]
        );
        assert!(nfa.simulate_slice(&[]));
        assert!(nfa.simulate_slice(&chars("aaaa")));
        assert!(!nfa.simulate_slice(&chars("aab")));
    }

    #[test]
    fn test_epsilon_cycles_terminate() {
        // (ε*)* loops on epsilon transitions only.
        let nfa = Nfa::<char>::epsilon().star().star();
        let closure = nfa.epsilon_closure([nfa.start()]);
        assert_eq!(closure.len(), nfa.num_states());
        assert!(nfa.simulate_slice(&[]));
        assert!(!nfa.simulate_slice(&['a']));
    }

    #[test]
    fn test_move_and_alphabet() {
        // (a|b)*a
        let nfa = Nfa::literal('a')
            .union(Nfa::literal('b'))
            .star()
            .concat(Nfa::literal('a'));
        assert_eq!(nfa.alphabet(), vec!['a', 'b']);

        let start = nfa.epsilon_closure([nfa.start()]);
        assert!(!start.contains(nfa.accept()));
        let after_a = nfa.step(&start, 'a');
        assert!(after_a.contains(nfa.accept()));
        let after_b = nfa.step(&start, 'b');
        assert!(!after_b.contains(nfa.accept()));
        assert!(nfa.step(&start, 'c').is_empty());

        assert_eq!(nfa.reachable_states().len(), nfa.num_states());
        assert!(nfa.simulate_iter("abba".chars()));
        assert!(!nfa.simulate_iter("abbb".chars()));
    }

    #[test]
    fn test_unknown_states_skipped() {
        let nfa = Nfa::literal('a').star();
        let closure = nfa.epsilon_closure([0, 99]);
        assert_eq!(closure, nfa.epsilon_closure([0]));
        assert!(nfa.epsilon_closure([99]).is_empty());

        let unknown: StateSet = [2, 99].into_iter().collect();
        assert_eq!(nfa.move_on(&unknown, 'a'), StateSet::singleton(3));
        assert!(nfa.step(&StateSet::singleton(99), 'a').is_empty());
    }

    #[test]
    fn test_rejection_stops_reading() {
        let nfa = Nfa::literal('a').concat(Nfa::literal('b'));
        let mut input = "axyz".chars();
        assert!(!nfa.simulate_iter(input.by_ref()));
        assert_eq!(input.as_str(), "yz");
    }

    #[test]
    fn test_long_union() {
        // left nested like a parsed a|a|...|a|b
        let mut nfa = Nfa::literal('a');
        for _ in 0..2_000 {
            nfa = nfa.union(Nfa::literal('a'));
        }
        let nfa = nfa.union(Nfa::literal('b'));
        assert_eq!(nfa.num_states(), 2 * 2_002 + 2 * 2_001);
        assert_eq!(nfa.accept(), 1);

        let start = nfa.epsilon_closure([nfa.start()]);
        // every union and literal start, none of the accepts
        assert_eq!(start.len(), 2_001 + 2_002);
        assert!(nfa.simulate_slice(&['a']));
        assert!(nfa.simulate_slice(&['b']));
        assert!(!nfa.simulate_slice(&['a', 'b']));
    }
}

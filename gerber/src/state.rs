//! State identifiers and canonical state sets.

use std::fmt;

use smallvec::SmallVec;

/// Index of a state inside an automaton's state arena.
pub type StateId = usize;

/// Most state sets built from regexes are small, keep them inline.
const INLINE_STATES: usize = 8;

/// A set of states kept sorted and free of duplicates.
///
/// Two sets holding the same states are equal and hash the same no matter in
/// which order the states were inserted, so a `StateSet` can be used directly
/// as the canonical key of a DFA state built by subset construction.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateSet(SmallVec<[StateId; INLINE_STATES]>);

impl StateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Creates a set holding exactly one state.
    pub fn singleton(state: StateId) -> Self {
        let mut set = Self::new();
        set.0.push(state);
        set
    }

    /// Inserts a state, returns `false` if it was already present.
    pub fn insert(&mut self, state: StateId) -> bool {
        match self.0.binary_search(&state) {
            Ok(_) => false,
            Err(at) => {
                self.0.insert(at, state);
                true
            }
        }
    }

    /// Returns if the state is in the set.
    pub fn contains(&self, state: StateId) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    /// Adds every state of `other` to this set.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.is_empty() {
            return;
        }
        let mut merged = SmallVec::with_capacity(self.0.len() + other.0.len());
        let (mut a, mut b) = (self.0.iter().peekable(), other.0.iter().peekable());
        loop {
            let next = match (a.peek(), b.peek()) {
                (Some(&&x), Some(&&y)) if x < y => a.next(),
                (Some(&&x), Some(&&y)) if x > y => b.next(),
                (Some(_), Some(_)) => {
                    b.next();
                    a.next()
                }
                (Some(_), None) => a.next(),
                (None, Some(_)) => b.next(),
                (None, None) => break,
            };
            if let Some(&state) = next {
                merged.push(state);
            }
        }
        self.0 = merged;
    }

    /// Returns if both sets share at least one state.
    pub fn intersects(&self, other: &StateSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// Returns if the set holds no state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of states in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().copied()
    }

    /// The states in ascending order.
    pub fn as_slice(&self) -> &[StateId] {
        &self.0
    }

    /// Smallest state of the set.
    pub fn first(&self) -> Option<StateId> {
        self.0.first().copied()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut states: SmallVec<[StateId; INLINE_STATES]> = iter.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        Self(states)
    }
}

impl Extend<StateId> for StateSet {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, StateId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, state) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{state}")?;
        }
        write!(f, "}}")
    }
}

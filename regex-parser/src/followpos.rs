use gerber::StateSet;
use log::trace;

use crate::syntax_tree::{NodeKind, Position, SyntaxTree};

/// The followpos relation of a syntax tree: for every position, the positions which can
/// match the next symbol of a string after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Followpos {
    /// `table[p - 1]` for position `p`.
    table: Vec<StateSet>,
}

impl Followpos {
    /// Computes followpos for every position of `tree`.
    ///
    /// Only concatenation and star nodes contribute: every last position of the left side
    /// of a concatenation is followed by the first positions of its right side, and every
    /// last position of a star is followed by its own first positions.
    pub fn compute(tree: &SyntaxTree) -> Self {
        let mut followpos = Self {
            table: vec![StateSet::new(); tree.num_positions()],
        };

        // Post-order, the arena is already ordered that way.
        for node in tree.nodes() {
            let (from, to) = match node.kind() {
                NodeKind::Concat(left, right) => match (tree.node(left), tree.node(right)) {
                    (Some(left), Some(right)) => (left.lastpos(), right.firstpos()),
                    _ => continue,
                },
                NodeKind::Star(_) => (node.lastpos(), node.firstpos()),
                NodeKind::Leaf { .. } | NodeKind::Epsilon | NodeKind::Union(..) => continue,
            };
            for position in from {
                followpos.table[position - 1].union_with(to);
            }
        }

        for (index, follow) in followpos.table.iter().enumerate() {
            trace!("followpos({}) = {follow}", index + 1);
        }
        followpos
    }

    /// The positions following `position`, `None` for a position not in the tree.
    pub fn get(&self, position: Position) -> Option<&StateSet> {
        position.checked_sub(1).and_then(|index| self.table.get(index))
    }

    /// Number of positions in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns if the tree had no positions.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::normalize::normalize;
    use crate::postfix::to_postfix;
    use crate::token::{Operator, Symbol, Token};

    fn augmented_tree(regex: &str) -> SyntaxTree {
        let mut postfix = to_postfix(&normalize(regex).unwrap()).unwrap();
        postfix.extend([
            Token::Symbol(Symbol::EndMarker),
            Token::Operator(Operator::Concat),
        ]);
        SyntaxTree::from_postfix(&postfix).unwrap()
    }

    fn set(positions: &[Position]) -> StateSet {
        positions.iter().copied().collect()
    }

    #[test]
    fn test_textbook_followpos() {
        // (a|b)*abb# with positions a=1 b=2 a=3 b=4 b=5 #=6
        let tree = augmented_tree("(a|b)*abb");
        let followpos = Followpos::compute(&tree);
        assert_eq!(followpos.len(), 6);
        assert_eq!(followpos.get(1), Some(&set(&[1, 2, 3])));
        assert_eq!(followpos.get(2), Some(&set(&[1, 2, 3])));
        assert_eq!(followpos.get(3), Some(&set(&[4])));
        assert_eq!(followpos.get(4), Some(&set(&[5])));
        assert_eq!(followpos.get(5), Some(&set(&[6])));
        assert_eq!(followpos.get(6), Some(&StateSet::new()));
        assert_eq!(followpos.get(0), None);
        assert_eq!(followpos.get(7), None);
    }

    #[test]
    fn test_nested_star() {
        // (ab*)*# with positions a=1 b=2 #=3
        let tree = augmented_tree("(ab*)*");
        let followpos = Followpos::compute(&tree);
        assert_eq!(followpos.get(1), Some(&set(&[1, 2, 3])));
        assert_eq!(followpos.get(2), Some(&set(&[1, 2, 3])));
    }

    #[test]
    fn test_epsilon_is_transparent() {
        // a_b# with positions a=1 b=2 #=3
        let tree = augmented_tree("a_b");
        let followpos = Followpos::compute(&tree);
        assert_eq!(followpos.get(1), Some(&set(&[2])));
        assert_eq!(followpos.get(2), Some(&set(&[3])));
    }
}

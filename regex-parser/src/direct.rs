//! Direct construction of a DFA from the syntax tree, without an intermediate NFA.
//!
//! The expression is augmented with an end marker, `(r)#`. Every DFA state is a set of
//! positions of the augmented tree which can match the next input symbol; the start state
//! is the firstpos of the root, and the state reached from `S` on `c` is the union of
//! followpos over the positions of `S` holding `c`. A state accepts when it holds the
//! position of the end marker.

use std::collections::{BTreeMap, VecDeque};

use gerber::{Dfa, DfaBuilder, StateKind, StateSet};
use log::{debug, trace};

use crate::followpos::Followpos;
use crate::syntax_tree::SyntaxTree;
use crate::token::{Operator, Symbol, Token};
use crate::Error;

/// Builds a DFA for a postfix expression.
pub fn construct(postfix: &[Token]) -> Result<Dfa<char>, Error> {
    if postfix.is_empty() {
        return Err(Error::MalformedExpression("empty expression"));
    }
    if postfix.contains(&Token::Symbol(Symbol::EndMarker)) {
        return Err(Error::MalformedExpression("the end marker is reserved"));
    }

    let tree = SyntaxTree::from_postfix(&augment(postfix))?;
    let followpos = Followpos::compute(&tree);
    from_tree(&tree, &followpos)
}

/// Appends the end marker to a postfix expression, concatenated after the whole of it.
pub fn augment(postfix: &[Token]) -> Vec<Token> {
    let mut augmented = Vec::with_capacity(postfix.len() + 2);
    augmented.extend_from_slice(postfix);
    augmented.extend([
        Token::Symbol(Symbol::EndMarker),
        Token::Operator(Operator::Concat),
    ]);
    augmented
}

/// Runs the worklist over position sets of an augmented tree.
pub fn from_tree(tree: &SyntaxTree, followpos: &Followpos) -> Result<Dfa<char>, Error> {
    let end = tree
        .end_marker()
        .ok_or(Error::MalformedExpression("expression has no end marker"))?;

    let start = tree.root().firstpos().clone();
    let mut builder = DfaBuilder::new(StateKind::Positions, start.clone());
    builder.set_accept(0, start.contains(end));

    let mut worklist = VecDeque::from([(0, start)]);
    while let Some((current, positions)) = worklist.pop_front() {
        // Ordered by symbol, so states are discovered in the same order on every run.
        let mut moves: BTreeMap<char, StateSet> = BTreeMap::new();
        for position in &positions {
            if let Some(Symbol::Char(c)) = tree.symbol_at(position) {
                if let Some(follow) = followpos.get(position) {
                    moves.entry(c).or_default().union_with(follow);
                }
            }
        }

        for (symbol, next) in moves {
            if next.is_empty() {
                continue;
            }
            let accept = next.contains(end);
            let (target, created) = builder.intern(next.clone());
            if created {
                builder.set_accept(target, accept);
                worklist.push_back((target, next));
            }
            trace!("{current} -{symbol}-> {target}");
            builder.add_transition(current, symbol, target);
        }
    }

    debug!(
        "direct construction: {} positions -> {} dfa states",
        tree.num_positions(),
        builder.num_states()
    );
    Ok(builder.build())
}

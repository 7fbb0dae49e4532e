//! Syntax trees of postfix expressions, attributed with nullable, firstpos and lastpos.

use std::fmt;

use gerber::StateSet;
use log::debug;

use crate::token::{self, Operator, Symbol, Token};
use crate::Error;

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// Position of a leaf, numbered from 1 in postfix order.
pub type Position = usize;

/// The shape of a node. Children are referenced by their index in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A literal symbol or the end marker, occupying a position.
    Leaf {
        /// The symbol matched at this position.
        symbol: Symbol,
        /// The position of the leaf.
        position: Position,
    },
    /// The empty string. Has no position.
    Epsilon,
    /// Zero or more repetitions of the child.
    Star(NodeId),
    /// Left followed by right.
    Concat(NodeId, NodeId),
    /// Left or right.
    Union(NodeId, NodeId),
}

/// A node with the attributes computed from its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    nullable: bool,
    firstpos: StateSet,
    lastpos: StateSet,
}

impl Node {
    /// The shape of the node.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether the subexpression matches the empty string.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Positions which can match the first symbol of a string of the subexpression.
    pub fn firstpos(&self) -> &StateSet {
        &self.firstpos
    }

    /// Positions which can match the last symbol of a string of the subexpression.
    pub fn lastpos(&self) -> &StateSet {
        &self.lastpos
    }
}

/// A syntax tree stored in an arena.
///
/// Nodes are pushed as the postfix expression is evaluated, so every child sits before
/// its parent and the arena order is a post-order of the tree. Each node except the root
/// has exactly one parent.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Symbol at each position, `symbols[p - 1]` for position `p`.
    symbols: Vec<Symbol>,
}

impl SyntaxTree {
    /// Evaluates a postfix expression into a tree, computing the attributes of each node
    /// from its children as it is created.
    pub fn from_postfix(postfix: &[Token]) -> Result<Self, Error> {
        let mut tree = Self {
            nodes: Vec::with_capacity(postfix.len()),
            root: 0,
            symbols: Vec::new(),
        };
        let mut stack: Vec<NodeId> = Vec::new();

        for &token in postfix {
            let node = match token {
                Token::Symbol(Symbol::Epsilon) => Node {
                    kind: NodeKind::Epsilon,
                    nullable: true,
                    firstpos: StateSet::new(),
                    lastpos: StateSet::new(),
                },
                Token::Symbol(symbol) => {
                    tree.symbols.push(symbol);
                    let position = tree.symbols.len();
                    Node {
                        kind: NodeKind::Leaf { symbol, position },
                        nullable: false,
                        firstpos: StateSet::singleton(position),
                        lastpos: StateSet::singleton(position),
                    }
                }
                Token::Operator(Operator::Star) => {
                    let child = stack.pop().ok_or(Error::MalformedExpression(
                        "'*' is missing its operand",
                    ))?;
                    let child_node = &tree.nodes[child];
                    Node {
                        kind: NodeKind::Star(child),
                        nullable: true,
                        firstpos: child_node.firstpos.clone(),
                        lastpos: child_node.lastpos.clone(),
                    }
                }
                Token::Operator(op @ (Operator::Concat | Operator::Union)) => {
                    let missing = match op {
                        Operator::Concat => "'.' is missing an operand",
                        _ => "'|' is missing an operand",
                    };
                    let right = stack.pop().ok_or(Error::MalformedExpression(missing))?;
                    let left = stack.pop().ok_or(Error::MalformedExpression(missing))?;
                    tree.binary(op, left, right)
                }
                Token::Open | Token::Close => {
                    return Err(Error::MalformedExpression("parenthesis in postfix expression"))
                }
            };
            stack.push(tree.nodes.len());
            tree.nodes.push(node);
        }

        tree.root = match stack.as_slice() {
            [root] => *root,
            [] => return Err(Error::MalformedExpression("empty expression")),
            _ => return Err(Error::MalformedExpression("operands without operator")),
        };
        debug!(
            "syntax tree of {}: {} nodes, {} positions",
            token::to_string(postfix),
            tree.nodes.len(),
            tree.symbols.len()
        );
        Ok(tree)
    }

    fn binary(&self, op: Operator, left: NodeId, right: NodeId) -> Node {
        let (l, r) = (&self.nodes[left], &self.nodes[right]);
        if op == Operator::Union {
            let mut firstpos = l.firstpos.clone();
            firstpos.union_with(&r.firstpos);
            let mut lastpos = l.lastpos.clone();
            lastpos.union_with(&r.lastpos);
            return Node {
                kind: NodeKind::Union(left, right),
                nullable: l.nullable || r.nullable,
                firstpos,
                lastpos,
            };
        }

        let mut firstpos = l.firstpos.clone();
        if l.nullable {
            firstpos.union_with(&r.firstpos);
        }
        let mut lastpos = r.lastpos.clone();
        if r.nullable {
            lastpos.union_with(&l.lastpos);
        }
        Node {
            kind: NodeKind::Concat(left, right),
            nullable: l.nullable && r.nullable,
            firstpos,
            lastpos,
        }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Index of the root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given index.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All nodes, children before parents.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of positions, which are `1..=num_positions()`.
    pub fn num_positions(&self) -> usize {
        self.symbols.len()
    }

    /// The symbol at a position.
    pub fn symbol_at(&self, position: Position) -> Option<Symbol> {
        position
            .checked_sub(1)
            .and_then(|index| self.symbols.get(index).copied())
    }

    /// The position of the end marker, if the expression was augmented with one.
    pub fn end_marker(&self) -> Option<Position> {
        self.symbols
            .iter()
            .rposition(|&symbol| symbol == Symbol::EndMarker)
            .map(|index| index + 1)
    }
}

/// A pending piece of output while printing a tree.
enum Print {
    Node(NodeId),
    Char(char),
}

impl fmt::Display for SyntaxTree {
    /// Writes the tree back as a fully parenthesized expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Explicit stack, pushed in reverse output order.
        let mut stack = vec![Print::Node(self.root)];
        while let Some(next) = stack.pop() {
            let id = match next {
                Print::Char(c) => {
                    write!(f, "{c}")?;
                    continue;
                }
                Print::Node(id) => id,
            };
            match self.nodes[id].kind {
                NodeKind::Leaf { symbol, .. } => write!(f, "{symbol}")?,
                NodeKind::Epsilon => write!(f, "{}", token::EPSILON)?,
                NodeKind::Star(child) => stack.extend([Print::Char('*'), Print::Node(child)]),
                NodeKind::Concat(left, right) => {
                    write!(f, "(")?;
                    stack.extend([
                        Print::Char(')'),
                        Print::Node(right),
                        Print::Char('.'),
                        Print::Node(left),
                    ]);
                }
                NodeKind::Union(left, right) => {
                    write!(f, "(")?;
                    stack.extend([
                        Print::Char(')'),
                        Print::Node(right),
                        Print::Char('|'),
                        Print::Node(left),
                    ]);
                }
            }
        }
        Ok(())
    }
}

//! Thompson's construction: evaluates a postfix expression over a stack of NFA fragments.

use gerber::Nfa;
use log::debug;

use crate::token::{Operator, Symbol, Token};
use crate::Error;

/// Builds an epsilon NFA for a postfix expression.
///
/// Every operand pushes a two state fragment, every operator pops its operands and pushes
/// the combined fragment, see [`Nfa::concat`], [`Nfa::union`] and [`Nfa::star`]. Exactly
/// one fragment must be left at the end.
pub fn construct(postfix: &[Token]) -> Result<Nfa<char>, Error> {
    let mut stack: Vec<Nfa<char>> = Vec::new();

    for &token in postfix {
        let fragment = match token {
            Token::Symbol(Symbol::Char(c)) => Nfa::literal(c),
            Token::Symbol(Symbol::Epsilon) => Nfa::epsilon(),
            Token::Symbol(Symbol::EndMarker) => {
                return Err(Error::MalformedExpression("the end marker is reserved"))
            }
            Token::Operator(Operator::Star) => stack
                .pop()
                .ok_or(Error::MalformedExpression("'*' is missing its operand"))?
                .star(),
            Token::Operator(op @ (Operator::Concat | Operator::Union)) => {
                let missing = match op {
                    Operator::Concat => "'.' is missing an operand",
                    _ => "'|' is missing an operand",
                };
                let right = stack.pop().ok_or(Error::MalformedExpression(missing))?;
                let left = stack.pop().ok_or(Error::MalformedExpression(missing))?;
                match op {
                    Operator::Concat => left.concat(right),
                    _ => left.union(right),
                }
            }
            Token::Open | Token::Close => {
                return Err(Error::MalformedExpression("parenthesis in postfix expression"))
            }
        };
        stack.push(fragment);
    }

    let nfa = match stack.pop() {
        Some(nfa) if stack.is_empty() => nfa,
        Some(_) => return Err(Error::MalformedExpression("operands without operator")),
        None => return Err(Error::MalformedExpression("empty expression")),
    };
    debug!(
        "thompson construction: {} nfa states, accept {}",
        nfa.num_states(),
        nfa.accept()
    );
    Ok(nfa)
}

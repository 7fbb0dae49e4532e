//! Shunting-yard conversion of normalized infix expressions to postfix.

use log::debug;
use smallvec::SmallVec;

use crate::normalize::Lexeme;
use crate::token::{self, Token};
use crate::Error;

/// Operators and open parentheses waiting for their right hand side. Patterns rarely
/// nest deep enough to spill.
type OperatorStack = SmallVec<[Lexeme; 16]>;

/// Converts a normalized infix expression to postfix.
///
/// Operators pop every operator of greater or equal precedence before being pushed, so
/// all of them are left associative. Parentheses do not appear in the output.
///
/// This only checks parentheses, operator arity is checked when the postfix expression
/// is evaluated.
pub fn to_postfix(infix: &[Lexeme]) -> Result<Vec<Token>, Error> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack = OperatorStack::new();

    for &lexeme in infix {
        match lexeme.token {
            Token::Symbol(_) => output.push(lexeme.token),
            Token::Open => stack.push(lexeme),
            Token::Close => loop {
                match stack.pop() {
                    Some(Lexeme { token: Token::Open, .. }) => break,
                    Some(top) => output.push(top.token),
                    None => {
                        return Err(Error::UnbalancedParen {
                            index: Some(lexeme.index),
                        })
                    }
                }
            },
            Token::Operator(op) => {
                while let Some(&top) = stack.last() {
                    match top.token {
                        Token::Operator(top_op) if top_op.precedence() >= op.precedence() => {
                            output.push(top.token);
                            stack.pop();
                        }
                        _ => break,
                    }
                }
                stack.push(lexeme);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.token == Token::Open {
            return Err(Error::UnbalancedParen {
                index: Some(top.index),
            });
        }
        output.push(top.token);
    }

    debug!("postfix: {}", token::to_string(&output));
    Ok(output)
}

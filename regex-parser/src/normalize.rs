//! Tokenizing a pattern and making concatenation explicit.

use log::trace;

use crate::token::{self, Operator, Token};
use crate::Error;

/// A token together with the char index it was read at.
///
/// Inserted concatenation operators carry the index of the character following them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    /// The token.
    pub token: Token,
    /// Char index in the pattern.
    pub index: usize,
}

/// Tokenizes `regex` and inserts a concatenation operator between every two adjacent
/// subexpressions, so `a(b|c)*d` becomes `a.(b|c)*.d`.
///
/// Aliases are canonicalized on the way: `+` becomes `|` and `ε` becomes `_`. Any
/// character outside of the alphanumeric symbols, `_`, `ε` and the operators `|+.*()`
/// fails with [`Error::InvalidCharacter`], including whitespace and the end marker `#`.
pub fn normalize(regex: &str) -> Result<Vec<Lexeme>, Error> {
    let mut lexemes: Vec<Lexeme> = Vec::with_capacity(regex.len() * 2);
    for (index, ch) in regex.chars().enumerate() {
        let token = Token::from_char(ch).ok_or(Error::InvalidCharacter { ch, index })?;
        if let Some(previous) = lexemes.last() {
            if previous.token.ends_operand() && token.starts_operand() {
                lexemes.push(Lexeme {
                    token: Token::Operator(Operator::Concat),
                    index,
                });
            }
        }
        lexemes.push(Lexeme { token, index });
    }
    trace!("normalized {regex:?} to {:?}", to_string(&lexemes));
    Ok(lexemes)
}

/// Writes the lexemes back as a canonical pattern.
pub fn to_string(lexemes: &[Lexeme]) -> String {
    let tokens: Vec<Token> = lexemes.iter().map(|lexeme| lexeme.token).collect();
    token::to_string(&tokens)
}

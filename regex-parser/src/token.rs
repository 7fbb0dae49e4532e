//! Symbols, operators and the characters that spell them.

use std::fmt;

/// The empty string symbol.
pub const EPSILON: char = '_';
/// Alternative spelling of [`EPSILON`] accepted in patterns.
pub const EPSILON_ALT: char = 'ε';
/// Marks the end of the input in the augmented expression of the direct construction.
/// Reserved, patterns may not contain it.
pub const END_MARKER: char = '#';
/// Alternative spelling of the union operator accepted in patterns.
pub const UNION_ALT: char = '+';

/// An operand of the regex language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A literal alphanumeric character.
    Char(char),
    /// Matches the empty string.
    Epsilon,
    /// The end-of-input marker.
    EndMarker,
}

/// A structural operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `|`
    Union,
    /// `.`
    Concat,
    /// `*`, postfix.
    Star,
}

impl Operator {
    /// Binding strength, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Union => 1,
            Self::Concat => 2,
            Self::Star => 3,
        }
    }

    /// Number of operands the operator pops.
    pub fn arity(self) -> usize {
        match self {
            Self::Star => 1,
            Self::Union | Self::Concat => 2,
        }
    }

    /// The canonical character of the operator.
    pub fn as_char(self) -> char {
        match self {
            Self::Union => '|',
            Self::Concat => '.',
            Self::Star => '*',
        }
    }
}

/// One element of an infix or postfix expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// An operand.
    Symbol(Symbol),
    /// An operator.
    Operator(Operator),
    /// `(`
    Open,
    /// `)`
    Close,
}

impl Token {
    /// Classifies a pattern character. The end marker is not part of the pattern alphabet.
    pub fn from_char(c: char) -> Option<Token> {
        let token = match c {
            EPSILON | EPSILON_ALT => Token::Symbol(Symbol::Epsilon),
            '|' | UNION_ALT => Token::Operator(Operator::Union),
            '.' => Token::Operator(Operator::Concat),
            '*' => Token::Operator(Operator::Star),
            '(' => Token::Open,
            ')' => Token::Close,
            c if c.is_alphanumeric() => Token::Symbol(Symbol::Char(c)),
            _ => return None,
        };
        Some(token)
    }

    /// Returns if the token is an operand.
    pub fn is_operand(self) -> bool {
        matches!(self, Token::Symbol(_))
    }

    /// Returns if a subexpression can end with this token.
    pub fn ends_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Operator(Operator::Star) | Token::Close)
    }

    /// Returns if a subexpression can start with this token.
    pub fn starts_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Open)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::Epsilon => write!(f, "{EPSILON}"),
            Symbol::EndMarker => write!(f, "{END_MARKER}"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol(symbol) => symbol.fmt(f),
            Token::Operator(op) => write!(f, "{}", op.as_char()),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
        }
    }
}

/// Writes tokens back as a pattern string, e.g. a postfix expression `ab|*`.
pub fn to_string(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

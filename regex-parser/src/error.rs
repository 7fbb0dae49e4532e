use std::fmt;

/// Errors raised while compiling a regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A character which is neither an alphanumeric symbol, the epsilon symbol nor an operator.
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Its index in the pattern, counted in chars.
        index: usize,
    },
    /// A `)` without matching `(`, or a `(` never closed.
    UnbalancedParen {
        /// Char index of the unmatched parenthesis, when known.
        index: Option<usize>,
    },
    /// An operator without enough operands, operands left without an operator, or an
    /// empty expression.
    MalformedExpression(&'static str),
    /// Minimization could not map a state to an equivalence class.
    InconsistentPartition {
        /// The state of the unminimized DFA.
        state: gerber::StateId,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter { ch, index } => {
                write!(f, "invalid character {ch:?} at index {index}")
            }
            Self::UnbalancedParen { index: Some(index) } => {
                write!(f, "unbalanced parenthesis at index {index}")
            }
            Self::UnbalancedParen { index: None } => write!(f, "unbalanced parenthesis"),
            Self::MalformedExpression(reason) => write!(f, "malformed expression: {reason}"),
            Self::InconsistentPartition { state } => {
                write!(f, "minimization failed, state {state} has no consistent class")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<gerber::Error> for Error {
    fn from(error: gerber::Error) -> Self {
        match error {
            gerber::Error::InconsistentPartition { state } => Self::InconsistentPartition { state },
        }
    }
}

#![warn(missing_docs)]

//! Compiles regular expressions to minimal DFAs.
//!
//! The language has alphanumeric symbols, the empty string `_` (also `ε`), union `|`
//! (also `+`), optional explicit concatenation `.`, Kleene star `*` and parentheses.
//! Patterns are normalized, converted to postfix and then turned into a [`Dfa`] in one of
//! two ways:
//!
//! - [`Construction::Direct`]: a syntax tree of the pattern augmented with an end marker,
//!   its followpos relation, and position sets as DFA states.
//! - [`Construction::Thompson`]: an epsilon NFA from Thompson's construction, determinized
//!   by subset construction.
//!
//! Both give DFAs for the same language, and by default the result is minimized.
//!
//! ```
//! let regex = regex_parser::Regex::new("(a|b)*abb").unwrap();
//! assert!(regex.is_match("babb"));
//! assert!(!regex.is_match("abba"));
//! assert_eq!(regex.dfa().num_states(), 4);
//! ```

pub mod direct;
mod error;
/// The followpos relation over the positions of a syntax tree.
pub mod followpos;
pub mod normalize;
mod options;
pub mod postfix;
pub mod syntax_tree;
pub mod thompson;
pub mod token;

use std::fmt;

pub use gerber::{Dfa, Nfa, Simulate};
use log::debug;

pub use error::Error;
pub use followpos::Followpos;
pub use normalize::normalize;
pub use options::{CompileOptions, Construction};
pub use postfix::to_postfix;
pub use syntax_tree::SyntaxTree;

/// Compiles `regex` to a minimal DFA by direct construction.
pub fn compile(regex: &str) -> Result<Dfa<char>, Error> {
    compile_with(regex, &CompileOptions::default())
}

/// Compiles `regex` to a DFA as set out by `options`.
pub fn compile_with(regex: &str, options: &CompileOptions) -> Result<Dfa<char>, Error> {
    let postfix = to_postfix(&normalize(regex)?)?;
    let dfa = match options.construction {
        Construction::Direct => direct::construct(&postfix)?,
        Construction::Thompson => Dfa::from_nfa(&thompson::construct(&postfix)?),
    };
    debug!(
        "compiled {regex:?} with {:?}: {} states",
        options.construction,
        dfa.num_states()
    );

    if options.minimize {
        minimize(&dfa)
    } else {
        Ok(dfa)
    }
}

/// Minimizes a DFA, see [`Dfa::minimize`].
pub fn minimize(dfa: &Dfa<char>) -> Result<Dfa<char>, Error> {
    Ok(dfa.minimize()?)
}

/// Runs `dfa` over `input`. Characters without a transition reject.
pub fn matches(dfa: &Dfa<char>, input: &str) -> bool {
    dfa.simulate_iter(input.chars())
}

/// A compiled regex.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    dfa: Dfa<char>,
}

impl Regex {
    /// Compiles `pattern` with the default options.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Self::with_options(pattern, &CompileOptions::default())
    }

    /// Compiles `pattern` with the given options.
    pub fn with_options(pattern: &str, options: &CompileOptions) -> Result<Self, Error> {
        Ok(Self {
            pattern: pattern.to_owned(),
            dfa: compile_with(pattern, options)?,
        })
    }

    /// Returns if the whole of `input` matches.
    pub fn is_match(&self, input: &str) -> bool {
        matches(&self.dfa, input)
    }

    /// The compiled automaton.
    pub fn dfa(&self) -> &Dfa<char> {
        &self.dfa
    }

    /// The pattern this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

// MARK: Tests
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const DIRECT: CompileOptions = CompileOptions {
        construction: Construction::Direct,
        minimize: false,
    };

    const THOMPSON: CompileOptions = CompileOptions {
        construction: Construction::Thompson,
        minimize: false,
    };

    fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut last = vec![String::new()];
        for _ in 0..max_len {
            last = last
                .iter()
                .flat_map(|prefix| alphabet.iter().map(move |c| format!("{prefix}{c}")))
                .collect();
            all.extend(last.iter().cloned());
        }
        all
    }

    fn nfa(regex: &str) -> Nfa<char> {
        thompson::construct(&to_postfix(&normalize(regex).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn test_a_star_b() {
        init();
        let regex = Regex::new("a*b").unwrap();
        for input in ["b", "ab", "aab", "aaab"] {
            assert!(regex.is_match(input), "{input}");
        }
        for input in ["", "a", "ba", "abc"] {
            assert!(!regex.is_match(input), "{input}");
        }
    }

    #[test]
    fn test_textbook_example() {
        init();
        for construction in [Construction::Direct, Construction::Thompson] {
            let options = CompileOptions::new().construction(construction);
            let regex = Regex::with_options("(a|b)*abb", &options).unwrap();
            assert_eq!(regex.dfa().num_states(), 4, "{construction:?}");
            for input in ["abb", "aabb", "babb"] {
                assert!(regex.is_match(input), "{input}");
            }
            // does not end in abb
            for input in ["ab", "abba", "abbb"] {
                assert!(!regex.is_match(input), "{input}");
            }
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(compile("(a|b").unwrap_err(), Error::UnbalancedParen { index: Some(0) });
        assert!(matches!(compile("|a"), Err(Error::MalformedExpression(_))));
        assert!(matches!(compile(""), Err(Error::MalformedExpression(_))));
        assert_eq!(
            compile("a#").unwrap_err(),
            Error::InvalidCharacter { ch: '#', index: 1 }
        );
        assert_eq!(
            Regex::with_options("a)", &THOMPSON).unwrap_err(),
            Error::UnbalancedParen { index: Some(1) }
        );
        assert_eq!(
            Error::InvalidCharacter { ch: '#', index: 1 }.to_string(),
            "invalid character '#' at index 1"
        );
    }

    #[test]
    fn test_double_star() {
        init();
        let single = compile("a*").unwrap();
        let double = compile("a**").unwrap();
        assert_eq!(single.num_states(), double.num_states());
        for input in all_strings(&['a', 'b'], 6) {
            assert_eq!(matches(&single, &input), matches(&double, &input), "{input}");
        }
    }

    #[test]
    fn test_aliases() {
        let plus = compile("a+bε").unwrap();
        let canonical = compile("a|b_").unwrap();
        for input in all_strings(&['a', 'b'], 3) {
            assert_eq!(matches(&plus, &input), matches(&canonical, &input), "{input}");
        }
    }

    #[test]
    fn test_unminimized_options() {
        let direct = compile_with("(a|b)*abb", &DIRECT).unwrap();
        let subset = compile_with("(a|b)*abb", &THOMPSON).unwrap();
        assert_eq!(direct.kind(), gerber::StateKind::Positions);
        assert_eq!(subset.kind(), gerber::StateKind::NfaStates);
        assert_eq!(direct.num_states(), 4);
        assert_eq!(subset.num_states(), 5);

        let minimized = minimize(&subset).unwrap();
        assert_eq!(minimized.kind(), gerber::StateKind::Classes);
        assert_eq!(minimized.num_states(), 4);
        assert_eq!(minimize(&minimized).unwrap().num_states(), 4);
    }

    #[test]
    fn test_regex_facade() {
        let regex = Regex::new("ab(c|_)").unwrap();
        assert_eq!(regex.as_str(), "ab(c|_)");
        assert_eq!(regex.to_string(), "ab(c|_)");
        assert!(regex.is_match("ab"));
        assert!(regex.is_match("abc"));
        assert!(!regex.is_match("abcc"));
        assert!(!regex.is_match("ab_"));
    }

    #[test]
    fn test_long_union() {
        init();
        let pattern = format!("{}b", "a|".repeat(3_000));
        for construction in [Construction::Direct, Construction::Thompson] {
            let options = CompileOptions::new().construction(construction);
            let regex = Regex::with_options(&pattern, &options).unwrap();
            assert_eq!(regex.dfa().num_states(), 2, "{construction:?}");
            assert!(regex.is_match("a"));
            assert!(regex.is_match("b"));
            assert!(!regex.is_match("ab"));
        }
    }

    fn regex_strategy() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![Just("a"), Just("b"), Just("_")].prop_map(String::from);
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l})({r})")),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l})|({r})")),
                inner.prop_map(|x| format!("({x})*")),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn constructions_agree(regex in regex_strategy()) {
            let direct = compile_with(&regex, &DIRECT).unwrap();
            let subset = compile_with(&regex, &THOMPSON).unwrap();
            let nfa = nfa(&regex);
            for input in all_strings(&['a', 'b', 'c'], 4) {
                let expected = nfa.simulate_iter(input.chars());
                prop_assert_eq!(matches(&direct, &input), expected, "{} on {:?}", regex, input);
                prop_assert_eq!(matches(&subset, &input), expected, "{} on {:?}", regex, input);
            }
        }

        #[test]
        fn minimal_dfas_have_equal_size(regex in regex_strategy()) {
            let direct = compile_with(&regex, &CompileOptions::new()).unwrap();
            let subset = compile_with(&regex, &CompileOptions::new().construction(Construction::Thompson)).unwrap();
            prop_assert_eq!(direct.num_states(), subset.num_states());
            prop_assert_eq!(direct.accepting().len(), subset.accepting().len());
            prop_assert_eq!(direct.transitions().len(), subset.transitions().len());
        }

        #[test]
        fn minimization_preserves_language(regex in regex_strategy()) {
            let dfa = compile_with(&regex, &THOMPSON).unwrap();
            let minimized = minimize(&dfa).unwrap();
            prop_assert!(minimized.num_states() <= dfa.num_states());
            prop_assert_eq!(minimize(&minimized).unwrap().num_states(), minimized.num_states());
            for input in all_strings(&['a', 'b'], 5) {
                prop_assert_eq!(matches(&minimized, &input), matches(&dfa, &input), "{:?}", input);
            }
        }
    }
}

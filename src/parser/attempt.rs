//! The parser contract: attempts, token parsers and leaf grammars.

use crate::parser::{FieldKey, Fields, Value};

/// Outcome of running a parser against a token slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// The parser claims the first `consumed` tokens of its slice.
    Match {
        consumed: usize,
        fields: Fields,
        /// Reasons absorbed by optional parsers, kept for error aggregation
        diagnostics: Vec<String>,
    },
    /// The parser could not recognize its grammar.
    NoMatch {
        /// Tokens validated before the failure, used to pick the best diagnostic
        progress: usize,
        errors: Vec<String>,
        /// Fields resolved before the failure, for diagnostic display only
        partial: Fields,
    },
}

impl Attempt {
    /// Creates a match claiming the first `consumed` tokens, without
    /// diagnostics.
    ///
    /// # Arguments
    ///
    /// * `consumed` - Number of leading tokens the parser validated
    /// * `fields` - Fields resolved from those tokens
    pub fn matched(consumed: usize, fields: Fields) -> Self {
        Attempt::Match {
            consumed,
            fields,
            diagnostics: Vec::new(),
        }
    }

    /// Creates a failure that validated no token.
    ///
    /// `error` is the human-readable reason shown to the user when this
    /// failure ends up being the closest attempt.
    pub fn no_match(error: String) -> Self {
        Attempt::NoMatch {
            progress: 0,
            errors: vec![error],
            partial: Fields::new(),
        }
    }
}

/// Anything that can be applied to a token slice.
///
/// Implementations must be pure and total: they only look at a prefix of the
/// slice, never panic on malformed input and never claim tokens they did not
/// validate.
pub trait TokenParser: Send + Sync {
    /// Runs the parser against `tokens`, starting at the first one.
    ///
    /// # Returns
    ///
    /// * `Attempt::Match` - The parser claims a prefix of `tokens`, possibly empty
    /// * `Attempt::NoMatch` - The grammar is not found, with the reasons why
    fn attempt(&self, tokens: &[String]) -> Attempt;

    /// Every field key this parser may produce.
    fn field_keys(&self) -> Vec<FieldKey>;
}

/// A grammar recognizing exactly one token.
pub trait LeafParser: Send + Sync {
    /// Field key the recognized value is stored under.
    fn key(&self) -> FieldKey;

    /// Short description of the expected input, e.g. `round (e.g. r40)`.
    fn describe(&self) -> String;

    /// Converts `token` into a value.
    ///
    /// # Errors
    ///
    /// Returns the reason the token is rejected, e.g. ``"`r101` is out of range"``.
    fn recognize(&self, token: &str) -> Result<Value, String>;
}

impl<P: LeafParser> TokenParser for P {
    fn attempt(&self, tokens: &[String]) -> Attempt {
        let Some(token) = tokens.first() else {
            return Attempt::no_match(format!("missing {}", self.describe()));
        };

        match self.recognize(token) {
            Ok(value) => Attempt::matched(1, Fields::single(self.key(), value)),
            Err(reason) => Attempt::no_match(reason),
        }
    }

    fn field_keys(&self) -> Vec<FieldKey> {
        vec![self.key()]
    }
}

impl LeafParser for Box<dyn LeafParser> {
    fn key(&self) -> FieldKey {
        self.as_ref().key()
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        self.as_ref().recognize(token)
    }
}

/// A leaf parser re-bound to another field key.
pub struct Keyed<P: LeafParser> {
    key: FieldKey,
    inner: P,
}

impl<P: LeafParser> LeafParser for Keyed<P> {
    fn key(&self) -> FieldKey {
        self.key
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        self.inner.recognize(token)
    }
}

/// Combinators available on every leaf parser.
pub trait LeafParserExt: LeafParser + Sized {
    /// Stores the recognized value under `key` instead of the default key.
    fn keyed(self, key: FieldKey) -> Keyed<Self> {
        Keyed { key, inner: self }
    }
}

impl<P: LeafParser> LeafParserExt for P {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Digit;

    impl LeafParser for Digit {
        fn key(&self) -> FieldKey {
            FieldKey::NaturalNumber
        }

        fn describe(&self) -> String {
            "digit".to_string()
        }

        fn recognize(&self, token: &str) -> Result<Value, String> {
            token
                .parse::<u64>()
                .map(Value::NaturalNumber)
                .map_err(|_| format!("`{token}` is not a digit"))
        }
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_leaf_consumes_one_token() {
        let attempt = Digit.attempt(&tokens(&["7", "8"]));
        assert_eq!(
            attempt,
            Attempt::matched(1, Fields::single(FieldKey::NaturalNumber, Value::NaturalNumber(7)))
        );
    }

    #[test]
    fn test_leaf_rejects_with_reason() {
        match Digit.attempt(&tokens(&["x"])) {
            Attempt::NoMatch {
                progress, errors, ..
            } => {
                assert_eq!(progress, 0);
                assert_eq!(errors, vec!["`x` is not a digit".to_string()]);
            }
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_on_empty_slice() {
        match Digit.attempt(&[]) {
            Attempt::NoMatch { errors, .. } => assert_eq!(errors, vec!["missing digit".to_string()]),
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_keyed_rebinds_field() {
        let parser = Digit.keyed(FieldKey::Round);
        assert_eq!(parser.field_keys(), vec![FieldKey::Round]);
        match parser.attempt(&tokens(&["3"])) {
            Attempt::Match { fields, .. } => {
                assert_eq!(fields.natural_number(FieldKey::Round), Some(3))
            }
            other => panic!("expected match, got {other:?}"),
        }
    }
}

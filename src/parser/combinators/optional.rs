use crate::parser::{Attempt, FieldKey, Fields, TokenParser};

/// Wraps a parser so that a non-match becomes a zero-width match.
///
/// The inner keys are always declared in the produced fields, unresolved when
/// the inner parser did not match. Its failure reasons are kept as
/// diagnostics, never as errors.
pub struct OptionalParser {
    inner: Box<dyn TokenParser>,
}

impl OptionalParser {
    pub fn new(inner: impl TokenParser + 'static) -> Self {
        OptionalParser {
            inner: Box::new(inner),
        }
    }
}

impl TokenParser for OptionalParser {
    fn attempt(&self, tokens: &[String]) -> Attempt {
        let declared = Fields::declared(&self.inner.field_keys());

        match self.inner.attempt(tokens) {
            Attempt::Match {
                consumed,
                fields,
                diagnostics,
            } => {
                let mut merged = declared;
                merged.merge(fields);
                Attempt::Match {
                    consumed,
                    fields: merged,
                    diagnostics,
                }
            }
            Attempt::NoMatch { errors, .. } => Attempt::Match {
                consumed: 0,
                fields: declared,
                // Nothing was supplied: "missing" reasons are noise
                diagnostics: if tokens.is_empty() { Vec::new() } else { errors },
            },
        }
    }

    fn field_keys(&self) -> Vec<FieldKey> {
        self.inner.field_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{
        Value,
        leaves::RoundParser,
    };

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_passes_match_through() {
        let parser = OptionalParser::new(RoundParser);
        match parser.attempt(&tokens(&["r12", "x"])) {
            Attempt::Match {
                consumed, fields, ..
            } => {
                assert_eq!(consumed, 1);
                assert_eq!(fields.get(FieldKey::Round), Some(&Value::Round(12)));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_non_match_is_zero_width_with_absent_value() {
        let parser = OptionalParser::new(RoundParser);
        match parser.attempt(&tokens(&["gwen"])) {
            Attempt::Match {
                consumed,
                fields,
                diagnostics,
            } => {
                assert_eq!(consumed, 0);
                assert!(fields.contains_key(FieldKey::Round));
                assert!(!fields.is_resolved(FieldKey::Round));
                assert_eq!(diagnostics.len(), 1);
                assert!(diagnostics[0].contains("not a round"));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_has_no_diagnostics() {
        let parser = OptionalParser::new(RoundParser);
        match parser.attempt(&[]) {
            Attempt::Match { diagnostics, .. } => assert!(diagnostics.is_empty()),
            other => panic!("expected match, got {other:?}"),
        }
    }
}

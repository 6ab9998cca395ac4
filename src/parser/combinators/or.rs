use crate::parser::{
    Attempt, FieldKey, Fields, SchemaError, TokenParser, combinators::ensure_disjoint,
};

/// One shape accepted by an [`OrParser`].
pub enum Alternative {
    Single(Box<dyn TokenParser>),
    /// Parsers applied one after the other, each on what the previous left
    Sequence(Vec<Box<dyn TokenParser>>),
}

impl Alternative {
    pub fn single(parser: impl TokenParser + 'static) -> Self {
        Alternative::Single(Box::new(parser))
    }

    fn field_keys(&self) -> Vec<FieldKey> {
        match self {
            Alternative::Single(parser) => parser.field_keys(),
            Alternative::Sequence(parsers) => {
                parsers.iter().flat_map(|parser| parser.field_keys()).collect()
            }
        }
    }

    fn attempt(&self, tokens: &[String]) -> Attempt {
        let parsers = match self {
            Alternative::Single(parser) => return parser.attempt(tokens),
            Alternative::Sequence(parsers) => parsers,
        };

        let mut consumed = 0;
        let mut fields = Fields::new();
        let mut diagnostics = Vec::new();
        for parser in parsers {
            match parser.attempt(&tokens[consumed..]) {
                Attempt::Match {
                    consumed: claimed,
                    fields: matched,
                    diagnostics: absorbed,
                } => {
                    consumed += claimed;
                    fields.merge(matched);
                    diagnostics.extend(absorbed);
                }
                Attempt::NoMatch {
                    progress,
                    errors,
                    partial,
                } => {
                    fields.merge(partial);
                    return Attempt::NoMatch {
                        progress: consumed + progress,
                        errors,
                        partial: fields,
                    };
                }
            }
        }

        Attempt::Match {
            consumed,
            fields,
            diagnostics,
        }
    }
}

/// Tries alternatives in declaration order; the first full match wins.
///
/// When nothing matches, the errors of the alternative that validated the most
/// tokens are reported, the earliest alternative winning ties.
pub struct OrParser {
    alternatives: Vec<Alternative>,
}

impl OrParser {
    /// Fails when a sequence alternative produces the same key twice.
    pub fn new(alternatives: Vec<Alternative>) -> Result<Self, SchemaError> {
        for alternative in &alternatives {
            if let Alternative::Sequence(parsers) = alternative {
                ensure_disjoint(parsers)?;
            }
        }
        Ok(OrParser { alternatives })
    }
}

impl TokenParser for OrParser {
    fn attempt(&self, tokens: &[String]) -> Attempt {
        let declared = Fields::declared(&self.field_keys());
        let mut best: Option<(usize, Vec<String>, Fields)> = None;

        for alternative in &self.alternatives {
            match alternative.attempt(tokens) {
                Attempt::Match {
                    consumed,
                    fields,
                    diagnostics,
                } => {
                    let mut merged = declared;
                    merged.merge(fields);
                    return Attempt::Match {
                        consumed,
                        fields: merged,
                        diagnostics,
                    };
                }
                Attempt::NoMatch {
                    progress,
                    errors,
                    partial,
                } => {
                    if best.as_ref().is_none_or(|(best, _, _)| progress > *best) {
                        best = Some((progress, errors, partial));
                    }
                }
            }
        }

        match best {
            Some((progress, errors, partial)) => Attempt::NoMatch {
                progress,
                errors,
                partial,
            },
            None => Attempt::no_match("no alternative to try".to_string()),
        }
    }

    fn field_keys(&self) -> Vec<FieldKey> {
        let mut keys = Vec::new();
        for key in self.alternatives.iter().flat_map(Alternative::field_keys) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{
        LeafParserExt, Value,
        leaves::{NaturalNumberParser, RoundParser},
    };

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn two_rounds_or_one() -> OrParser {
        OrParser::new(vec![
            Alternative::Sequence(vec![
                Box::new(RoundParser.keyed(FieldKey::StartingRound)),
                Box::new(RoundParser.keyed(FieldKey::EnergizerRound)),
            ]),
            Alternative::single(RoundParser.keyed(FieldKey::StartingRound)),
            Alternative::single(NaturalNumberParser),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_declared_alternative_wins() {
        let parser = OrParser::new(vec![
            Alternative::single(RoundParser),
            Alternative::single(RoundParser.keyed(FieldKey::StartingRound)),
        ])
        .unwrap();

        match parser.attempt(&tokens(&["r10"])) {
            Attempt::Match { fields, .. } => {
                assert_eq!(fields.round(FieldKey::Round), Some(10));
                assert!(!fields.is_resolved(FieldKey::StartingRound));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_alternative() {
        match two_rounds_or_one().attempt(&tokens(&["r3", "r9"])) {
            Attempt::Match {
                consumed, fields, ..
            } => {
                assert_eq!(consumed, 2);
                assert_eq!(fields.round(FieldKey::StartingRound), Some(3));
                assert_eq!(fields.round(FieldKey::EnergizerRound), Some(9));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_falls_back_to_shorter_shape() {
        match two_rounds_or_one().attempt(&tokens(&["r3"])) {
            Attempt::Match {
                consumed, fields, ..
            } => {
                assert_eq!(consumed, 1);
                assert_eq!(fields.round(FieldKey::StartingRound), Some(3));
                assert!(fields.contains_key(FieldKey::EnergizerRound));
                assert!(!fields.is_resolved(FieldKey::EnergizerRound));
            }
            other => panic!("expected match, got {other:?}"),
        }

        match two_rounds_or_one().attempt(&tokens(&["12"])) {
            Attempt::Match { fields, .. } => {
                assert_eq!(fields.get(FieldKey::NaturalNumber), Some(&Value::NaturalNumber(12)))
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_reports_errors_of_furthest_alternative() {
        let parser = OrParser::new(vec![
            Alternative::single(NaturalNumberParser),
            Alternative::Sequence(vec![
                Box::new(RoundParser.keyed(FieldKey::StartingRound)),
                Box::new(RoundParser.keyed(FieldKey::EnergizerRound)),
            ]),
        ])
        .unwrap();

        match parser.attempt(&tokens(&["r3", "r900"])) {
            Attempt::NoMatch {
                progress,
                errors,
                partial,
            } => {
                assert_eq!(progress, 1);
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("out of range"));
                assert_eq!(partial.round(FieldKey::StartingRound), Some(3));
            }
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_ties_go_to_declaration_order() {
        match two_rounds_or_one().attempt(&tokens(&["gwen"])) {
            Attempt::NoMatch { errors, .. } => {
                assert_eq!(errors, vec!["`gwen` is not a round (expected e.g. r40)".to_string()])
            }
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_key_in_sequence_is_rejected() {
        let result = OrParser::new(vec![Alternative::Sequence(vec![
            Box::new(RoundParser),
            Box::new(RoundParser),
        ])]);
        assert!(matches!(result, Err(SchemaError::DuplicateKey(FieldKey::Round))));
    }
}

use itertools::Itertools;
use log::trace;

use crate::parser::{
    Attempt, FieldKey, Fields, SchemaError, TokenParser, combinators::ensure_disjoint,
    command_parser::dedup,
};

/// Matches its sub-parsers against the input in any order.
///
/// Orderings of the sub-parsers are tried lexicographically by declaration
/// index (`[0, 1, .., n-1]` first). For each ordering, every sub-parser is
/// applied greedily to what the previous ones left. The first ordering where
/// every sub-parser matches and no token is left wins, so the result is
/// deterministic but not necessarily the only valid reading of an ambiguous
/// input.
///
/// When no ordering succeeds, the errors of the ordering that validated the
/// most tokens are reported, the earliest ordering winning ties.
pub struct AnyOrderParser {
    parsers: Vec<Box<dyn TokenParser>>,
    keys: Vec<FieldKey>,
}

struct Failure {
    progress: usize,
    errors: Vec<String>,
    partial: Fields,
}

impl AnyOrderParser {
    /// Fails when two sub-parsers produce the same field key.
    pub fn new(parsers: Vec<Box<dyn TokenParser>>) -> Result<Self, SchemaError> {
        let keys = ensure_disjoint(&parsers)?;
        Ok(AnyOrderParser { parsers, keys })
    }

    fn attempt_ordering(&self, ordering: &[usize], tokens: &[String]) -> Result<Attempt, Failure> {
        let mut consumed = 0;
        let mut fields = Fields::declared(&self.keys);
        let mut diagnostics = Vec::new();

        for index in ordering {
            match self.parsers[*index].attempt(&tokens[consumed..]) {
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
                    diagnostics.extend(errors);
                    return Err(Failure {
                        progress: consumed + progress,
                        errors: diagnostics,
                        partial: fields,
                    });
                }
            }
        }

        if let Some(leftover) = tokens.get(consumed) {
            diagnostics.push(format!("unexpected input `{leftover}`"));
            return Err(Failure {
                progress: consumed,
                errors: diagnostics,
                partial: fields,
            });
        }

        Ok(Attempt::matched(consumed, fields))
    }
}

impl TokenParser for AnyOrderParser {
    fn attempt(&self, tokens: &[String]) -> Attempt {
        let mut best: Option<Failure> = None;

        for ordering in (0..self.parsers.len()).permutations(self.parsers.len()) {
            match self.attempt_ordering(&ordering, tokens) {
                Ok(attempt) => {
                    trace!("any-order match with ordering {ordering:?}");
                    return attempt;
                }
                Err(failure) => {
                    if best.as_ref().is_none_or(|best| failure.progress > best.progress) {
                        best = Some(failure);
                    }
                }
            }
        }

        match best {
            Some(mut failure) => {
                dedup(&mut failure.errors);
                Attempt::NoMatch {
                    progress: failure.progress,
                    errors: failure.errors,
                    partial: failure.partial,
                }
            }
            None => Attempt::no_match("no argument expected".to_string()),
        }
    }

    fn field_keys(&self) -> Vec<FieldKey> {
        self.keys.clone()
    }
}

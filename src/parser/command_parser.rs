//! Entry point applying a parser tree to a whole token list.

use log::debug;
use thiserror::Error;

use crate::parser::{Attempt, FieldKey, Fields, TokenParser};

/// Errors raised while assembling a parser tree or a reaction chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field `{0}` is produced by more than one parser")]
    DuplicateKey(FieldKey),
    #[error("field `{0}` is not declared by the command schema")]
    UndeclaredKey(FieldKey),
}

/// Outcome of parsing a command's arguments.
///
/// When [`ParseResult::has_errors`] is true, the field values must not be
/// trusted: they are only kept for diagnostic display.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub fields: Fields,
    pub parsing_errors: Vec<String>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.parsing_errors.is_empty()
    }
}

/// Splits a message body into argument tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Runs `tree` once over `tokens`.
///
/// The whole token list must be consumed: a tree that only matches a prefix
/// reports the first leftover token as an error.
pub fn parse(tokens: &[String], tree: &dyn TokenParser) -> ParseResult {
    let mut result = match tree.attempt(tokens) {
        Attempt::Match {
            consumed, fields, ..
        } if consumed == tokens.len() => ParseResult {
            fields,
            parsing_errors: Vec::new(),
        },
        Attempt::Match {
            consumed,
            fields,
            diagnostics,
        } => {
            let mut parsing_errors = diagnostics;
            parsing_errors.push(format!("unexpected input `{}`", tokens[consumed]));
            ParseResult {
                fields,
                parsing_errors,
            }
        }
        Attempt::NoMatch {
            errors, partial, ..
        } => ParseResult {
            fields: partial,
            parsing_errors: errors,
        },
    };

    for key in tree.field_keys() {
        result.fields.declare(key);
    }
    dedup(&mut result.parsing_errors);

    debug!(
        "parsed {} token(s) with {} error(s)",
        tokens.len(),
        result.parsing_errors.len()
    );
    result
}

/// Removes repeated messages, keeping the first occurrence of each.
pub(crate) fn dedup(errors: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    errors.retain(|error| seen.insert(error.clone()));
}

/// The fixed set of field keys a command exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    keys: Vec<FieldKey>,
}

impl Schema {
    pub fn new(keys: &[FieldKey]) -> Result<Self, SchemaError> {
        let mut seen = Vec::with_capacity(keys.len());
        for key in keys {
            if seen.contains(key) {
                return Err(SchemaError::DuplicateKey(*key));
            }
            seen.push(*key);
        }
        Ok(Schema { keys: seen })
    }

    pub fn keys(&self) -> &[FieldKey] {
        &self.keys
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.keys.contains(&key)
    }
}

/// A parser tree bound to a command schema.
pub struct CommandParser {
    schema: Schema,
    tree: Box<dyn TokenParser>,
}

impl CommandParser {
    /// Binds `tree` to `schema`, refusing trees producing undeclared keys.
    pub fn new(schema: Schema, tree: Box<dyn TokenParser>) -> Result<Self, SchemaError> {
        if let Some(key) = tree.field_keys().into_iter().find(|key| !schema.contains(*key)) {
            return Err(SchemaError::UndeclaredKey(key));
        }
        Ok(CommandParser { schema, tree })
    }

    /// Parses `tokens`; every schema key is declared in the result.
    pub fn parse(&self, tokens: &[String]) -> ParseResult {
        let mut result = parse(tokens, self.tree.as_ref());
        for key in self.schema.keys() {
            result.fields.declare(*key);
        }
        result
    }
}

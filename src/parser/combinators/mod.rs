//! Generic operators over parsers.
//!
//! - [`OptionalParser`]: never fails, matches zero tokens when its inner
//!   parser does not recognize the input.
//! - [`OrParser`]: first alternative (single parser or sequence) that matches
//!   wins.
//! - [`AnyOrderParser`]: assigns order-independent spans to its sub-parsers
//!   and requires the whole input to be consumed.

mod any_order;
mod optional;
mod or;

pub use crate::parser::combinators::{
    any_order::AnyOrderParser,
    optional::OptionalParser,
    or::{Alternative, OrParser},
};

use crate::parser::{FieldKey, SchemaError, TokenParser};

/// Fails when two parsers of the same group produce the same key.
fn ensure_disjoint(parsers: &[Box<dyn TokenParser>]) -> Result<Vec<FieldKey>, SchemaError> {
    let mut keys = Vec::new();
    for parser in parsers {
        let mut own = parser.field_keys();
        own.dedup();
        for key in own {
            if keys.contains(&key) {
                return Err(SchemaError::DuplicateKey(key));
            }
            keys.push(key);
        }
    }
    Ok(keys)
}

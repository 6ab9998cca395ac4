//! Composable argument parsing.
//!
//! Commands declare their argument grammar as a tree of parsers. Leaves
//! recognize one token each ([`leaves`]); combinators ([`combinators`]) compose
//! them into optional, alternative and order-independent shapes. The
//! [`CommandParser`] entry point runs a tree against the whitespace-split
//! arguments of a message and produces a `ParseResult`.
//!
//! # Architecture
//!
//! ```text
//! tokens: ["gwen", "r40", "expert"]
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────┐
//! │ AnyOrderParser                               │
//! │  ├── OptionalParser(HeroParser)              │
//! │  ├── OptionalParser(RoundParser)             │
//! │  └── OptionalParser(MapDifficultyParser)     │
//! └──────────────────────────────────────────────┘
//!      │
//!      ▼
//! ParseResult { fields: {hero: gwen, round: 40, map_difficulty: expert}, parsing_errors: [] }
//! ```
//!
//! # Field keys
//!
//! Every parser advertises the [`FieldKey`]s it may produce through
//! [`TokenParser::field_keys`]. Trees are validated when they are built:
//! two sub-parsers of the same any-order group (or of the same sequence
//! alternative) can never write to the same key, and a [`CommandParser`]
//! refuses a tree whose keys are not part of its command's [`Schema`].
//!
//! # Examples
//!
//! ```ignore
//! let tree = AnyOrderParser::new(vec![
//!     Box::new(OptionalParser::new(HeroParser::new(aliases.clone()))),
//!     Box::new(OptionalParser::new(RoundParser)),
//! ])?;
//! let result = parse(&tokens, &tree);
//! if !result.has_errors() {
//!     println!("{:?}", result.fields.hero(FieldKey::Hero));
//! }
//! ```

mod attempt;
pub mod combinators;
mod command_parser;
mod fields;
pub mod leaves;
mod value;

pub use crate::parser::{
    attempt::{Attempt, LeafParser, LeafParserExt, TokenParser},
    command_parser::{CommandParser, Schema, SchemaError, tokenize},
    fields::{FieldKey, Fields},
    value::{Crosspath, MapDifficulty, Path, Value, Version},
};

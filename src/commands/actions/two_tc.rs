//! 2tc command handler.
//!
//! Looks up two-tower CHIMPS combos. Every argument is optional and may come
//! in any order:
//!
//! ```text
//! !q 2tc [map] [tower [tower] | combo_number] [u#person] [version]
//! ```
//!
//! A tower is a base tower (`dart`), a tower path (`dart#top`), a tower
//! upgrade (`dart#025`, `sun_avatar`) or a hero (`gwen`).

use std::sync::Arc;

use log::debug;

use crate::{
    aliases::AliasProvider,
    combos::{ComboLoader, ComboQuery, filter_combos},
    commands::{
        CommandResult,
        markdown_response::{format_combos, format_parsing_errors, format_two_tc_help},
    },
    parser::{
        CommandParser, FieldKey, LeafParserExt, Schema, SchemaError,
        combinators::{Alternative, AnyOrderParser, OptionalParser, OrParser},
        leaves::{
            HeroParser, MapParser, NaturalNumberParser, PersonParser, TowerParser,
            TowerPathParser, TowerUpgradeParser, VersionParser,
        },
    },
};

/// Builds the argument parser of the command.
///
/// The two-towers alternative is declared before the single tower one:
/// alternatives are tried in order and the first match wins.
pub fn two_tc_parser(aliases: Arc<dyn AliasProvider>) -> Result<CommandParser, SchemaError> {
    let schema = Schema::new(&[
        FieldKey::Map,
        FieldKey::FirstTower,
        FieldKey::SecondTower,
        FieldKey::NaturalNumber,
        FieldKey::Person,
        FieldKey::Version,
    ])?;

    let towers = OrParser::new(vec![
        Alternative::Sequence(vec![
            Box::new(tower_or_hero(&aliases, FieldKey::FirstTower)?),
            Box::new(tower_or_hero(&aliases, FieldKey::SecondTower)?),
        ]),
        Alternative::single(tower_or_hero(&aliases, FieldKey::FirstTower)?),
        Alternative::single(NaturalNumberParser),
    ])?;

    let tree = AnyOrderParser::new(vec![
        Box::new(OptionalParser::new(MapParser::new(aliases.clone()))),
        Box::new(OptionalParser::new(towers)),
        Box::new(OptionalParser::new(PersonParser)),
        Box::new(OptionalParser::new(VersionParser)),
    ])?;

    CommandParser::new(schema, Box::new(tree))
}

fn tower_or_hero(aliases: &Arc<dyn AliasProvider>, key: FieldKey) -> Result<OrParser, SchemaError> {
    OrParser::new(vec![
        Alternative::single(TowerParser::new(aliases.clone()).keyed(key)),
        Alternative::single(TowerPathParser::new(aliases.clone()).keyed(key)),
        Alternative::single(TowerUpgradeParser::new(aliases.clone()).keyed(key)),
        Alternative::single(HeroParser::new(aliases.clone()).keyed(key)),
    ])
}

/// Answers a 2tc query.
///
/// # Arguments
///
/// * `parser` - Parser built by [`two_tc_parser`]
/// * `arguments` - Argument tokens following the subcommand
/// * `aliases` - Lookup tables, used to match combo maps
/// * `combo_loader` - Source of the combo list
/// * `prefix` - Command name the bot answers to, used in help pointers
pub async fn handle_two_tc(
    parser: &CommandParser,
    arguments: &[String],
    aliases: &dyn AliasProvider,
    combo_loader: &ComboLoader,
    prefix: &str,
) -> CommandResult {
    debug!("handling 2tc command: {:?}", arguments);

    if arguments.is_empty()
        || matches!(arguments, [argument] if argument.eq_ignore_ascii_case("help"))
    {
        return CommandResult::Reply(format_two_tc_help(prefix));
    }

    let result = parser.parse(arguments);
    if result.has_errors() {
        return CommandResult::Reply(format_parsing_errors(
            &result.parsing_errors,
            &format!("!{prefix} 2tc help"),
        ));
    }

    let query = ComboQuery::from_fields(&result.fields);
    let combos = combo_loader.load().await;

    match filter_combos(combos, &query, aliases) {
        Ok(combos) => CommandResult::Reply(format_combos(&combos, &query)),
        Err(error) => CommandResult::Reply(format_parsing_errors(
            &[error],
            &format!("!{prefix} 2tc help"),
        )),
    }
}

//! Hero level energizer command handler.
//!
//! Every argument is optional and may come in any order:
//!
//! ```text
//! !q hle [hero] [round] [map_difficulty] [round]
//! ```
//!
//! With two rounds, the lower one is the round the hero is placed and the
//! higher one the round the Energizer is bought. Missing arguments are asked
//! for through a hero menu, a round reply, a map difficulty reaction and a
//! second round reply.

use std::sync::Arc;

use log::debug;

use crate::{
    aliases::AliasProvider,
    commands::{
        CommandResult, InteractiveCommand,
        markdown_response::{
            format_hero_level_energizer, format_hero_level_energizer_help, format_parsing_errors,
        },
    },
    parser::{
        CommandParser, FieldKey, Fields, LeafParserExt, Schema, SchemaError, Value,
        combinators::{AnyOrderParser, OptionalParser},
        leaves::{HeroParser, MapDifficultyParser, RoundParser},
    },
    reactor::{EmojiReactor, InvalidInputPolicy, MenuReactor, Reactor, SingleTextParser},
};

/// Builds the argument parser of the command.
pub fn hero_level_energizer_parser(
    aliases: Arc<dyn AliasProvider>,
) -> Result<CommandParser, SchemaError> {
    let schema = Schema::new(&[
        FieldKey::Hero,
        FieldKey::StartingRound,
        FieldKey::MapDifficulty,
        FieldKey::EnergizerRound,
    ])?;

    let tree = AnyOrderParser::new(vec![
        Box::new(OptionalParser::new(HeroParser::new(aliases))),
        Box::new(OptionalParser::new(RoundParser.keyed(FieldKey::StartingRound))),
        Box::new(OptionalParser::new(MapDifficultyParser)),
        Box::new(OptionalParser::new(RoundParser.keyed(FieldKey::EnergizerRound))),
    ])?;

    CommandParser::new(schema, Box::new(tree))
}

/// Parses the arguments and returns the steps collecting the missing ones.
///
/// # Arguments
///
/// * `parser` - Parser built by [`hero_level_energizer_parser`]
/// * `arguments` - Argument tokens following the subcommand
/// * `prefix` - Command name the bot answers to, used in help pointers
/// * `invalid_input` - Policy of the round steps
pub fn handle_hero_level_energizer(
    parser: &CommandParser,
    arguments: &[String],
    prefix: &str,
    invalid_input: InvalidInputPolicy,
) -> CommandResult {
    debug!("handling hero level energizer command: {:?}", arguments);

    if matches!(arguments, [argument] if argument.eq_ignore_ascii_case("help")) {
        return CommandResult::Reply(format_hero_level_energizer_help(prefix));
    }

    let result = parser.parse(arguments);
    if result.has_errors() {
        return CommandResult::Reply(format_parsing_errors(
            &result.parsing_errors,
            &format!("!{prefix} herolevelenergizer help"),
        ));
    }

    let mut fields = result.fields;
    sort_rounds(&mut fields);

    CommandResult::Interactive(InteractiveCommand {
        fields,
        steps: steps(invalid_input),
        render: Box::new(|fields: &Fields| format_hero_level_energizer(fields)),
    })
}

/// Assigns the parsed rounds: a single round is the starting round, two rounds
/// are sorted so that the energizer round is the higher one.
fn sort_rounds(fields: &mut Fields) {
    let mut rounds: Vec<u32> = [FieldKey::StartingRound, FieldKey::EnergizerRound]
        .iter()
        .filter_map(|key| fields.round(*key))
        .collect();
    rounds.sort_unstable();

    fields.unset(FieldKey::StartingRound);
    fields.unset(FieldKey::EnergizerRound);
    match rounds.as_slice() {
        [starting] => fields.set(FieldKey::StartingRound, Value::Round(*starting)),
        [starting, energizer] => {
            fields.set(FieldKey::StartingRound, Value::Round(*starting));
            fields.set(FieldKey::EnergizerRound, Value::Round(*energizer));
        }
        _ => {}
    }
}

fn steps(invalid_input: InvalidInputPolicy) -> Vec<Box<dyn Reactor>> {
    vec![
        Box::new(MenuReactor::heroes()),
        Box::new(
            SingleTextParser::new(
                RoundParser.keyed(FieldKey::StartingRound),
                "Which round do you place the hero?",
            )
            .with_policy(invalid_input),
        ),
        Box::new(EmojiReactor::map_difficulty()),
        Box::new(
            SingleTextParser::new(
                RoundParser.keyed(FieldKey::EnergizerRound),
                "Which round do you buy the Energizer?",
            )
            .with_policy(invalid_input),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aliases::GameAliases, parser::MapDifficulty};

    fn parser() -> CommandParser {
        hero_level_energizer_parser(Arc::new(GameAliases::new())).unwrap()
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn handle(arguments: &[&str]) -> CommandResult {
        handle_hero_level_energizer(
            &parser(),
            &tokens(arguments),
            "q",
            InvalidInputPolicy::RePrompt,
        )
    }

    fn interactive(arguments: &[&str]) -> InteractiveCommand {
        match handle(arguments) {
            CommandResult::Interactive(command) => command,
            CommandResult::Reply(reply) => panic!("expected an interactive command, got {reply}"),
        }
    }

    #[test]
    fn test_help_argument() {
        let result = handle(&["help"]);
        assert!(matches!(result, CommandResult::Reply(reply) if reply.starts_with("Usage:")));
    }

    #[test]
    fn test_all_arguments_supplied() {
        let command = interactive(&["expert", "r40", "gwen", "r80"]);
        assert!(command.pending_fields().is_empty());
        assert_eq!(command.fields.hero(FieldKey::Hero), Some("gwen"));
        assert_eq!(command.fields.round(FieldKey::StartingRound), Some(40));
        assert_eq!(command.fields.round(FieldKey::EnergizerRound), Some(80));
        assert_eq!(
            command.fields.map_difficulty(FieldKey::MapDifficulty),
            Some(MapDifficulty::Expert)
        );
    }

    #[test]
    fn test_rounds_are_sorted() {
        let command = interactive(&["r40", "r5"]);
        assert_eq!(command.fields.round(FieldKey::StartingRound), Some(5));
        assert_eq!(command.fields.round(FieldKey::EnergizerRound), Some(40));
        assert_eq!(
            command.pending_fields(),
            vec![FieldKey::Hero, FieldKey::MapDifficulty]
        );
    }

    #[test]
    fn test_single_round_is_starting_round() {
        let command = interactive(&["expert", "r12"]);
        assert_eq!(command.fields.round(FieldKey::StartingRound), Some(12));
        assert!(!command.fields.is_resolved(FieldKey::EnergizerRound));
        assert_eq!(
            command.pending_fields(),
            vec![FieldKey::Hero, FieldKey::EnergizerRound]
        );
    }

    #[test]
    fn test_no_arguments_asks_for_everything() {
        let command = interactive(&[]);
        assert_eq!(
            command.pending_fields(),
            vec![
                FieldKey::Hero,
                FieldKey::StartingRound,
                FieldKey::MapDifficulty,
                FieldKey::EnergizerRound
            ]
        );
    }

    #[test]
    fn test_invalid_arguments() {
        let result = handle(&["gwen", "forty"]);
        match result {
            CommandResult::Reply(reply) => {
                assert!(reply.contains("Likely cause(s)"));
                assert!(reply.contains("unexpected input `forty`"));
                assert!(reply.contains("`!q herolevelenergizer help`"));
            }
            CommandResult::Interactive(_) => panic!("expected an error reply"),
        }
    }

    #[test]
    fn test_render() {
        let command = interactive(&["gwen", "r5", "beginner", "r20"]);
        let reply = (command.render)(&command.fields);
        assert!(reply.contains("Gwendolin"));
        assert!(reply.contains("Placed: **R5**"));
        assert!(reply.contains("Energizer: **R20**"));
    }
}

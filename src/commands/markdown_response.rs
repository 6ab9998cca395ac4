//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Markdown format
//! for display in Matrix chat rooms.

use crate::{
    aliases::HEROES,
    combos::{Combo, ComboQuery, ComboTower},
    parser::{FieldKey, Fields, Value},
    reactor::AbortReason,
    utils::title_case,
};

/// Formats the help message showing available bot commands.
///
/// # Arguments
///
/// * `prefix` - Command name the bot answers to
///
/// # Examples
///
/// ```ignore
/// let help = format_help("q");
/// assert!(help.contains("Commands:"));
/// ```
pub fn format_help(prefix: &str) -> String {
    format!(
        "Commands:\n\
        - `!{prefix} herolevelenergizer [hero] [round] [map_difficulty] [round]`: hero leveling with the Energizer (aliases: `hle`, `energizer`, ...)\n\
        - `!{prefix} 2tc [map] [tower [tower] | combo_number] [u#person] [version]`: two-tower CHIMPS combos\n\
        - `!{prefix} help`: show this help message\n\n\
        Arguments can be given in any order. Missing ones are asked for: answer with a reaction or a reply, or reply `cancel`.\n\
        > *quincy* is a free open source game reference bot."
    )
}

/// Formats a response for an unknown command.
///
/// # Examples
///
/// ```ignore
/// let msg = format_unknown_command("q");
/// assert!(msg.contains("Unknown command"));
/// ```
pub fn format_unknown_command(prefix: &str) -> String {
    format!("Unknown command. Type `!{prefix} help` for more information.")
}

/// Formats the argument errors of a command.
///
/// # Arguments
///
/// * `errors` - Parsing errors, one bullet each
/// * `help_command` - Full command displaying the relevant help
pub fn format_parsing_errors(errors: &[String], help_command: &str) -> String {
    let causes = errors
        .iter()
        .map(|error| format!("- {error}"))
        .collect::<Vec<String>>()
        .join("\n");

    format!("**Error**\n\nLikely cause(s):\n{causes}\n\nType `{help_command}` for help.")
}

/// Formats the usage of the hero level energizer command.
pub fn format_hero_level_energizer_help(prefix: &str) -> String {
    format!(
        "Usage: `!{prefix} herolevelenergizer [hero] [round] [map_difficulty] [round]`\n\n\
        - **hero**: e.g. `gwen`, `obyn`\n\
        - **round**: `r<number>`, e.g. `r40`. With two rounds, the lower one is where the hero is placed and the higher one where the Energizer is bought\n\
        - **map_difficulty**: `beginner`, `intermediate`, `advanced` or `expert`\n\n\
        Type `!{prefix} herolevelenergizer` and follow the instructions."
    )
}

/// Formats the summary of a complete hero level energizer query.
pub fn format_hero_level_energizer(fields: &Fields) -> String {
    let hero = fields
        .hero(FieldKey::Hero)
        .map(hero_name)
        .unwrap_or_else(|| "Hero".to_string());
    let round = |key| {
        fields
            .round(key)
            .map(|round| format!("R{round}"))
            .unwrap_or_else(|| "?".to_string())
    };
    let maps = fields
        .map_difficulty(FieldKey::MapDifficulty)
        .map(|difficulty| title_case(difficulty.name()))
        .unwrap_or_else(|| "?".to_string());

    format!(
        "**{hero} Leveling query**\n\n\
        - Placed: **{}**\n\
        - Maps: **{maps}**\n\
        - Energizer: **{}**",
        round(FieldKey::StartingRound),
        round(FieldKey::EnergizerRound),
    )
}

/// Formats the usage of the 2tc command.
pub fn format_two_tc_help(prefix: &str) -> String {
    format!(
        "Usage: `!{prefix} 2tc [map] [tower [tower] | combo_number] [u#person] [version]`\n\n\
        - **map**: e.g. `logs`, `dark_castle`\n\
        - **tower**: a tower (`dart`), a tower path (`dart#top`), an upgrade (`dart#025`, `sun_avatar`) or a hero (`gwen`)\n\
        - **combo_number**: e.g. `12`\n\
        - **person**: `u#<name>`\n\
        - **version**: e.g. `v22` or `22.1`\n\n\
        Only original completions are listed unless a person or a map is given."
    )
}

/// Formats the combos matching a 2tc query.
pub fn format_combos(combos: &[Combo], query: &ComboQuery) -> String {
    if combos.is_empty() {
        return "No combos".to_owned();
    }

    let combos_md = combos
        .iter()
        .flat_map(|combo| {
            combo.maps.iter().map(move |(map, completion)| {
                let og = if completion.og { " (OG)" } else { "" };
                format!(
                    "- **#{}** {} + {} (v{}) on {map} by [{}]({}){og}",
                    combo.number,
                    format_combo_tower(&combo.towers[0]),
                    format_combo_tower(&combo.towers[1]),
                    combo.version,
                    completion.person,
                    completion.link,
                )
            })
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!("**{}**\n\n{}", format_combos_title(query), combos_md)
}

/// Formats the notification sent when an interactive command stops early.
pub fn format_chain_aborted(reason: &AbortReason) -> String {
    match reason {
        AbortReason::Timeout(field) => format!(
            "No {} received in time, command aborted.",
            field.name().replace('_', " ")
        ),
        AbortReason::InvalidInput { field, reason } => format!(
            "Invalid {}: {reason}. Command aborted.",
            field.name().replace('_', " ")
        ),
        AbortReason::Cancelled => "Command cancelled.".to_owned(),
        AbortReason::Transport(_) => "Command aborted: the chat server could not be reached.".to_owned(),
    }
}

fn format_combos_title(query: &ComboQuery) -> String {
    let mut title = match query.number {
        Some(number) => format!("2TC #{number}"),
        None => "All 2TCs".to_owned(),
    };
    for tower in &query.towers {
        title.push_str(&format!(" with {}", describe_tower(tower)));
    }
    if let Some(person) = &query.person {
        title.push_str(&format!(" by {person}"));
    }
    if let Some(map) = &query.map {
        title.push_str(&format!(" on {}", title_case(map)));
    }
    if let Some(version) = &query.version {
        title.push_str(&format!(" in v{version}"));
    }
    title
}

fn describe_tower(tower: &Value) -> String {
    match tower {
        Value::Hero(hero) => hero_name(hero),
        Value::Tower(id) => title_case(id),
        Value::TowerPath(id, path) => format!("{} path {}", path, title_case(id)),
        Value::TowerUpgrade(id, crosspath) => format!("{} ({crosspath})", title_case(id)),
        other => other.to_string(),
    }
}

fn format_combo_tower(tower: &ComboTower) -> String {
    match &tower.upgrade {
        Some(upgrade) => format!("{} ({upgrade})", tower.name),
        None => tower.name.clone(),
    }
}

/// Display name of a hero id, e.g. `Gwendolin` for `gwen`.
fn hero_name(hero: &str) -> String {
    HEROES
        .iter()
        .find(|(id, ..)| *id == hero)
        .map(|(_, name, ..)| name.to_string())
        .unwrap_or_else(|| title_case(hero))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        combos::Completion,
        parser::{Crosspath, MapDifficulty, Path},
    };

    fn combo() -> Combo {
        Combo {
            number: 4,
            towers: [
                ComboTower {
                    name: "Gwendolin".to_string(),
                    id: "gwen".to_string(),
                    upgrade: None,
                },
                ComboTower {
                    name: "Sun Avatar".to_string(),
                    id: "super_monkey".to_string(),
                    upgrade: Some("3-0-0".to_string()),
                },
            ],
            version: "22.1".to_string(),
            date: String::new(),
            current: true,
            maps: BTreeMap::from([(
                "Logs".to_string(),
                Completion {
                    person: "Someone".to_string(),
                    link: "https://example.com/4".to_string(),
                    og: true,
                },
            )]),
        }
    }

    #[test]
    fn test_format_help() {
        let help = format_help("q");
        assert!(help.contains("Commands:"));
        assert!(help.contains("`!q 2tc"));
        assert!(help.contains("`!q help`"));
    }

    #[test]
    fn test_format_unknown_command() {
        assert_eq!(
            format_unknown_command("q"),
            "Unknown command. Type `!q help` for more information."
        );
    }

    #[test]
    fn test_format_parsing_errors() {
        let message = format_parsing_errors(
            &["`forty` is not a round".to_string(), "unexpected input `x`".to_string()],
            "!q hle help",
        );
        assert_eq!(
            message,
            "**Error**\n\nLikely cause(s):\n- `forty` is not a round\n- unexpected input `x`\n\nType `!q hle help` for help."
        );
    }

    #[test]
    fn test_format_hero_level_energizer() {
        let mut fields = Fields::new();
        fields.set(FieldKey::Hero, Value::Hero("gwen".to_string()));
        fields.set(FieldKey::StartingRound, Value::Round(5));
        fields.set(FieldKey::MapDifficulty, Value::MapDifficulty(MapDifficulty::Expert));
        fields.set(FieldKey::EnergizerRound, Value::Round(40));

        assert_eq!(
            format_hero_level_energizer(&fields),
            "**Gwendolin Leveling query**\n\n- Placed: **R5**\n- Maps: **Expert**\n- Energizer: **R40**"
        );
    }

    #[test]
    fn test_format_combos_empty() {
        assert_eq!(format_combos(&[], &ComboQuery::default()), "No combos");
    }

    #[test]
    fn test_format_combos() {
        let query = ComboQuery {
            towers: vec![
                Value::Hero("gwen".to_string()),
                Value::TowerPath("super_monkey".to_string(), Path::Top),
            ],
            ..ComboQuery::default()
        };
        let message = format_combos(&[combo()], &query);
        assert!(message.starts_with("**All 2TCs with Gwendolin with top path Super Monkey**"));
        assert!(message.contains(
            "- **#4** Gwendolin + Sun Avatar (3-0-0) (v22.1) on Logs by [Someone](https://example.com/4) (OG)"
        ));
    }

    #[test]
    fn test_format_combos_title_with_filters() {
        let query = ComboQuery {
            number: Some(4),
            towers: vec![Value::TowerUpgrade(
                "dart_monkey".to_string(),
                Crosspath([0, 2, 5]),
            )],
            person: Some("someone".to_string()),
            map: Some("dark_castle".to_string()),
            version: None,
        };
        assert_eq!(
            format_combos_title(&query),
            "2TC #4 with Dart Monkey (0-2-5) by someone on Dark Castle"
        );
    }

    #[test]
    fn test_format_chain_aborted() {
        assert_eq!(
            format_chain_aborted(&AbortReason::Timeout(FieldKey::MapDifficulty)),
            "No map difficulty received in time, command aborted."
        );
        assert_eq!(format_chain_aborted(&AbortReason::Cancelled), "Command cancelled.");
        assert!(
            format_chain_aborted(&AbortReason::InvalidInput {
                field: FieldKey::StartingRound,
                reason: "`r0` is out of range".to_string(),
            })
            .starts_with("Invalid starting round: ")
        );
    }
}

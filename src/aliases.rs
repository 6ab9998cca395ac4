//! Game alias tables.
//!
//! Leaf parsers never reach for global state: the lookup tables they need are
//! handed to them as an [`AliasProvider`]. [`GameAliases`] is the built-in
//! read-only implementation.

use std::collections::HashMap;

use crate::parser::Crosspath;

/// Read-only lookup capability mapping user aliases to canonical ids.
///
/// Lookups are case-insensitive; implementations receive the raw token.
pub trait AliasProvider: Send + Sync {
    /// Canonical hero id for `alias`.
    fn hero(&self, alias: &str) -> Option<String>;
    /// Canonical tower id for `alias`.
    fn tower(&self, alias: &str) -> Option<String>;
    /// Tower and crosspath for a named upgrade such as `sun_avatar`.
    fn named_upgrade(&self, alias: &str) -> Option<(String, Crosspath)>;
    /// Canonical map id for `alias`.
    fn map(&self, alias: &str) -> Option<String>;
}

/// Heroes with their display name, menu description and aliases.
pub const HEROES: &[(&str, &str, &str, &[&str])] = &[
    ("quincy", "Quincy", "me", &["q", "quincey"]),
    ("gwen", "Gwendolin", "Pyromaniac", &["gwendolin", "gwendolyn", "gwendo"]),
    ("jones", "Strike Jones", "Artillery Commander", &["strike", "striker", "strike_jones"]),
    ("obyn", "Obyn", "Forest Guardian", &["obyn_greenfoot", "greenfoot"]),
    ("churchill", "Captain Churchill", "Tank", &["captain_churchill", "church", "tank"]),
    ("benjamin", "Benjamin", "Code Monkey", &["ben", "benji", "benjammin"]),
    ("ezili", "Ezili", "Voodoo Monkey", &["ez", "voodoo"]),
    ("pat", "Pat Fusty", "Giant Monkey", &["pat_fusty", "fusty", "patfusty"]),
    ("adora", "Adora", "High priestess", &["ado", "priestess"]),
    ("brickell", "Admiral Brickell", "Naval Commander", &["admiral_brickell", "admiral", "brick"]),
    ("etienne", "Etienne", "Drone Operator", &["eti", "drone"]),
    ("sauda", "Sauda", "Swordmaster", &["sword", "swordmaster"]),
    ("psi", "Psi", "Psionic Monkey", &["psionic"]),
];

const TOWERS: &[(&str, &[&str])] = &[
    ("dart_monkey", &["dart", "dart_monkey", "dartmonkey"]),
    ("boomerang_monkey", &["boomerang", "boomer", "rang", "boomerang_monkey"]),
    ("bomb_shooter", &["bomb", "cannon", "bomb_shooter"]),
    ("tack_shooter", &["tack", "tack_shooter"]),
    ("ice_monkey", &["ice", "ice_monkey"]),
    ("glue_gunner", &["glue", "glue_gunner"]),
    ("sniper_monkey", &["sniper", "sniper_monkey"]),
    ("monkey_sub", &["sub", "submarine", "monkey_sub"]),
    ("monkey_buccaneer", &["boat", "bucc", "buccaneer", "monkey_buccaneer"]),
    ("monkey_ace", &["ace", "plane", "monkey_ace"]),
    ("heli_pilot", &["heli", "helicopter", "heli_pilot"]),
    ("mortar_monkey", &["mortar", "mortar_monkey"]),
    ("dartling_gunner", &["dartling", "dartling_gunner"]),
    ("wizard_monkey", &["wizard", "wiz", "wizard_monkey"]),
    ("super_monkey", &["super", "super_monkey"]),
    ("ninja_monkey", &["ninja", "ninja_monkey"]),
    ("alchemist", &["alch", "alchemist"]),
    ("druid", &["druid", "druid_monkey"]),
    ("banana_farm", &["farm", "banana_farm"]),
    ("spike_factory", &["spike", "spac", "spike_factory"]),
    ("monkey_village", &["village", "vill", "monkey_village"]),
    ("engineer_monkey", &["engineer", "engi", "engineer_monkey"]),
];

const NAMED_UPGRADES: &[(&str, &str, [u8; 3])] = &[
    ("spike_o_pult", "dart_monkey", [3, 0, 0]),
    ("juggernaut", "dart_monkey", [4, 0, 0]),
    ("ultra_juggernaut", "dart_monkey", [5, 0, 0]),
    ("triple_shot", "dart_monkey", [0, 3, 0]),
    ("super_monkey_fan_club", "dart_monkey", [0, 4, 0]),
    ("plasma_monkey_fan_club", "dart_monkey", [0, 5, 0]),
    ("crossbow", "dart_monkey", [0, 0, 3]),
    ("sharp_shooter", "dart_monkey", [0, 0, 4]),
    ("crossbow_master", "dart_monkey", [0, 0, 5]),
    ("sun_avatar", "super_monkey", [3, 0, 0]),
    ("sun_temple", "super_monkey", [4, 0, 0]),
    ("true_sun_god", "super_monkey", [5, 0, 0]),
    ("robo_monkey", "super_monkey", [0, 3, 0]),
    ("tech_terror", "super_monkey", [0, 4, 0]),
    ("anti_bloon", "super_monkey", [0, 5, 0]),
    ("dark_knight", "super_monkey", [0, 0, 3]),
    ("dark_champion", "super_monkey", [0, 0, 4]),
    ("legend_of_the_night", "super_monkey", [0, 0, 5]),
    ("grandmaster_ninja", "ninja_monkey", [5, 0, 0]),
    ("grand_saboteur", "ninja_monkey", [0, 5, 0]),
    ("master_bomber", "ninja_monkey", [0, 0, 5]),
    ("permanent_brew", "alchemist", [5, 0, 0]),
    ("total_transformation", "alchemist", [0, 5, 0]),
    ("bloon_master_alchemist", "alchemist", [0, 0, 5]),
    ("archmage", "wizard_monkey", [5, 0, 0]),
    ("wizard_lord_phoenix", "wizard_monkey", [0, 5, 0]),
    ("prince_of_darkness", "wizard_monkey", [0, 0, 5]),
];

const MAPS: &[(&str, &[&str])] = &[
    ("monkey_meadow", &["meadow", "monkey_meadow", "mm"]),
    ("tree_stump", &["stump", "tree_stump"]),
    ("town_center", &["town", "town_center", "town_centre"]),
    ("logs", &["logs"]),
    ("cubism", &["cubism"]),
    ("four_circles", &["four_circles", "4c", "circles"]),
    ("hedge", &["hedge"]),
    ("end_of_the_road", &["end_of_the_road", "eotr"]),
    ("in_the_loop", &["in_the_loop", "itl", "loop"]),
    ("skates", &["skates"]),
    ("lotus_island", &["lotus_island", "lotus"]),
    ("candy_falls", &["candy_falls", "candy"]),
    ("winter_park", &["winter_park", "winter"]),
    ("carved", &["carved"]),
    ("park_path", &["park_path", "park"]),
    ("alpine_run", &["alpine_run", "alpine"]),
    ("frozen_over", &["frozen_over", "frozen"]),
    ("spa_pits", &["spa_pits", "spa"]),
    ("dark_castle", &["dark_castle", "dc"]),
    ("infernal", &["infernal"]),
];

/// Built-in alias tables.
pub struct GameAliases {
    heroes: HashMap<String, String>,
    towers: HashMap<String, String>,
    named_upgrades: HashMap<String, (String, Crosspath)>,
    maps: HashMap<String, String>,
}

impl GameAliases {
    pub fn new() -> Self {
        let mut heroes = HashMap::new();
        for (id, _, _, aliases) in HEROES {
            heroes.insert(id.to_string(), id.to_string());
            for alias in *aliases {
                heroes.insert(alias.to_string(), id.to_string());
            }
        }

        GameAliases {
            heroes,
            towers: index(TOWERS),
            named_upgrades: NAMED_UPGRADES
                .iter()
                .map(|(name, tower, tiers)| {
                    (name.to_string(), (tower.to_string(), Crosspath(*tiers)))
                })
                .collect(),
            maps: index(MAPS),
        }
    }
}

impl Default for GameAliases {
    fn default() -> Self {
        GameAliases::new()
    }
}

fn index(table: &[(&str, &[&str])]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (id, aliases) in table {
        map.insert(id.to_string(), id.to_string());
        for alias in *aliases {
            map.insert(alias.to_string(), id.to_string());
        }
    }
    map
}

/// Lower-cases and joins word separators so `Monkey-Meadow` finds `monkey_meadow`.
fn normalize(alias: &str) -> String {
    alias.to_lowercase().replace(&['-', ' '][..], "_")
}

impl AliasProvider for GameAliases {
    fn hero(&self, alias: &str) -> Option<String> {
        self.heroes.get(&normalize(alias)).cloned()
    }

    fn tower(&self, alias: &str) -> Option<String> {
        self.towers.get(&normalize(alias)).cloned()
    }

    fn named_upgrade(&self, alias: &str) -> Option<(String, Crosspath)> {
        self.named_upgrades.get(&normalize(alias)).cloned()
    }

    fn map(&self, alias: &str) -> Option<String> {
        self.maps.get(&normalize(alias)).cloned()
    }
}

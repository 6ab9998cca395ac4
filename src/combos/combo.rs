use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parser::Crosspath;

/// One tower (or hero) of a combo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTower {
    /// Display name, e.g. `Sun Avatar`
    pub name: String,
    /// Canonical tower or hero id, e.g. `super_monkey`
    pub id: String,
    /// Crosspath as written in the spreadsheet, e.g. `3-0-0`; heroes have none
    #[serde(default)]
    pub upgrade: Option<String>,
}

impl ComboTower {
    pub fn is_hero(&self) -> bool {
        self.upgrade.is_none()
    }

    /// Parsed crosspath, if the spreadsheet one is valid.
    pub fn crosspath(&self) -> Option<Crosspath> {
        self.upgrade
            .as_deref()
            .and_then(|upgrade| Crosspath::parse(upgrade).ok())
    }
}

/// A completion of a combo on one map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub person: String,
    pub link: String,
    /// Whether this is the original completion of the combo
    #[serde(default)]
    pub og: bool,
}

/// A 2TC combo with its completions keyed by map display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub number: u64,
    pub towers: [ComboTower; 2],
    pub version: String,
    #[serde(default)]
    pub date: String,
    /// Still possible in the current game version
    #[serde(default)]
    pub current: bool,
    pub maps: BTreeMap<String, Completion>,
}

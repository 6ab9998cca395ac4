//! Grammar-specific token recognizers.
//!
//! Every leaf examines exactly one token and reports a human-readable reason
//! when it does not recognize it. Leaves that need lookup tables receive an
//! [`AliasProvider`](crate::aliases::AliasProvider) at construction.

mod hero;
mod map;
mod map_difficulty;
mod natural_number;
mod person;
mod round;
mod tower;
mod version;

pub use crate::parser::leaves::{
    hero::HeroParser,
    map::MapParser,
    map_difficulty::MapDifficultyParser,
    natural_number::NaturalNumberParser,
    person::PersonParser,
    round::RoundParser,
    tower::{TowerParser, TowerPathParser, TowerUpgradeParser},
    version::VersionParser,
};

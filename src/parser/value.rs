//! Typed values produced by leaf parsers and reactors.

use std::fmt;

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Canonical hero id, e.g. `gwen`
    Hero(String),
    Round(u32),
    MapDifficulty(MapDifficulty),
    NaturalNumber(u64),
    Version(Version),
    /// Lower-cased person name
    Person(String),
    /// Canonical tower id, e.g. `dart_monkey`
    Tower(String),
    TowerPath(String, Path),
    TowerUpgrade(String, Crosspath),
    /// Canonical map id, e.g. `monkey_meadow`
    Map(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Hero(hero) => write!(f, "{hero}"),
            Value::Round(round) => write!(f, "R{round}"),
            Value::MapDifficulty(difficulty) => write!(f, "{difficulty}"),
            Value::NaturalNumber(number) => write!(f, "{number}"),
            Value::Version(version) => write!(f, "v{version}"),
            Value::Person(person) => write!(f, "{person}"),
            Value::Tower(tower) => write!(f, "{tower}"),
            Value::TowerPath(tower, path) => write!(f, "{path} path {tower}"),
            Value::TowerUpgrade(tower, crosspath) => write!(f, "{crosspath} {tower}"),
            Value::Map(map) => write!(f, "{map}"),
        }
    }
}

/// Map difficulty, which scales hero leveling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapDifficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl MapDifficulty {
    pub const ALL: [MapDifficulty; 4] = [
        MapDifficulty::Beginner,
        MapDifficulty::Intermediate,
        MapDifficulty::Advanced,
        MapDifficulty::Expert,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MapDifficulty::Beginner => "beginner",
            MapDifficulty::Intermediate => "intermediate",
            MapDifficulty::Advanced => "advanced",
            MapDifficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for MapDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dotted numeric game version, e.g. `22.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub parts: Vec<u32>,
}

impl Version {
    /// Whether `other` (a combo's full version string) falls under this version.
    ///
    /// A version with a minor part must match exactly; a bare major version
    /// matches every release of that major.
    pub fn covers(&self, other: &str) -> bool {
        let rendered = self.to_string();
        if self.parts.len() > 1 {
            return rendered == other;
        }
        rendered == other || other.starts_with(&format!("{rendered}."))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Upgrade path of a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Path {
    Top,
    Middle,
    Bottom,
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Top => f.write_str("top"),
            Path::Middle => f.write_str("middle"),
            Path::Bottom => f.write_str("bottom"),
        }
    }
}

/// Upgrade tiers of the three paths of a tower, e.g. `0-2-5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crosspath(pub [u8; 3]);

impl Crosspath {
    /// Parses `xyz` or `x-y-z`, enforcing the game's crosspath rules.
    pub fn parse(text: &str) -> Result<Self, String> {
        let digits: Vec<char> = text.chars().filter(|c| *c != '-').collect();
        if digits.len() != 3 || !digits.iter().all(|c| c.is_ascii_digit()) {
            return Err(format!("`{text}` is not an upgrade crosspath (expected e.g. 025)"));
        }

        let mut tiers = [0u8; 3];
        for (tier, digit) in tiers.iter_mut().zip(digits) {
            *tier = digit as u8 - b'0';
        }

        if tiers.iter().any(|tier| *tier > 5) {
            return Err(format!("`{text}`: upgrade tiers go from 0 to 5"));
        }
        if tiers.iter().filter(|tier| **tier > 0).count() > 2 {
            return Err(format!("`{text}`: at most two paths can be upgraded"));
        }
        if tiers.iter().filter(|tier| **tier > 2).count() > 1 {
            return Err(format!("`{text}`: only one path can go above tier 2"));
        }
        if tiers.iter().all(|tier| *tier == 0) {
            return Err(format!("`{text}` is an unupgraded tower, not an upgrade"));
        }

        Ok(Crosspath(tiers))
    }

    /// The most upgraded path, first one on ties.
    pub fn dominant_path(&self) -> Path {
        let [top, middle, bottom] = self.0;
        if top >= middle && top >= bottom {
            Path::Top
        } else if middle >= bottom {
            Path::Middle
        } else {
            Path::Bottom
        }
    }
}

impl fmt::Display for Crosspath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [top, middle, bottom] = self.0;
        write!(f, "{top}-{middle}-{bottom}")
    }
}

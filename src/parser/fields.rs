//! Field keys and the field map shared by parse results and reaction chains.

use std::{collections::BTreeMap, fmt};

use crate::parser::value::{MapDifficulty, Value};

/// Stable identifier naming one argument slot in a command's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Hero,
    Round,
    StartingRound,
    EnergizerRound,
    MapDifficulty,
    Map,
    Person,
    Version,
    NaturalNumber,
    FirstTower,
    SecondTower,
}

impl FieldKey {
    /// Snake case name used in logs and user-facing messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::Hero => "hero",
            FieldKey::Round => "round",
            FieldKey::StartingRound => "starting_round",
            FieldKey::EnergizerRound => "energizer_round",
            FieldKey::MapDifficulty => "map_difficulty",
            FieldKey::Map => "map",
            FieldKey::Person => "person",
            FieldKey::Version => "version",
            FieldKey::NaturalNumber => "natural_number",
            FieldKey::FirstTower => "first_tower",
            FieldKey::SecondTower => "second_tower",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-keyed values.
///
/// A key can be *declared* without being *resolved*: optional parsers that did
/// not match still declare their key with a `None` value, so consumers can
/// tell "not supplied" apart from "not part of this grammar".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: BTreeMap<FieldKey, Option<Value>>,
}

impl Fields {
    /// Creates an empty map, with no declared key.
    pub fn new() -> Self {
        Fields::default()
    }

    /// Builds a map holding a single resolved value.
    pub fn single(key: FieldKey, value: Value) -> Self {
        let mut fields = Fields::new();
        fields.set(key, value);
        fields
    }

    /// Builds a map where every key is declared but unresolved.
    pub fn declared(keys: &[FieldKey]) -> Self {
        let mut fields = Fields::new();
        for key in keys {
            fields.declare(*key);
        }
        fields
    }

    /// Returns the resolved value for `key`, if any.
    pub fn get(&self, key: FieldKey) -> Option<&Value> {
        self.values.get(&key).and_then(Option::as_ref)
    }

    /// Whether `key` is declared, resolved or not.
    pub fn contains_key(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Whether `key` holds a value. Declared but absent keys are unresolved.
    pub fn is_resolved(&self, key: FieldKey) -> bool {
        self.get(key).is_some()
    }

    /// Declares `key` without overwriting an existing value.
    pub fn declare(&mut self, key: FieldKey) {
        self.values.entry(key).or_insert(None);
    }

    /// Stores `value` under `key`, declaring the key if needed and replacing
    /// any previous value.
    pub fn set(&mut self, key: FieldKey, value: Value) {
        self.values.insert(key, Some(value));
    }

    /// Clears the value of `key`, keeping it declared.
    pub fn unset(&mut self, key: FieldKey) -> Option<Value> {
        self.values.get_mut(&key).and_then(Option::take)
    }

    /// Merges `other` into `self`. Resolved values win over declarations.
    pub fn merge(&mut self, other: Fields) {
        for (key, value) in other.values {
            match value {
                Some(value) => self.set(key, value),
                None => self.declare(key),
            }
        }
    }

    /// Iterates over declared keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.values.keys().copied()
    }

    /// Round stored under `key`.
    ///
    /// The typed getters below return `None` both when the key is unresolved
    /// and when it holds a value of another kind.
    pub fn round(&self, key: FieldKey) -> Option<u32> {
        match self.get(key) {
            Some(Value::Round(round)) => Some(*round),
            _ => None,
        }
    }

    /// Canonical hero id stored under `key`, e.g. `gwen`.
    pub fn hero(&self, key: FieldKey) -> Option<&str> {
        match self.get(key) {
            Some(Value::Hero(hero)) => Some(hero),
            _ => None,
        }
    }

    /// Map difficulty stored under `key`.
    pub fn map_difficulty(&self, key: FieldKey) -> Option<MapDifficulty> {
        match self.get(key) {
            Some(Value::MapDifficulty(difficulty)) => Some(*difficulty),
            _ => None,
        }
    }

    /// Natural number stored under `key`, e.g. a combo number.
    pub fn natural_number(&self, key: FieldKey) -> Option<u64> {
        match self.get(key) {
            Some(Value::NaturalNumber(number)) => Some(*number),
            _ => None,
        }
    }
}

//! Narrowing the combo list down to a `2tc` query.

use crate::{
    aliases::AliasProvider,
    combos::{Combo, ComboTower, Completion},
    parser::{FieldKey, Fields, Value, Version},
};

/// The criteria of a `2tc` query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboQuery {
    /// 1-based combo number
    pub number: Option<u64>,
    /// Towers, tower paths, tower upgrades or heroes, at most two
    pub towers: Vec<Value>,
    pub version: Option<Version>,
    /// Lower-cased person name
    pub person: Option<String>,
    /// Canonical map id
    pub map: Option<String>,
}

impl ComboQuery {
    pub fn from_fields(fields: &Fields) -> Self {
        let towers = [FieldKey::FirstTower, FieldKey::SecondTower]
            .iter()
            .filter_map(|key| fields.get(*key).cloned())
            .collect();

        ComboQuery {
            number: fields.natural_number(FieldKey::NaturalNumber),
            towers,
            version: match fields.get(FieldKey::Version) {
                Some(Value::Version(version)) => Some(version.clone()),
                _ => None,
            },
            person: match fields.get(FieldKey::Person) {
                Some(Value::Person(person)) => Some(person.clone()),
                _ => None,
            },
            map: match fields.get(FieldKey::Map) {
                Some(Value::Map(map)) => Some(map.clone()),
                _ => None,
            },
        }
    }
}

/// Applies `query` to `combos`.
///
/// Filters run in this order: combo number, towers, version, person, map.
/// Completions not matching the person or map filters are removed, and combos
/// left without completions are dropped. Unless a person or a map was asked
/// for, only original completions are kept.
///
/// # Errors
///
/// Returns a user-facing message when the query names more than one hero.
pub fn filter_combos(
    combos: Vec<Combo>,
    query: &ComboQuery,
    aliases: &dyn AliasProvider,
) -> Result<Vec<Combo>, String> {
    let heroes: Vec<&str> = query
        .towers
        .iter()
        .filter_map(|tower| match tower {
            Value::Hero(hero) => Some(hero.as_str()),
            _ => None,
        })
        .collect();
    if heroes.len() > 1 {
        return Err(format!(
            "combo cannot have more than 1 hero ({})",
            heroes.join(" + ")
        ));
    }

    let mut combos = match query.number {
        Some(number) => combos
            .into_iter()
            .nth((number as usize).saturating_sub(1))
            .into_iter()
            .collect(),
        None => combos,
    };

    match query.towers.as_slice() {
        [] => {}
        [tower] => combos.retain(|combo| tower_slot(combo, tower).is_some()),
        [first, second, ..] => combos.retain(|combo| {
            let first = matching_slots(combo, first);
            let second = matching_slots(combo, second);
            (first[0] && second[1]) || (first[1] && second[0])
        }),
    }

    if let Some(version) = &query.version {
        combos.retain(|combo| version.covers(&combo.version));
    }

    if let Some(person) = &query.person {
        retain_completions(&mut combos, |_, completion| {
            completion.person.to_lowercase() == *person
        });
    }

    if let Some(map) = &query.map {
        retain_completions(&mut combos, |name, _| {
            aliases.map(name).as_deref() == Some(map.as_str())
        });
    }

    if query.person.is_none() && query.map.is_none() {
        retain_completions(&mut combos, |_, completion| completion.og);
    }

    Ok(combos)
}

fn retain_completions<F>(combos: &mut Vec<Combo>, keep: F)
where
    F: Fn(&str, &Completion) -> bool,
{
    for combo in combos.iter_mut() {
        combo.maps.retain(|name, completion| keep(name, completion));
    }
    combos.retain(|combo| !combo.maps.is_empty());
}

/// Index of the first combo tower matching `query`.
fn tower_slot(combo: &Combo, query: &Value) -> Option<usize> {
    matching_slots(combo, query).iter().position(|matched| *matched)
}

fn matching_slots(combo: &Combo, query: &Value) -> [bool; 2] {
    [
        tower_matches(&combo.towers[0], query),
        tower_matches(&combo.towers[1], query),
    ]
}

fn tower_matches(tower: &ComboTower, query: &Value) -> bool {
    match query {
        Value::Hero(hero) => tower.is_hero() && tower.id == *hero,
        Value::Tower(id) => !tower.is_hero() && tower.id == *id,
        Value::TowerUpgrade(id, crosspath) => {
            tower.id == *id && tower.crosspath() == Some(*crosspath)
        }
        Value::TowerPath(id, path) => {
            tower.id == *id
                && tower
                    .crosspath()
                    .is_some_and(|crosspath| crosspath.dominant_path() == *path)
        }
        _ => false,
    }
}

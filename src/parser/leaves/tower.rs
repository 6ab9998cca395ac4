use std::sync::Arc;

use crate::{
    aliases::AliasProvider,
    parser::{Crosspath, FieldKey, LeafParser, Path, Value},
};

/// Recognizes a base tower alias, e.g. `dart`.
pub struct TowerParser {
    aliases: Arc<dyn AliasProvider>,
}

impl TowerParser {
    pub fn new(aliases: Arc<dyn AliasProvider>) -> Self {
        TowerParser { aliases }
    }
}

impl LeafParser for TowerParser {
    fn key(&self) -> FieldKey {
        FieldKey::FirstTower
    }

    fn describe(&self) -> String {
        "tower (e.g. dart)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        self.aliases
            .tower(token)
            .map(Value::Tower)
            .ok_or_else(|| format!("`{token}` is not a tower"))
    }
}

/// Recognizes `<tower>#<path>`, e.g. `dart#top` or `sub#bottom-path`.
pub struct TowerPathParser {
    aliases: Arc<dyn AliasProvider>,
}

impl TowerPathParser {
    pub fn new(aliases: Arc<dyn AliasProvider>) -> Self {
        TowerPathParser { aliases }
    }
}

impl LeafParser for TowerPathParser {
    fn key(&self) -> FieldKey {
        FieldKey::FirstTower
    }

    fn describe(&self) -> String {
        "tower path (e.g. dart#top)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        let not_a_path = || format!("`{token}` is not a tower path (expected e.g. dart#top)");

        let (tower, path) = token.split_once('#').ok_or_else(not_a_path)?;
        let tower = self.aliases.tower(tower).ok_or_else(not_a_path)?;

        let lowered = path.to_lowercase();
        let path = match lowered.strip_suffix("-path").unwrap_or(&lowered) {
            "top" | "t" | "1" => Path::Top,
            "middle" | "mid" | "m" | "2" => Path::Middle,
            "bottom" | "bot" | "b" | "3" => Path::Bottom,
            _ => return Err(not_a_path()),
        };

        Ok(Value::TowerPath(tower, path))
    }
}

/// Recognizes `<tower>#<crosspath>` (e.g. `dart#025`) or a named upgrade.
pub struct TowerUpgradeParser {
    aliases: Arc<dyn AliasProvider>,
}

impl TowerUpgradeParser {
    pub fn new(aliases: Arc<dyn AliasProvider>) -> Self {
        TowerUpgradeParser { aliases }
    }
}

impl LeafParser for TowerUpgradeParser {
    fn key(&self) -> FieldKey {
        FieldKey::FirstTower
    }

    fn describe(&self) -> String {
        "tower upgrade (e.g. dart#025 or sun_avatar)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        if let Some((tower, crosspath)) = self.aliases.named_upgrade(token) {
            return Ok(Value::TowerUpgrade(tower, crosspath));
        }

        let (tower, tiers) = token
            .split_once('#')
            .ok_or_else(|| format!("`{token}` is not a tower upgrade (expected e.g. dart#025)"))?;
        let tower = self
            .aliases
            .tower(tower)
            .ok_or_else(|| format!("`{token}`: `{tower}` is not a tower"))?;
        let crosspath = Crosspath::parse(tiers)?;

        Ok(Value::TowerUpgrade(tower, crosspath))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::GameAliases;

    fn aliases() -> Arc<dyn AliasProvider> {
        Arc::new(GameAliases::new())
    }

    #[test]
    fn test_tower() {
        let parser = TowerParser::new(aliases());
        assert_eq!(parser.recognize("boat"), Ok(Value::Tower("monkey_buccaneer".to_string())));
        assert!(parser.recognize("gwen").is_err());
    }

    #[test]
    fn test_tower_path() {
        let parser = TowerPathParser::new(aliases());
        assert_eq!(
            parser.recognize("dart#top"),
            Ok(Value::TowerPath("dart_monkey".to_string(), Path::Top))
        );
        assert_eq!(
            parser.recognize("sub#Bottom-Path"),
            Ok(Value::TowerPath("monkey_sub".to_string(), Path::Bottom))
        );
        assert!(parser.recognize("dart#025").is_err());
        assert!(parser.recognize("dart").is_err());
        assert!(parser.recognize("gwen#top").is_err());
    }

    #[test]
    fn test_tower_upgrade() {
        let parser = TowerUpgradeParser::new(aliases());
        assert_eq!(
            parser.recognize("dart#025"),
            Ok(Value::TowerUpgrade("dart_monkey".to_string(), Crosspath([0, 2, 5])))
        );
        assert_eq!(
            parser.recognize("true_sun_god"),
            Ok(Value::TowerUpgrade("super_monkey".to_string(), Crosspath([5, 0, 0])))
        );
        assert!(parser.recognize("dart#top").is_err());
        assert!(parser.recognize("dart#555").unwrap_err().contains("two paths"));
    }
}

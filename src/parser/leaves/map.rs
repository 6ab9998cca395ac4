use std::sync::Arc;

use crate::{
    aliases::AliasProvider,
    parser::{FieldKey, LeafParser, Value},
};

/// Recognizes a map alias and resolves it to the canonical map id.
pub struct MapParser {
    aliases: Arc<dyn AliasProvider>,
}

impl MapParser {
    pub fn new(aliases: Arc<dyn AliasProvider>) -> Self {
        MapParser { aliases }
    }
}

impl LeafParser for MapParser {
    fn key(&self) -> FieldKey {
        FieldKey::Map
    }

    fn describe(&self) -> String {
        "map (e.g. logs)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        self.aliases
            .map(token)
            .map(Value::Map)
            .ok_or_else(|| format!("`{token}` is not a map"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::GameAliases;

    #[test]
    fn test_recognizes_map() {
        let parser = MapParser::new(Arc::new(GameAliases::new()));
        assert_eq!(parser.recognize("meadow"), Ok(Value::Map("monkey_meadow".to_string())));
        assert!(parser.recognize("gwen").is_err());
    }
}

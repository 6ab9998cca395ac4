use std::sync::Arc;

use crate::{
    aliases::AliasProvider,
    parser::{FieldKey, LeafParser, Value},
};

/// Recognizes a hero alias and resolves it to the canonical hero id.
pub struct HeroParser {
    aliases: Arc<dyn AliasProvider>,
}

impl HeroParser {
    pub fn new(aliases: Arc<dyn AliasProvider>) -> Self {
        HeroParser { aliases }
    }
}

impl LeafParser for HeroParser {
    fn key(&self) -> FieldKey {
        FieldKey::Hero
    }

    fn describe(&self) -> String {
        "hero (e.g. gwen)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        self.aliases
            .hero(token)
            .map(Value::Hero)
            .ok_or_else(|| format!("`{token}` is not a hero"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::GameAliases;

    #[test]
    fn test_recognizes_alias() {
        let parser = HeroParser::new(Arc::new(GameAliases::new()));
        assert_eq!(parser.recognize("Gwendolin"), Ok(Value::Hero("gwen".to_string())));
    }

    #[test]
    fn test_rejects_unknown_hero() {
        let parser = HeroParser::new(Arc::new(GameAliases::new()));
        assert_eq!(parser.recognize("bob"), Err("`bob` is not a hero".to_string()));
    }
}

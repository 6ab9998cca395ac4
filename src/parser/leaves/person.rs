use crate::parser::{FieldKey, LeafParser, Value};

/// Recognizes `u#<name>` (or `user#<name>`), normalized to lower case.
pub struct PersonParser;

impl LeafParser for PersonParser {
    fn key(&self) -> FieldKey {
        FieldKey::Person
    }

    fn describe(&self) -> String {
        "person (e.g. u#someone)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        let lowered = token.to_lowercase();
        let name = lowered
            .strip_prefix("u#")
            .or_else(|| lowered.strip_prefix("user#"))
            .ok_or_else(|| format!("`{token}` is not a person (expected e.g. u#someone)"))?;

        if name.is_empty() {
            return Err(format!("`{token}` has no name after the `#`"));
        }

        Ok(Value::Person(name.to_string()))
    }
}

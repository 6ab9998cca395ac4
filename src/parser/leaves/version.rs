use crate::parser::{FieldKey, LeafParser, Value, Version};

/// Recognizes `v<major>[.<minor>...]` or a dotted `<major>.<minor>[...]`.
///
/// A bare number without `v` is left to the natural number grammar.
pub struct VersionParser;

impl LeafParser for VersionParser {
    fn key(&self) -> FieldKey {
        FieldKey::Version
    }

    fn describe(&self) -> String {
        "version (e.g. v22.1)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        let not_a_version = || format!("`{token}` is not a version (expected e.g. v22.1)");

        let (prefixed, body) = match token.strip_prefix(&['v', 'V'][..]) {
            Some(body) => (true, body),
            None => (false, token),
        };
        if !prefixed && !body.contains('.') {
            return Err(not_a_version());
        }

        let parts = body
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u32>().ok()
            })
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(not_a_version)?;

        Ok(Value::Version(Version { parts }))
    }
}

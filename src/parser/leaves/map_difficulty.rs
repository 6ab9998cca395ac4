use crate::parser::{FieldKey, LeafParser, MapDifficulty, Value};

/// Recognizes a map difficulty, case-insensitively, with short aliases.
pub struct MapDifficultyParser;

impl LeafParser for MapDifficultyParser {
    fn key(&self) -> FieldKey {
        FieldKey::MapDifficulty
    }

    fn describe(&self) -> String {
        "map difficulty (beginner, intermediate, advanced or expert)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        let difficulty = match token.to_lowercase().as_str() {
            "beginner" | "beg" | "begin" => MapDifficulty::Beginner,
            "intermediate" | "int" | "inter" => MapDifficulty::Intermediate,
            "advanced" | "adv" => MapDifficulty::Advanced,
            "expert" | "exp" => MapDifficulty::Expert,
            _ => return Err(format!("`{token}` is not a map difficulty")),
        };

        Ok(Value::MapDifficulty(difficulty))
    }
}

use crate::parser::{FieldKey, LeafParser, Value};

/// Recognizes a positive base-10 integer.
pub struct NaturalNumberParser;

impl LeafParser for NaturalNumberParser {
    fn key(&self) -> FieldKey {
        FieldKey::NaturalNumber
    }

    fn describe(&self) -> String {
        "positive number".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("`{token}` is not a number"));
        }

        match token.parse::<u64>() {
            Ok(0) => Err(format!("`{token}` is not a positive number")),
            Ok(number) => Ok(Value::NaturalNumber(number)),
            Err(_) => Err(format!("`{token}` is too large")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_number() {
        assert_eq!(NaturalNumberParser.recognize("12"), Ok(Value::NaturalNumber(12)));
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        assert_eq!(
            NaturalNumberParser.recognize("0"),
            Err("`0` is not a positive number".to_string())
        );
        assert!(NaturalNumberParser.recognize("-3").is_err());
        assert!(NaturalNumberParser.recognize("1.5").is_err());
        assert_eq!(
            NaturalNumberParser.recognize("99999999999999999999999"),
            Err("`99999999999999999999999` is too large".to_string())
        );
    }
}

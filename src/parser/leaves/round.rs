use std::ops::RangeInclusive;

use crate::parser::{FieldKey, LeafParser, Value};

/// Recognizes `r<N>` (case-insensitive), for any round of any game difficulty.
pub struct RoundParser;

impl RoundParser {
    const ROUNDS: RangeInclusive<u32> = 1..=100;
}

impl LeafParser for RoundParser {
    fn key(&self) -> FieldKey {
        FieldKey::Round
    }

    fn describe(&self) -> String {
        "round (e.g. r40)".to_string()
    }

    fn recognize(&self, token: &str) -> Result<Value, String> {
        let digits = token
            .strip_prefix('r')
            .or_else(|| token.strip_prefix('R'))
            .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| format!("`{token}` is not a round (expected e.g. r40)"))?;

        let rounds = Self::ROUNDS;
        let out_of_range = || {
            format!(
                "`{token}` is out of range: rounds go from {} to {}",
                rounds.start(),
                rounds.end()
            )
        };

        let round = digits.parse::<u32>().map_err(|_| out_of_range())?;
        if !rounds.contains(&round) {
            return Err(out_of_range());
        }

        Ok(Value::Round(round))
    }
}

use crate::{
    parser::{FieldKey, MapDifficulty, Value},
    reactor::{Acceptance, Prompt, Reactor, StepInput},
};

/// Resolves a field from a reaction among a few emoji choices.
pub struct EmojiReactor {
    key: FieldKey,
    title: String,
    /// Emoji, label and the value it stands for
    choices: Vec<(String, String, Value)>,
}

impl EmojiReactor {
    pub fn new(key: FieldKey, title: &str, choices: Vec<(String, String, Value)>) -> Self {
        EmojiReactor {
            key,
            title: title.to_string(),
            choices,
        }
    }

    /// Map difficulty picker, from green (beginner) to red (expert).
    pub fn map_difficulty() -> Self {
        let choices = ["🟢", "🟡", "🟠", "🔴"]
            .iter()
            .zip(MapDifficulty::ALL)
            .map(|(emoji, difficulty)| {
                (
                    emoji.to_string(),
                    difficulty.name().to_string(),
                    Value::MapDifficulty(difficulty),
                )
            })
            .collect();
        EmojiReactor::new(FieldKey::MapDifficulty, "Which map difficulty?", choices)
    }
}

impl Reactor for EmojiReactor {
    fn field_key(&self) -> FieldKey {
        self.key
    }

    fn prompt(&self) -> Prompt {
        let legend: Vec<String> = self
            .choices
            .iter()
            .map(|(emoji, label, _)| format!("{emoji} {label}"))
            .collect();

        Prompt {
            body: format!("**{}**\n\n{}", self.title, legend.join("  \n")),
            reactions: self.choices.iter().map(|(emoji, _, _)| emoji.clone()).collect(),
        }
    }

    fn accept(&self, input: StepInput<'_>) -> Acceptance {
        let StepInput::Reaction(key) = input else {
            return Acceptance::Ignored;
        };

        self.choices
            .iter()
            .find(|(emoji, _, _)| emoji == key)
            .map(|(_, _, value)| Acceptance::Resolved(value.clone()))
            .unwrap_or(Acceptance::Ignored)
    }
}

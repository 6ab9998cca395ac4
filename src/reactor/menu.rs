use crate::{
    aliases::HEROES,
    parser::{FieldKey, Value},
    reactor::{Acceptance, Prompt, Reactor, StepInput},
};

/// Regional indicator letters labelling menu options.
const LETTERS: [&str; 26] = [
    "🇦", "🇧", "🇨", "🇩", "🇪", "🇫", "🇬", "🇭", "🇮", "🇯", "🇰", "🇱", "🇲", "🇳", "🇴", "🇵", "🇶", "🇷", "🇸", "🇹", "🇺", "🇻", "🇼", "🇽", "🇾", "🇿"
];

/// One entry of a [`MenuReactor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    /// Identifier accepted as a text reply
    pub id: String,
    pub label: String,
    pub description: String,
    pub value: Value,
}

/// Selection menu resolving a field from a fixed list of options.
///
/// Each option is labelled with a letter emoji seeded as a reaction on the
/// prompt. The user picks one by clicking its reaction, or by replying with
/// the option id, its label or its letter.
pub struct MenuReactor {
    key: FieldKey,
    title: String,
    options: Vec<MenuOption>,
}

impl MenuReactor {
    /// Builds a menu; options past the 26th letter are dropped.
    pub fn new(key: FieldKey, title: &str, mut options: Vec<MenuOption>) -> Self {
        options.truncate(LETTERS.len());
        MenuReactor {
            key,
            title: title.to_string(),
            options,
        }
    }

    /// Menu listing every hero.
    pub fn heroes() -> Self {
        let options = HEROES
            .iter()
            .map(|(id, label, description, _)| MenuOption {
                id: id.to_string(),
                label: label.to_string(),
                description: description.to_string(),
                value: Value::Hero(id.to_string()),
            })
            .collect();
        MenuReactor::new(FieldKey::Hero, "Which hero?", options)
    }

    fn find_text(&self, text: &str) -> Option<&MenuOption> {
        let text = text.trim().to_lowercase();
        self.options
            .iter()
            .find(|option| option.id == text || option.label.to_lowercase() == text)
            .or_else(|| {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter @ 'a'..='z'), None) => {
                        self.options.get(letter as usize - 'a' as usize)
                    }
                    _ => None,
                }
            })
    }
}

impl Reactor for MenuReactor {
    fn field_key(&self) -> FieldKey {
        self.key
    }

    fn prompt(&self) -> Prompt {
        let mut body = format!("**{}**\n\n", self.title);
        for (letter, option) in LETTERS.iter().zip(&self.options) {
            body.push_str(&format!("{letter} {}: {}  \n", option.label, option.description));
        }

        Prompt {
            body,
            reactions: LETTERS
                .iter()
                .take(self.options.len())
                .map(|letter| letter.to_string())
                .collect(),
        }
    }

    fn accept(&self, input: StepInput<'_>) -> Acceptance {
        let option = match input {
            StepInput::Reaction(key) => LETTERS
                .iter()
                .position(|letter| *letter == key)
                .and_then(|index| self.options.get(index)),
            StepInput::Text(text) => self.find_text(text),
        };

        match option {
            Some(option) => Acceptance::Resolved(option.value.clone()),
            None => Acceptance::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_hero() {
        let menu = MenuReactor::heroes();
        let prompt = menu.prompt();
        assert_eq!(prompt.reactions.len(), HEROES.len());
        assert_eq!(prompt.reactions[0], "🇦");
        assert!(prompt.body.contains("🇦 Quincy"));
        assert!(prompt.body.contains("🇧 Gwendolin: Pyromaniac"));
    }

    #[test]
    fn test_reaction_selects_option() {
        let menu = MenuReactor::heroes();
        assert_eq!(
            menu.accept(StepInput::Reaction("🇧")),
            Acceptance::Resolved(Value::Hero("gwen".to_string()))
        );
        assert_eq!(menu.accept(StepInput::Reaction("🇿")), Acceptance::Ignored);
        assert_eq!(menu.accept(StepInput::Reaction("👍")), Acceptance::Ignored);
    }

    #[test]
    fn test_text_selects_option() {
        let menu = MenuReactor::heroes();
        let gwen = Acceptance::Resolved(Value::Hero("gwen".to_string()));
        assert_eq!(menu.accept(StepInput::Text("gwen")), gwen);
        assert_eq!(menu.accept(StepInput::Text(" Gwendolin ")), gwen);
        assert_eq!(menu.accept(StepInput::Text("B")), gwen);
        assert_eq!(menu.accept(StepInput::Text("hello there")), Acceptance::Ignored);
    }
}

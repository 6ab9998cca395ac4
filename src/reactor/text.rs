use crate::{
    parser::{FieldKey, LeafParser, tokenize},
    reactor::{Acceptance, InvalidInputPolicy, Prompt, Reactor, StepInput},
};

/// Free-text step parsing the reply with a leaf parser.
///
/// A reply must hold exactly one token. Rejections follow the step
/// [`InvalidInputPolicy`].
pub struct SingleTextParser {
    parser: Box<dyn LeafParser>,
    question: String,
    policy: InvalidInputPolicy,
}

impl SingleTextParser {
    pub fn new(parser: impl LeafParser + 'static, question: &str) -> Self {
        SingleTextParser {
            parser: Box::new(parser),
            question: question.to_string(),
            policy: InvalidInputPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InvalidInputPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Reactor for SingleTextParser {
    fn field_key(&self) -> FieldKey {
        self.parser.key()
    }

    fn policy(&self) -> InvalidInputPolicy {
        self.policy
    }

    fn prompt(&self) -> Prompt {
        Prompt {
            body: format!("**{}**\n\nReply with a {}.", self.question, self.parser.describe()),
            reactions: Vec::new(),
        }
    }

    fn accept(&self, input: StepInput<'_>) -> Acceptance {
        let StepInput::Text(text) = input else {
            return Acceptance::Ignored;
        };

        match tokenize(text).as_slice() {
            [] => Acceptance::Ignored,
            [token] => match self.parser.recognize(token) {
                Ok(value) => Acceptance::Resolved(value),
                Err(reason) => Acceptance::Rejected(reason),
            },
            _ => Acceptance::Rejected(format!("expected a single {}", self.parser.describe())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{
        LeafParserExt, Value,
        leaves::RoundParser,
    };

    fn round_step() -> SingleTextParser {
        SingleTextParser::new(
            RoundParser.keyed(FieldKey::StartingRound),
            "Which round do you start on?",
        )
    }

    #[test]
    fn test_field_key_follows_parser() {
        assert_eq!(round_step().field_key(), FieldKey::StartingRound);
        assert_eq!(round_step().policy(), InvalidInputPolicy::RePrompt);
        assert_eq!(
            round_step().with_policy(InvalidInputPolicy::Abort).policy(),
            InvalidInputPolicy::Abort
        );
    }

    #[test]
    fn test_prompt_describes_expected_input() {
        let prompt = round_step().prompt();
        assert!(prompt.body.contains("round (e.g. r40)"));
        assert!(prompt.reactions.is_empty());
    }

    #[test]
    fn test_accepts_valid_reply() {
        assert_eq!(
            round_step().accept(StepInput::Text(" r40 ")),
            Acceptance::Resolved(Value::Round(40))
        );
    }

    #[test]
    fn test_rejects_invalid_reply() {
        match round_step().accept(StepInput::Text("forty")) {
            Acceptance::Rejected(reason) => assert!(reason.contains("not a round")),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(matches!(
            round_step().accept(StepInput::Text("r4 r5")),
            Acceptance::Rejected(_)
        ));
    }

    #[test]
    fn test_ignores_reactions() {
        assert_eq!(round_step().accept(StepInput::Reaction("🟢")), Acceptance::Ignored);
    }
}

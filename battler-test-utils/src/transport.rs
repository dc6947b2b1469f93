use std::collections::VecDeque;

use ahash::{
    HashMap,
    HashMapExt,
};
use battler_engine::battle::{
    Choice,
    ChoiceRequest,
    ChoiceResponse,
    ChoiceTransport,
};

/// A [`ChoiceTransport`] that answers requests from a script of choices per side.
///
/// A side that runs out of scripted choices cancels, so the battle falls back to its default.
#[derive(Default)]
pub struct ScriptedChoiceTransport {
    choices: HashMap<usize, VecDeque<Choice>>,
    requests: Vec<ChoiceRequest>,
}

impl ScriptedChoiceTransport {
    pub fn new() -> Self {
        Self {
            choices: HashMap::new(),
            requests: Vec::new(),
        }
    }

    /// Queues choices for a side, parsed from strings like `"move 0"` or `"switch 2"`.
    pub fn with_choices(mut self, side: usize, choices: &[&str]) -> Self {
        self.choices.entry(side).or_default().extend(
            choices
                .iter()
                .map(|choice| choice.parse::<Choice>().unwrap()),
        );
        self
    }

    /// Every request received, in order.
    pub fn requests(&self) -> &[ChoiceRequest] {
        &self.requests
    }

    /// Number of choices not yet used by the side.
    pub fn remaining(&self, side: usize) -> usize {
        self.choices.get(&side).map(|choices| choices.len()).unwrap_or(0)
    }
}

impl ChoiceTransport for ScriptedChoiceTransport {
    fn request_choice(&mut self, request: &ChoiceRequest) -> ChoiceResponse {
        self.requests.push(request.clone());
        match self
            .choices
            .get_mut(&request.side)
            .and_then(|choices| choices.pop_front())
        {
            Some(choice) => ChoiceResponse::Choice(choice),
            None => ChoiceResponse::Cancelled,
        }
    }
}

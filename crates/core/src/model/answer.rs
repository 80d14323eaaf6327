use serde::{Deserialize, Serialize};

use crate::model::ids::TestId;
use crate::model::assessment::QuestionAnswer;

/// Per-question holder for the learner's text response.
///
/// Question and reference answer are copied from the test so a submitted slot
/// stands on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSlot {
    pub question: String,
    pub sample_answer: String,
    #[serde(default)]
    pub user_answer: String,
}

impl AnswerSlot {
    #[must_use]
    pub fn empty_for(qa: &QuestionAnswer) -> Self {
        Self {
            question: qa.question.clone(),
            sample_answer: qa.answer.clone(),
            user_answer: String::new(),
        }
    }

    /// True once the learner has typed something other than whitespace.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        !self.user_answer.trim().is_empty()
    }
}

/// Outbound submission for one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSubmission {
    pub test_id: TestId,
    pub email: String,
    pub questions_and_answers: Vec<AnswerSlot>,
}

impl ResponseSubmission {
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions_and_answers
            .iter()
            .filter(|slot| slot.is_answered())
            .count()
    }
}

use insight_core::model::{AnswerSlot, QuestionAnswer};

/// Index-aligned answer slots for the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerStore {
    slots: Vec<AnswerSlot>,
}

impl AnswerStore {
    /// One empty slot per question, in question order.
    #[must_use]
    pub fn from_questions(questions: &[QuestionAnswer]) -> Self {
        Self {
            slots: questions.iter().map(AnswerSlot::empty_for).collect(),
        }
    }

    /// Replace the learner's text for `index`.
    ///
    /// Out-of-range indices are ignored; returns whether a slot was written.
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.user_answer = text.into();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AnswerSlot> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn slots(&self) -> &[AnswerSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(AnswerSlot::is_answered)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_answered()).count()
    }

    /// Detached copy of every slot for submission.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AnswerSlot> {
        self.slots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AnswerStore {
        AnswerStore::from_questions(&[
            QuestionAnswer::new("Q1", "A1"),
            QuestionAnswer::new("Q2", "A2"),
            QuestionAnswer::new("Q3", "A3"),
        ])
    }

    #[test]
    fn seeds_empty_slots_with_denormalized_questions() {
        let store = store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1).unwrap().question, "Q2");
        assert_eq!(store.get(1).unwrap().sample_answer, "A2");
        assert!(store.slots().iter().all(|s| s.user_answer.is_empty()));
    }

    #[test]
    fn set_answer_touches_only_target_slot() {
        let mut store = store();
        assert!(store.set_answer(1, "my answer"));
        assert_eq!(store.get(0).unwrap().user_answer, "");
        assert_eq!(store.get(1).unwrap().user_answer, "my answer");
        assert_eq!(store.get(2).unwrap().user_answer, "");
        assert_eq!(store.answered_count(), 1);
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut store = store();
        let before = store.clone();
        assert!(!store.set_answer(3, "ignored"));
        assert!(!store.set_answer(usize::MAX, "ignored"));
        assert_eq!(store, before);
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut store = store();
        store.set_answer(0, "first");
        let snapshot = store.snapshot();
        store.set_answer(0, "edited");
        assert_eq!(snapshot[0].user_answer, "first");
        assert_eq!(store.get(0).unwrap().user_answer, "edited");
    }
}

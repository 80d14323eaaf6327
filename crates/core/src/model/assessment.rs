use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::difficulty::Difficulty;
use crate::model::ids::TestId;
use crate::time::instant_serde;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("test title cannot be empty")]
    EmptyTitle,

    #[error("test has no questions")]
    NoQuestions,
}

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// One question with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

impl QuestionAnswer {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Inbound test payload as delivered by the catalog API.
///
/// This is also the transfer object handed from the catalog to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPayload {
    pub id: TestId,
    pub title: String,
    pub subject: String,
    pub marks: u32,
    /// Minutes.
    pub duration: u32,
    pub difficulty: Difficulty,
    #[serde(with = "instant_serde")]
    pub scheduled_at: DateTime<Utc>,
    pub teacher_email: String,
    #[serde(default)]
    pub pairs: u32,
    #[serde(default)]
    pub questions_and_answers: Vec<QuestionAnswer>,
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// A scheduled, immutable assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    id: TestId,
    title: String,
    subject: String,
    total_marks: u32,
    duration_minutes: u32,
    difficulty: Difficulty,
    scheduled_at: DateTime<Utc>,
    instructor_email: String,
    pairs: u32,
    questions: Vec<QuestionAnswer>,
}

impl Test {
    /// Validate a decoded payload into a test.
    ///
    /// # Errors
    ///
    /// Returns `TestError` when the title is blank or there are no questions.
    /// Blank question text is kept as delivered.
    pub fn from_payload(payload: TestPayload) -> Result<Self, TestError> {
        let title = payload.title.trim().to_owned();
        if title.is_empty() {
            return Err(TestError::EmptyTitle);
        }
        if payload.questions_and_answers.is_empty() {
            return Err(TestError::NoQuestions);
        }

        Ok(Self {
            id: payload.id,
            title,
            subject: payload.subject,
            total_marks: payload.marks,
            duration_minutes: payload.duration,
            difficulty: payload.difficulty,
            scheduled_at: payload.scheduled_at,
            instructor_email: payload.teacher_email,
            pairs: payload.pairs,
            questions: payload.questions_and_answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &TestId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn total_marks(&self) -> u32 {
        self.total_marks
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    #[must_use]
    pub fn instructor_email(&self) -> &str {
        &self.instructor_email
    }

    /// Pair count as declared by the payload. Not checked against `questions`.
    #[must_use]
    pub fn pairs(&self) -> u32 {
        self.pairs
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionAnswer] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// A test opens at its scheduled instant.
    #[must_use]
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        now >= self.scheduled_at
    }
}

impl From<&Test> for TestPayload {
    fn from(test: &Test) -> Self {
        Self {
            id: test.id.clone(),
            title: test.title.clone(),
            subject: test.subject.clone(),
            marks: test.total_marks,
            duration: test.duration_minutes,
            difficulty: test.difficulty,
            scheduled_at: test.scheduled_at,
            teacher_email: test.instructor_email.clone(),
            pairs: test.pairs,
            questions_and_answers: test.questions.clone(),
        }
    }
}

impl TryFrom<TestPayload> for Test {
    type Error = TestError;

    fn try_from(payload: TestPayload) -> Result<Self, Self::Error> {
        Self::from_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn payload() -> TestPayload {
        TestPayload {
            id: TestId::new("1"),
            title: "Data Structures".into(),
            subject: "Computer Science".into(),
            marks: 30,
            duration: 2,
            difficulty: Difficulty::Hard,
            scheduled_at: fixed_now(),
            teacher_email: "prof.smith@university.edu".into(),
            pairs: 2,
            questions_and_answers: vec![
                QuestionAnswer::new("What is a stack?", "LIFO structure"),
                QuestionAnswer::new("What is a queue?", "FIFO structure"),
            ],
        }
    }

    #[test]
    fn decodes_api_json() {
        let json = r#"{
            "id": 3,
            "title": "Machine Learning",
            "subject": "CS",
            "marks": 120,
            "duration": 150,
            "difficulty": "hard",
            "scheduled_at": "2024-01-20T09:00:00",
            "teacher_email": "prof.davis@university.edu",
            "pairs": 1,
            "questions_and_answers": [{"question": "Define overfitting", "answer": "..."}]
        }"#;
        let payload: TestPayload = serde_json::from_str(json).unwrap();
        let test = Test::from_payload(payload).unwrap();
        assert_eq!(test.id().as_str(), "3");
        assert_eq!(test.difficulty(), Difficulty::Hard);
        assert_eq!(test.duration_seconds(), 9000);
        assert_eq!(test.question_count(), 1);
    }

    #[test]
    fn rejects_tests_without_questions() {
        let mut p = payload();
        p.questions_and_answers.clear();
        assert_eq!(Test::from_payload(p), Err(TestError::NoQuestions));
    }

    #[test]
    fn rejects_blank_title() {
        let mut p = payload();
        p.title = "  ".into();
        assert_eq!(Test::from_payload(p), Err(TestError::EmptyTitle));
    }

    #[test]
    fn keeps_blank_question_text() {
        let mut p = payload();
        p.questions_and_answers[1].question = String::new();
        let test = Test::from_payload(p).unwrap();
        assert_eq!(test.question_count(), 2);
        assert_eq!(test.questions()[1].question, "");
    }

    #[test]
    fn availability_starts_at_schedule() {
        let test = Test::from_payload(payload()).unwrap();
        assert!(!test.is_available(fixed_now() - Duration::seconds(1)));
        assert!(test.is_available(fixed_now()));
    }

    #[test]
    fn payload_conversion_preserves_shape() {
        let original = payload();
        let test = Test::from_payload(original.clone()).unwrap();
        assert_eq!(TestPayload::from(&test), original);
    }
}

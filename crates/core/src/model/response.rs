use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::difficulty::Difficulty;
use crate::model::ids::{ResponseId, TestId};
use crate::time::instant_serde;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ResponseError {
    #[error("similarity for question {index} must be within 0..=100, got {value}")]
    SimilarityOutOfRange { index: usize, value: f64 },

    #[error("marks cannot be negative")]
    NegativeMarks,
}

/// One graded question as produced by the external grader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub question: String,
    pub sample_answer: String,
    #[serde(default)]
    pub user_answer: String,
    /// 0–100.
    pub similarity: f64,
    /// Awarded by the grader; authoritative.
    pub marks: f64,
}

impl GradedAnswer {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        !self.user_answer.trim().is_empty()
    }
}

/// Inbound response payload as returned by the results API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub id: ResponseId,
    pub test_id: TestId,
    pub title: String,
    pub subject: String,
    pub marks_obtained: f64,
    pub total_marks: u32,
    pub duration: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub pairs: u32,
    #[serde(with = "instant_serde")]
    pub submitted_at: DateTime<Utc>,
    pub teacher_email: String,
    #[serde(default)]
    pub questions_and_answers: Vec<GradedAnswer>,
}

/// Immutable graded record of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    id: ResponseId,
    test_id: TestId,
    title: String,
    subject: String,
    marks_obtained: f64,
    total_marks: u32,
    duration_minutes: u32,
    difficulty: Difficulty,
    pairs: u32,
    submitted_at: DateTime<Utc>,
    instructor_email: String,
    answers: Vec<GradedAnswer>,
}

impl Response {
    /// # Errors
    ///
    /// Returns `ResponseError` when a similarity is outside 0..=100 or any
    /// mark is negative.
    pub fn from_payload(payload: ResponsePayload) -> Result<Self, ResponseError> {
        if payload.marks_obtained < 0.0 {
            return Err(ResponseError::NegativeMarks);
        }
        for (index, qa) in payload.questions_and_answers.iter().enumerate() {
            if !(0.0..=100.0).contains(&qa.similarity) {
                return Err(ResponseError::SimilarityOutOfRange {
                    index,
                    value: qa.similarity,
                });
            }
            if qa.marks < 0.0 {
                return Err(ResponseError::NegativeMarks);
            }
        }

        Ok(Self {
            id: payload.id,
            test_id: payload.test_id,
            title: payload.title,
            subject: payload.subject,
            marks_obtained: payload.marks_obtained,
            total_marks: payload.total_marks,
            duration_minutes: payload.duration,
            difficulty: payload.difficulty,
            pairs: payload.pairs,
            submitted_at: payload.submitted_at,
            instructor_email: payload.teacher_email,
            answers: payload.questions_and_answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ResponseId {
        &self.id
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
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
    pub fn marks_obtained(&self) -> f64 {
        self.marks_obtained
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
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn pairs(&self) -> u32 {
        self.pairs
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn instructor_email(&self) -> &str {
        &self.instructor_email
    }

    #[must_use]
    pub fn answers(&self) -> &[GradedAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }
}

impl From<&Response> for ResponsePayload {
    fn from(response: &Response) -> Self {
        Self {
            id: response.id.clone(),
            test_id: response.test_id.clone(),
            title: response.title.clone(),
            subject: response.subject.clone(),
            marks_obtained: response.marks_obtained,
            total_marks: response.total_marks,
            duration: response.duration_minutes,
            difficulty: response.difficulty,
            pairs: response.pairs,
            submitted_at: response.submitted_at,
            teacher_email: response.instructor_email.clone(),
            questions_and_answers: response.answers.clone(),
        }
    }
}

impl TryFrom<ResponsePayload> for Response {
    type Error = ResponseError;

    fn try_from(payload: ResponsePayload) -> Result<Self, Self::Error> {
        Self::from_payload(payload)
    }
}

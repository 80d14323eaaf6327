//! Score derivation for completed results.
//!
//! Everything here is display-side analytics. Awarded marks come from the
//! external grader and are never recomputed.

use serde::Serialize;

use crate::model::{GradedAnswer, Response};

//
// ─── PERCENTAGE ────────────────────────────────────────────────────────────────
//

fn ratio_percent(obtained: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() || !obtained.is_finite() {
        return 0.0;
    }
    obtained / total * 100.0
}

/// `round(obtained / total * 100)` with half-up rounding.
///
/// A zero total yields 0 rather than an error.
///
/// ```
/// # use insight_core::scoring::percentage;
/// assert_eq!(percentage(80.0, 100.0), 80);
/// assert_eq!(percentage(1.0, 8.0), 13);
/// assert_eq!(percentage(0.0, 0.0), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentage(obtained: f64, total: f64) -> u32 {
    let exact = ratio_percent(obtained, total);
    if exact <= 0.0 {
        return 0;
    }
    (exact + 0.5).floor() as u32
}

/// Nominal marks per question, `round(total / count)`, for "x out of N" labels.
///
/// The sum over all questions need not equal `total`.
///
/// ```
/// # use insight_core::scoring::nominal_question_marks;
/// assert_eq!(nominal_question_marks(100, 3), 33);
/// assert_eq!(nominal_question_marks(10, 4), 3);
/// assert_eq!(nominal_question_marks(10, 0), 0);
/// ```
#[must_use]
pub fn nominal_question_marks(total_marks: u32, question_count: usize) -> u32 {
    let Ok(count) = u64::try_from(question_count) else {
        return 0;
    };
    if count == 0 {
        return 0;
    }
    let total = u64::from(total_marks);
    u32::try_from((2 * total + count) / (2 * count)).unwrap_or(u32::MAX)
}

//
// ─── BANDS ─────────────────────────────────────────────────────────────────────
//

/// Coarse classification of an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    /// `>= 80` high, `>= 60` medium, otherwise low.
    #[must_use]
    pub fn from_percentage(percent: u32) -> Self {
        Self::classify(f64::from(percent))
    }

    /// Bands the unrounded ratio, so 79.6% is still medium.
    #[must_use]
    pub fn for_marks(obtained: f64, total: f64) -> Self {
        Self::classify(ratio_percent(obtained, total))
    }

    fn classify(percent: f64) -> Self {
        if percent >= 80.0 {
            ScoreBand::High
        } else if percent >= 60.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        }
    }
}

/// Per-question classification by similarity to the reference answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    Strong,
    Partial,
    Weak,
}

impl PerformanceBand {
    /// `>= 70` strong, `>= 40` partial, otherwise weak.
    #[must_use]
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 70.0 {
            PerformanceBand::Strong
        } else if similarity >= 40.0 {
            PerformanceBand::Partial
        } else {
            PerformanceBand::Weak
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PerformanceBand::Strong => "strong",
            PerformanceBand::Partial => "partial",
            PerformanceBand::Weak => "weak",
        }
    }

    /// Sentence shown to the learner under each graded answer.
    #[must_use]
    pub fn feedback(self) -> &'static str {
        match self {
            PerformanceBand::Strong => {
                "Excellent! Your answer closely matches the expected response."
            }
            PerformanceBand::Partial => {
                "Good effort! Your answer covers some key points but could be more comprehensive."
            }
            PerformanceBand::Weak => {
                "Your answer needs improvement. Consider reviewing the topic and sample answer."
            }
        }
    }
}

//
// ─── RESULT ANALYTICS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionAnalysis {
    pub index: usize,
    pub performance: PerformanceBand,
    pub answered: bool,
    pub similarity: f64,
    pub awarded_marks: f64,
}

impl QuestionAnalysis {
    fn from_graded(index: usize, graded: &GradedAnswer) -> Self {
        Self {
            index,
            performance: PerformanceBand::from_similarity(graded.similarity),
            answered: graded.is_answered(),
            similarity: graded.similarity,
            awarded_marks: graded.marks,
        }
    }
}

/// Derived view over one completed result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultAnalytics {
    pub percentage: u32,
    pub band: ScoreBand,
    pub nominal_question_marks: u32,
    pub questions: Vec<QuestionAnalysis>,
}

impl ResultAnalytics {
    #[must_use]
    pub fn from_response(response: &Response) -> Self {
        let total = f64::from(response.total_marks());
        let questions = response
            .answers()
            .iter()
            .enumerate()
            .map(|(index, graded)| QuestionAnalysis::from_graded(index, graded))
            .collect();

        Self {
            percentage: percentage(response.marks_obtained(), total),
            band: ScoreBand::for_marks(response.marks_obtained(), total),
            nominal_question_marks: nominal_question_marks(
                response.total_marks(),
                response.question_count(),
            ),
            questions,
        }
    }

    #[must_use]
    pub fn count_in(&self, band: PerformanceBand) -> usize {
        self.questions
            .iter()
            .filter(|q| q.performance == band)
            .count()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.answered).count()
    }

    /// Mean similarity across questions, 0 when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_similarity(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.questions.iter().map(|q| q.similarity).sum();
        sum / self.questions.len() as f64
    }
}

/// Average score across results, rounded to two decimals.
///
/// Returns `None` for an empty collection.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_percentage(results: &[Response]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let sum: f64 = results
        .iter()
        .map(|r| ratio_percent(r.marks_obtained(), f64::from(r.total_marks())))
        .sum();
    let mean = sum / results.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

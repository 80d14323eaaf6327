use serde::Serialize;

use insight_core::model::{Response, ResponseId};
use insight_core::scoring::{PerformanceBand, ResultAnalytics, ScoreBand};

use crate::vm::time_fmt::{format_date, format_duration, format_marks};

pub const NO_ANSWER: &str = "No answer provided";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionDetailVm {
    pub number: usize,
    pub title: String,
    pub question: String,
    pub answer: String,
    pub answered: bool,
    pub sample_answer: String,
    pub similarity: f64,
    pub similarity_label: String,
    pub performance: PerformanceBand,
    pub feedback: &'static str,
    pub marks_label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultDetailVm {
    pub id: ResponseId,
    pub title: String,
    pub subject: String,
    pub difficulty: &'static str,
    pub duration_label: String,
    pub score_label: String,
    pub percentage_label: String,
    pub band: ScoreBand,
    pub question_count: usize,
    pub submitted_label: String,
    pub strong: usize,
    pub partial: usize,
    pub weak: usize,
    pub questions: Vec<QuestionDetailVm>,
}

impl ResultDetailVm {
    /// Question at zero-based `index`, clamped to the last one.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&QuestionDetailVm> {
        self.questions
            .get(index)
            .or_else(|| self.questions.last())
    }
}

#[must_use]
pub fn map_result_detail(result: &Response) -> ResultDetailVm {
    let analytics = ResultAnalytics::from_response(result);
    let nominal = analytics.nominal_question_marks;

    let questions = result
        .answers()
        .iter()
        .zip(&analytics.questions)
        .map(|(graded, analysis)| QuestionDetailVm {
            number: analysis.index + 1,
            title: format!("Question {}", analysis.index + 1),
            question: graded.question.clone(),
            answer: if analysis.answered {
                graded.user_answer.clone()
            } else {
                NO_ANSWER.to_owned()
            },
            answered: analysis.answered,
            sample_answer: graded.sample_answer.clone(),
            similarity: analysis.similarity,
            similarity_label: format!("{}% similarity", format_marks(analysis.similarity)),
            performance: analysis.performance,
            feedback: analysis.performance.feedback(),
            marks_label: format!("{}/{nominal} marks", format_marks(analysis.awarded_marks)),
        })
        .collect();

    ResultDetailVm {
        id: result.id().clone(),
        title: result.title().to_owned(),
        subject: result.subject().to_owned(),
        difficulty: result.difficulty().label(),
        duration_label: format_duration(result.duration_minutes()),
        score_label: format!(
            "{}/{}",
            format_marks(result.marks_obtained()),
            result.total_marks()
        ),
        percentage_label: format!("{}%", analytics.percentage),
        band: analytics.band,
        question_count: result.question_count(),
        submitted_label: format_date(result.submitted_at()),
        strong: analytics.count_in(PerformanceBand::Strong),
        partial: analytics.count_in(PerformanceBand::Partial),
        weak: analytics.count_in(PerformanceBand::Weak),
        questions,
    }
}

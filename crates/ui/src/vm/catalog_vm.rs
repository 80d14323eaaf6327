use chrono::{DateTime, Utc};
use serde::Serialize;

use insight_core::model::{Response, ResponseId, Test, TestId};
use insight_core::scoring::{ScoreBand, percentage};

use crate::vm::time_fmt::{format_datetime, format_duration, format_marks};

/// UI-ready card for an upcoming test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestCardVm {
    pub id: TestId,
    pub title: String,
    pub subject: String,
    pub difficulty: &'static str,
    pub marks_label: String,
    pub duration_label: String,
    pub questions_label: String,
    pub instructor: String,
    pub scheduled_label: String,
    pub available: bool,
    pub action_label: &'static str,
}

impl TestCardVm {
    #[must_use]
    pub fn new(test: &Test, now: DateTime<Utc>) -> Self {
        let available = test.is_available(now);
        Self {
            id: test.id().clone(),
            title: test.title().to_owned(),
            subject: test.subject().to_owned(),
            difficulty: test.difficulty().label(),
            marks_label: format!("{} marks", test.total_marks()),
            duration_label: format!("{} min", test.duration_minutes()),
            questions_label: format!("{} questions", test.pairs()),
            instructor: handle(test.instructor_email()).to_owned(),
            scheduled_label: format_datetime(test.scheduled_at()),
            available,
            action_label: if available {
                "Start Test"
            } else {
                "Not Available Yet"
            },
        }
    }
}

#[must_use]
pub fn map_test_cards(tests: &[Test], now: DateTime<Utc>) -> Vec<TestCardVm> {
    tests.iter().map(|test| TestCardVm::new(test, now)).collect()
}

/// UI-ready card for a graded result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultCardVm {
    pub id: ResponseId,
    pub title: String,
    pub subject: String,
    pub difficulty: &'static str,
    pub score_label: String,
    pub percentage: u32,
    pub percentage_label: String,
    pub band: &'static str,
    pub questions_label: String,
    pub duration_label: String,
    pub submitted_label: String,
    pub creator_label: String,
}

impl From<&Response> for ResultCardVm {
    fn from(result: &Response) -> Self {
        let obtained = result.marks_obtained();
        let total = f64::from(result.total_marks());
        let percent = percentage(obtained, total);
        Self {
            id: result.id().clone(),
            title: result.title().to_owned(),
            subject: result.subject().to_owned(),
            difficulty: result.difficulty().label(),
            score_label: format!("{}/{}", format_marks(obtained), result.total_marks()),
            percentage: percent,
            percentage_label: format!("{percent}% Score"),
            band: ScoreBand::for_marks(obtained, total).label(),
            questions_label: format!("{} questions", result.question_count()),
            duration_label: format_duration(result.duration_minutes()),
            submitted_label: format!("Submitted: {}", format_datetime(result.submitted_at())),
            creator_label: format!("Creator: {}", handle(result.instructor_email())),
        }
    }
}

#[must_use]
pub fn map_result_cards(results: &[Response]) -> Vec<ResultCardVm> {
    results.iter().map(ResultCardVm::from).collect()
}

/// Dashboard label for the average score.
#[must_use]
pub fn average_label(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{value}%"),
        None => "N/A".to_owned(),
    }
}

fn handle(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

use serde::Serialize;

use insight_core::model::SessionSettings;
use services::sessions::{ActiveSession, SessionController, SessionState, SubmittedSession};

use crate::vm::time_fmt::format_countdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NavState {
    Current,
    Answered,
    Unanswered,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionNavVm {
    /// One-based.
    pub number: usize,
    pub state: NavState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PrimaryAction {
    Next,
    SubmitTest,
}

impl PrimaryAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::Next => "Next",
            PrimaryAction::SubmitTest => "Submit Test",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionHeaderVm {
    pub title: String,
    pub subject: String,
    pub marks_label: String,
    pub instructor: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveSessionVm {
    pub header: SessionHeaderVm,
    pub countdown: String,
    pub low_time: bool,
    pub position_label: String,
    pub progress_percent: f64,
    pub question_label: String,
    pub question_text: String,
    pub answer_text: String,
    pub answered: usize,
    pub nav: Vec<QuestionNavVm>,
    pub primary: PrimaryAction,
    pub previous_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmittedVm {
    pub title: &'static str,
    pub description: &'static str,
    pub notice: &'static str,
    pub answered: usize,
    pub total: usize,
}

/// Everything the test-taking screen renders for the current state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SessionScreenVm {
    Loading,
    NotFound,
    Active(ActiveSessionVm),
    Submitted(SubmittedVm),
}

#[must_use]
pub fn map_session_screen(
    controller: &SessionController,
    settings: &SessionSettings,
) -> SessionScreenVm {
    match controller.state() {
        SessionState::Loading => SessionScreenVm::Loading,
        SessionState::NotFound(_) => SessionScreenVm::NotFound,
        SessionState::Active(active) => SessionScreenVm::Active(map_active(active, settings)),
        SessionState::Submitted(done) => SessionScreenVm::Submitted(map_submitted(done)),
    }
}

fn map_active(active: &ActiveSession, settings: &SessionSettings) -> ActiveSessionVm {
    let test = active.test();
    let answers = active.answers();
    let progress = active.progress();
    let current = active.current_index();

    let nav = (0..answers.len())
        .map(|index| QuestionNavVm {
            number: index + 1,
            state: if index == current {
                NavState::Current
            } else if answers.is_answered(index) {
                NavState::Answered
            } else {
                NavState::Unanswered
            },
        })
        .collect();

    let (question_text, answer_text) = answers
        .get(current)
        .map(|slot| (slot.question.clone(), slot.user_answer.clone()))
        .unwrap_or_default();

    ActiveSessionVm {
        header: SessionHeaderVm {
            title: test.title().to_owned(),
            subject: test.subject().to_owned(),
            marks_label: format!("{} marks", test.total_marks()),
            instructor: test.instructor_email().to_owned(),
        },
        countdown: format_countdown(active.remaining_seconds()),
        low_time: settings.is_low_time(active.remaining_seconds()),
        position_label: format!("Question {} of {}", current + 1, progress.total),
        progress_percent: progress.percent_through(),
        question_label: format!("Question {}", current + 1),
        question_text,
        answer_text,
        answered: progress.answered,
        nav,
        primary: if progress.is_last_question() {
            PrimaryAction::SubmitTest
        } else {
            PrimaryAction::Next
        },
        previous_enabled: !progress.is_first_question(),
    }
}

fn map_submitted(done: &SubmittedSession) -> SubmittedVm {
    let submission = done.submission();
    SubmittedVm {
        title: "Test Submitted!",
        description: "Your responses have been recorded successfully",
        notice: "Redirecting to results page...",
        answered: submission.answered_count(),
        total: submission.questions_and_answers.len(),
    }
}

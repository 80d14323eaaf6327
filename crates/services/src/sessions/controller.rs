use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use insight_core::Clock;
use insight_core::model::{ResponseSubmission, Test, TestPayload, User};

use super::answers::AnswerStore;
use super::progress::SessionProgress;
use super::timer::{CountdownTimer, TimerTick};
use crate::error::SessionLoadError;

//
// ─── HANDOFF ───────────────────────────────────────────────────────────────────
//

/// Test passed from the catalog into a new session.
#[derive(Debug, Clone, PartialEq)]
pub enum TestHandoff {
    Payload(TestPayload),
    /// Raw payload text, decoded on load.
    Json(String),
}

impl TestHandoff {
    #[must_use]
    pub fn from_test(test: &Test) -> Self {
        Self::Payload(TestPayload::from(test))
    }

    fn into_test(self) -> Result<Test, SessionLoadError> {
        let payload = match self {
            TestHandoff::Payload(payload) => payload,
            TestHandoff::Json(raw) => serde_json::from_str(&raw)
                .map_err(|e| SessionLoadError::Malformed(e.to_string()))?,
        };
        Ok(Test::from_payload(payload)?)
    }
}

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    Timeout,
}

/// Outcome of handing the submission to the response sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffStatus {
    Pending,
    Delivered,
    Failed,
}

/// A session that is counting down and accepting answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    test: Test,
    current: usize,
    answers: AnswerStore,
    timer: CountdownTimer,
    started_at: DateTime<Utc>,
}

impl ActiveSession {
    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        self.timer.remaining()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.answers.len(),
            current: self.current,
            answered: self.answers.answered_count(),
            remaining_secs: self.timer.remaining(),
        }
    }
}

/// A finished session. Nothing leaves this state.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedSession {
    test: Test,
    submission: ResponseSubmission,
    trigger: SubmitTrigger,
    submitted_at: DateTime<Utc>,
    handoff: HandoffStatus,
}

impl SubmittedSession {
    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn submission(&self) -> &ResponseSubmission {
        &self.submission
    }

    #[must_use]
    pub fn trigger(&self) -> SubmitTrigger {
        self.trigger
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn handoff(&self) -> HandoffStatus {
        self.handoff
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Active(ActiveSession),
    Submitted(SubmittedSession),
    NotFound(SessionLoadError),
}

/// Result of feeding one timer tick to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionTick {
    Counting { remaining: u64 },
    /// Time ran out and the session was submitted on this tick.
    Expired(ResponseSubmission),
    Inactive,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns one test-taking session from load to submission.
///
/// Every mutation is synchronous; the first transition into `Submitted`
/// wins and later submit requests or ticks are ignored.
#[derive(Debug, Clone)]
pub struct SessionController {
    user: User,
    clock: Clock,
    state: SessionState,
}

impl SessionController {
    #[must_use]
    pub fn new(user: User, clock: Clock) -> Self {
        Self {
            user,
            clock,
            state: SessionState::Loading,
        }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::Active(active) => Some(active),
            _ => None,
        }
    }

    #[must_use]
    pub fn submitted(&self) -> Option<&SubmittedSession> {
        match &self.state {
            SessionState::Submitted(done) => Some(done),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted().is_some()
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.state, SessionState::NotFound(_))
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.active().map(ActiveSession::current_index)
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.active().map(ActiveSession::remaining_seconds)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.active().map(ActiveSession::progress)
    }

    /// Start the session from a catalog handoff.
    ///
    /// A missing or undecodable handoff moves the session to `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoadError` describing why the session is not active.
    pub fn load(&mut self, handoff: Option<TestHandoff>) -> Result<(), SessionLoadError> {
        if !matches!(self.state, SessionState::Loading) {
            return Err(SessionLoadError::AlreadyLoaded);
        }

        let loaded = handoff
            .ok_or(SessionLoadError::Missing)
            .and_then(TestHandoff::into_test);

        match loaded {
            Ok(test) => {
                info!(
                    test_id = %test.id(),
                    questions = test.question_count(),
                    minutes = test.duration_minutes(),
                    "session loaded"
                );
                self.state = SessionState::Active(ActiveSession {
                    answers: AnswerStore::from_questions(test.questions()),
                    timer: CountdownTimer::from_minutes(test.duration_minutes()),
                    current: 0,
                    started_at: self.clock.now(),
                    test,
                });
                Ok(())
            }
            Err(err) => {
                warn!(reason = %err, "test not found for session");
                self.state = SessionState::NotFound(err.clone());
                Err(err)
            }
        }
    }

    /// Jump to `index`. Out-of-range indices leave the position unchanged.
    pub fn go_to_question(&mut self, index: usize) -> bool {
        let SessionState::Active(active) = &mut self.state else {
            return false;
        };
        if index >= active.answers.len() {
            return false;
        }
        active.current = index;
        true
    }

    /// Step forward; does not wrap past the last question.
    pub fn next(&mut self) -> bool {
        match self.current_index() {
            Some(current) => self.go_to_question(current + 1),
            None => false,
        }
    }

    /// Step back; does not wrap past the first question.
    pub fn previous(&mut self) -> bool {
        match self.current_index() {
            Some(current) if current > 0 => self.go_to_question(current - 1),
            _ => false,
        }
    }

    /// Store `text` for the current question and return its index.
    pub fn set_answer(&mut self, text: impl Into<String>) -> Option<usize> {
        let SessionState::Active(active) = &mut self.state else {
            return None;
        };
        let index = active.current;
        active.answers.set_answer(index, text).then_some(index)
    }

    pub fn set_answer_at(&mut self, index: usize, text: impl Into<String>) -> bool {
        let SessionState::Active(active) = &mut self.state else {
            return false;
        };
        active.answers.set_answer(index, text)
    }

    /// Feed one elapsed second to the countdown.
    ///
    /// On expiry the session is submitted in the same step.
    pub fn tick(&mut self) -> SessionTick {
        let SessionState::Active(active) = &mut self.state else {
            return SessionTick::Inactive;
        };
        match active.timer.tick() {
            TimerTick::Counting { remaining } => SessionTick::Counting { remaining },
            TimerTick::Inactive => SessionTick::Inactive,
            TimerTick::Expired => {
                info!(test_id = %active.test.id(), "time expired");
                self.finish(SubmitTrigger::Timeout)
                    .map_or(SessionTick::Inactive, SessionTick::Expired)
            }
        }
    }

    /// Submit on the user's request. Returns `None` unless the session is active.
    pub fn submit(&mut self) -> Option<ResponseSubmission> {
        self.finish(SubmitTrigger::Manual)
    }

    /// Record how the hand-off of a submitted session went.
    pub fn record_handoff(&mut self, status: HandoffStatus) -> bool {
        let SessionState::Submitted(done) = &mut self.state else {
            return false;
        };
        done.handoff = status;
        true
    }

    fn finish(&mut self, trigger: SubmitTrigger) -> Option<ResponseSubmission> {
        let state = std::mem::replace(&mut self.state, SessionState::Loading);
        let SessionState::Active(mut active) = state else {
            debug!(?trigger, "submit ignored; session not active");
            self.state = state;
            return None;
        };
        active.timer.stop();

        let submission = ResponseSubmission {
            test_id: active.test.id().clone(),
            email: self.user.email().to_owned(),
            questions_and_answers: active.answers.snapshot(),
        };
        info!(
            test_id = %submission.test_id,
            ?trigger,
            answered = submission.answered_count(),
            "session submitted"
        );
        self.state = SessionState::Submitted(SubmittedSession {
            test: active.test,
            submission: submission.clone(),
            trigger,
            submitted_at: self.clock.now(),
            handoff: HandoffStatus::Pending,
        });
        Some(submission)
    }
}

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use insight_core::model::{ResponseSubmission, SessionSettings};
use storage::repository::ResponseSink;

use super::controller::{HandoffStatus, SessionController, SessionState, SessionTick, SubmitTrigger};
use super::navigation::{Destination, Navigator};

/// User input forwarded from the front end to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    GoTo(usize),
    Next,
    Previous,
    /// Answer text for the current question.
    Answer(String),
    AnswerAt(usize, String),
    Submit,
    Leave,
}

/// Notifications for whatever is rendering the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Ticked { remaining_secs: u64 },
    /// Sent once, when the remaining time first drops below the threshold.
    LowTime { remaining_secs: u64 },
    Moved { index: usize },
    AnswerSaved { index: usize },
    Submitted {
        trigger: SubmitTrigger,
        handoff: HandoffStatus,
    },
    Redirected(Destination),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    NotFound,
    /// The user left before submitting. Nothing was handed off.
    Abandoned,
    Submitted {
        submission: ResponseSubmission,
        trigger: SubmitTrigger,
        handoff: HandoffStatus,
    },
}

/// Drives a loaded session against a ticking clock and a command channel.
#[derive(Clone)]
pub struct SessionRunner {
    sink: Arc<dyn ResponseSink>,
    navigator: Arc<dyn Navigator>,
    settings: SessionSettings,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(
        sink: Arc<dyn ResponseSink>,
        navigator: Arc<dyn Navigator>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            sink,
            navigator,
            settings,
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Run the session until it is submitted or abandoned.
    ///
    /// The response sink is called at most once. A failed hand-off is logged
    /// and the user is still redirected to their results.
    pub async fn run(
        &self,
        mut controller: SessionController,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> SessionOutcome {
        let Some(test_id) = controller.active().map(|active| active.test().id().clone()) else {
            if let SessionState::NotFound(reason) = controller.state() {
                warn!(%reason, "no test to run");
            }
            self.redirect(Destination::TestsCatalog);
            return SessionOutcome::NotFound;
        };

        let period = self.settings.tick_interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let mut low_time_sent = false;
        if let Some(remaining) = controller.remaining_seconds() {
            self.check_low_time(remaining, &mut low_time_sent);
        }

        let (submission, trigger) = loop {
            tokio::select! {
                _ = ticker.tick() => match controller.tick() {
                    SessionTick::Counting { remaining } => {
                        self.emit(SessionEvent::Ticked { remaining_secs: remaining });
                        self.check_low_time(remaining, &mut low_time_sent);
                    }
                    SessionTick::Expired(submission) => {
                        self.emit(SessionEvent::Ticked { remaining_secs: 0 });
                        break (submission, SubmitTrigger::Timeout);
                    }
                    SessionTick::Inactive => {}
                },
                command = commands.recv() => match command {
                    None | Some(SessionCommand::Leave) => {
                        info!(%test_id, "session left without submitting");
                        return SessionOutcome::Abandoned;
                    }
                    Some(SessionCommand::Submit) => {
                        if let Some(submission) = controller.submit() {
                            break (submission, SubmitTrigger::Manual);
                        }
                    }
                    Some(command) => self.apply(&mut controller, command),
                },
            }
        };
        drop(ticker);

        let handoff = match self.sink.submit_response(&submission).await {
            Ok(()) => {
                info!(%test_id, "submission delivered");
                HandoffStatus::Delivered
            }
            Err(err) => {
                error!(%test_id, error = %err, "submission hand-off failed");
                HandoffStatus::Failed
            }
        };
        controller.record_handoff(handoff);
        self.emit(SessionEvent::Submitted { trigger, handoff });

        time::sleep(self.settings.redirect_delay()).await;
        self.redirect(Destination::Results);

        SessionOutcome::Submitted {
            submission,
            trigger,
            handoff,
        }
    }

    fn apply(&self, controller: &mut SessionController, command: SessionCommand) {
        match command {
            SessionCommand::GoTo(index) => {
                if controller.go_to_question(index) {
                    self.emit(SessionEvent::Moved { index });
                }
            }
            SessionCommand::Next => {
                if controller.next() {
                    self.emit_position(controller);
                }
            }
            SessionCommand::Previous => {
                if controller.previous() {
                    self.emit_position(controller);
                }
            }
            SessionCommand::Answer(text) => {
                if let Some(index) = controller.set_answer(text) {
                    self.emit(SessionEvent::AnswerSaved { index });
                }
            }
            SessionCommand::AnswerAt(index, text) => {
                if controller.set_answer_at(index, text) {
                    self.emit(SessionEvent::AnswerSaved { index });
                }
            }
            SessionCommand::Submit | SessionCommand::Leave => {}
        }
    }

    fn emit_position(&self, controller: &SessionController) {
        if let Some(index) = controller.current_index() {
            self.emit(SessionEvent::Moved { index });
        }
    }

    fn check_low_time(&self, remaining: u64, sent: &mut bool) {
        if !*sent && self.settings.is_low_time(remaining) {
            *sent = true;
            self.emit(SessionEvent::LowTime {
                remaining_secs: remaining,
            });
        }
    }

    fn redirect(&self, destination: Destination) {
        self.navigator.navigate(destination);
        self.emit(SessionEvent::Redirected(destination));
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            // A closed receiver only means nobody is rendering.
            let _ = events.send(event);
        }
    }
}


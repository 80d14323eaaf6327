mod answers;
mod controller;
mod navigation;
mod progress;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionLoadError;
pub use answers::AnswerStore;
pub use controller::{
    ActiveSession, HandoffStatus, SessionController, SessionState, SessionTick, SubmitTrigger,
    SubmittedSession, TestHandoff,
};
pub use navigation::{Destination, Navigator};
pub use progress::SessionProgress;
pub use timer::{CountdownTimer, TimerState, TimerTick};
pub use workflow::{SessionCommand, SessionEvent, SessionOutcome, SessionRunner};

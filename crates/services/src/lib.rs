#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod sessions;

pub use insight_core::Clock;

pub use catalog::{CatalogQuery, CatalogService, DifficultyFilter, SortKey};
pub use error::{CatalogError, SessionLoadError};
pub use sessions::{
    Destination, HandoffStatus, Navigator, SessionCommand, SessionController, SessionEvent,
    SessionOutcome, SessionRunner, SubmitTrigger, TestHandoff,
};

mod answer;
mod assessment;
mod difficulty;
mod ids;
mod response;
mod settings;
mod user;

pub use answer::{AnswerSlot, ResponseSubmission};
pub use assessment::{QuestionAnswer, Test, TestError, TestPayload};
pub use difficulty::{Difficulty, DifficultyError};
pub use ids::{ResponseId, TestId};
pub use response::{GradedAnswer, Response, ResponseError, ResponsePayload};
pub use settings::{SessionSettings, SettingsError};
pub use user::{User, UserError};

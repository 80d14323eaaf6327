mod catalog_vm;
mod result_vm;
mod session_vm;
pub mod time_fmt;

pub use catalog_vm::{ResultCardVm, TestCardVm, average_label, map_result_cards, map_test_cards};
pub use result_vm::{NO_ANSWER, QuestionDetailVm, ResultDetailVm, map_result_detail};
pub use session_vm::{
    ActiveSessionVm, NavState, PrimaryAction, QuestionNavVm, SessionHeaderVm, SessionScreenVm,
    SubmittedVm, map_session_screen,
};

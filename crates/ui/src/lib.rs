//! Headless view models for the assessment screens.

pub mod report;
pub mod vm;

pub use report::TextReport;

//! Adapters owned by the commissioner binary.

pub mod logging_prompter;

pub use logging_prompter::LoggingUserPrompter;

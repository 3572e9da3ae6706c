//! Terminal front end: one-shot reports, the interactive shell and setup

pub mod report;
pub mod setup;
pub mod shell;
pub mod ui;

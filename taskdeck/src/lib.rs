//! `Taskdeck`: session-scoped personal task tracker library.

pub mod clock;
pub mod config;
pub mod session;
pub mod shell;
pub mod tasks;

//! Bridge between the UI thread and the async deploy worker.

pub mod commands;
pub mod runtime;

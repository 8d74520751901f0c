//! UI layer: the eframe app shell and the code editor's line layout.

pub mod app;
pub mod line_indent;

pub use app::{DemoEditorApp, StartupConfig};

//! Controller layer: editor/file-browser state machines, the owning session, and
//! command orchestration towards the deploy worker.

pub mod editor;
pub mod events;
pub mod file_browser;
pub mod orchestration;
pub mod session;

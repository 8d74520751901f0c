//! Backend commands queued from UI to backend worker.

use shared::domain::Project;

pub enum BackendCommand {
    /// Deploy the project as it was when the button was pressed.
    Deploy { project: Project },
}

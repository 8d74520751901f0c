//! File selection and key-binding mode for the code editor surface.
//!
//! The surface never owns the project: edits are returned as a new [`Project`]
//! for the session to store.

use shared::domain::{EditorMode, Project, DEFAULT_SELECTED_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    /// Standard mode switched to power-user key bindings.
    EnteredPowerUserMode,
    /// Power-user bindings own the escape key; nothing else happens.
    Remapped,
    /// The text surface was not focused.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSurface {
    selected_path: String,
    mode: EditorMode,
}

impl EditorSurface {
    pub fn new(project: &Project) -> Self {
        let selected_path = if project.contains(DEFAULT_SELECTED_PATH) {
            DEFAULT_SELECTED_PATH.to_string()
        } else {
            project.first_path().unwrap_or_default().to_string()
        };
        Self {
            selected_path,
            mode: EditorMode::Standard,
        }
    }

    pub fn selected_path(&self) -> &str {
        &self.selected_path
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn active_content<'a>(&self, project: &'a Project) -> Option<&'a str> {
        project.get(&self.selected_path)
    }

    /// Unknown paths are ignored; returns whether the selection changed.
    pub fn select_file(&mut self, project: &Project, path: &str) -> bool {
        if !project.contains(path) {
            tracing::debug!(path, "ignoring selection of unknown file");
            return false;
        }
        if self.selected_path == path {
            return false;
        }
        self.selected_path = path.to_string();
        true
    }

    pub fn edit_active_file(&self, project: &Project, new_content: impl Into<String>) -> Option<Project> {
        match project.set(&self.selected_path, new_content) {
            Ok(next) => Some(next),
            Err(err) => {
                tracing::debug!(error = %err, "dropping edit without a valid selection");
                None
            }
        }
    }

    /// Keeps the selection pointing at a file that exists in `project`.
    pub fn revalidate(&mut self, project: &Project) {
        if project.contains(&self.selected_path) {
            return;
        }
        if let Some(first) = project.first_path() {
            self.selected_path = first.to_string();
        }
    }

    /// Returns true only on the Standard -> PowerUserKeybinding transition.
    pub fn enter_power_user_mode(&mut self) -> bool {
        if self.mode.is_power_user() {
            return false;
        }
        self.mode = EditorMode::PowerUserKeybinding;
        tracing::info!("editor switched to power-user key bindings");
        true
    }

    pub fn handle_escape(&mut self, text_focused: bool) -> EscapeAction {
        if !text_focused {
            return EscapeAction::Ignored;
        }
        if self.enter_power_user_mode() {
            EscapeAction::EnteredPowerUserMode
        } else {
            EscapeAction::Remapped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_default_path_in_standard_mode() {
        let surface = EditorSurface::new(&Project::seed());
        assert_eq!(surface.selected_path(), "pages/index.js");
        assert_eq!(surface.mode(), EditorMode::Standard);
    }

    #[test]
    fn falls_back_to_first_file_without_default_path() {
        let project = Project::new("p", [("b.js", ""), ("a.js", "")]).expect("project");
        assert_eq!(EditorSurface::new(&project).selected_path(), "b.js");
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let project = Project::seed();
        let mut surface = EditorSurface::new(&project);
        assert!(!surface.select_file(&project, "missing.js"));
        assert_eq!(surface.selected_path(), "pages/index.js");
    }

    #[test]
    fn edits_survive_switching_files() {
        let mut project = Project::seed();
        let mut surface = EditorSurface::new(&project);

        project = surface
            .edit_active_file(&project, "edited index")
            .expect("edit index");
        assert!(surface.select_file(&project, "api/date.js"));
        project = surface
            .edit_active_file(&project, "edited date")
            .expect("edit date");
        assert!(surface.select_file(&project, "pages/index.js"));

        assert_eq!(surface.active_content(&project), Some("edited index"));
        assert_eq!(project.get("api/date.js"), Some("edited date"));
        assert_eq!(project.get("package.json"), Project::seed().get("package.json"));
    }

    #[test]
    fn edit_does_not_touch_callers_project() {
        let project = Project::seed();
        let surface = EditorSurface::new(&project);
        let next = surface.edit_active_file(&project, "x").expect("edit");
        assert_eq!(next.get("pages/index.js"), Some("x"));
        assert_eq!(project, Project::seed());
    }

    #[test]
    fn revalidate_moves_stale_selection_to_first_file() {
        let seed = Project::seed();
        let mut surface = EditorSurface::new(&seed);
        let other = Project::new("p", [("index.html", "<p/>")]).expect("project");

        assert_eq!(surface.edit_active_file(&other, "lost"), None);
        surface.revalidate(&other);
        assert_eq!(surface.selected_path(), "index.html");
    }

    #[test]
    fn power_user_mode_is_one_way_and_idempotent() {
        let mut surface = EditorSurface::new(&Project::seed());

        assert!(surface.enter_power_user_mode());
        assert!(!surface.enter_power_user_mode());
        assert_eq!(surface.mode(), EditorMode::PowerUserKeybinding);

        assert_eq!(surface.handle_escape(true), EscapeAction::Remapped);
        assert_eq!(surface.mode(), EditorMode::PowerUserKeybinding);
    }

    #[test]
    fn escape_only_switches_mode_when_focused() {
        let mut surface = EditorSurface::new(&Project::seed());
        assert_eq!(surface.handle_escape(false), EscapeAction::Ignored);
        assert_eq!(surface.mode(), EditorMode::Standard);

        assert_eq!(
            surface.handle_escape(true),
            EscapeAction::EnteredPowerUserMode
        );
        assert_eq!(surface.handle_escape(true), EscapeAction::Remapped);
    }
}

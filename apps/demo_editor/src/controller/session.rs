//! The container that owns the canonical project and mirrors deploy state for rendering.

use client_core::{DeployOutcome, DeployStatus};
use shared::{
    domain::{EditorMode, Project},
    protocol::DeployRequest,
};

use super::{
    editor::{EditorSurface, EscapeAction},
    file_browser::{FileBrowser, FileBrowserLayout},
};

#[derive(Debug, Clone)]
pub struct DemoSession {
    project: Project,
    surface: EditorSurface,
    browser: FileBrowser,
    deploy: DeployStatus,
    error_banner: Option<String>,
}

impl Default for DemoSession {
    fn default() -> Self {
        Self::new(Project::seed())
    }
}

impl DemoSession {
    pub fn new(project: Project) -> Self {
        let surface = EditorSurface::new(&project);
        Self {
            project,
            surface,
            browser: FileBrowser::default(),
            deploy: DeployStatus::default(),
            error_banner: None,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn selected_path(&self) -> &str {
        self.surface.selected_path()
    }

    pub fn active_content(&self) -> &str {
        self.surface.active_content(&self.project).unwrap_or_default()
    }

    pub fn mode(&self) -> EditorMode {
        self.surface.mode()
    }

    pub fn layout(&self) -> FileBrowserLayout {
        self.browser.layout()
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn is_deploying(&self) -> bool {
        self.deploy.busy
    }

    pub fn deploy_outcome(&self) -> &DeployOutcome {
        &self.deploy.outcome
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    /// Body that a deploy would send right now.
    pub fn request_body(&self) -> String {
        DeployRequest::from_project(&self.project).to_body()
    }

    /// Replaces the active file's content. Editing dismisses a visible error banner.
    pub fn edit_active_file(&mut self, content: impl Into<String>) -> bool {
        let Some(next) = self.surface.edit_active_file(&self.project, content) else {
            return false;
        };
        self.project = next;
        self.surface.revalidate(&self.project);
        self.error_banner = None;
        true
    }

    pub fn select_file(&mut self, path: &str) -> bool {
        self.surface.select_file(&self.project, path)
    }

    pub fn pick_from_drawer(&mut self, path: &str) {
        self.browser
            .pick_from_drawer(&mut self.surface, &self.project, path);
    }

    pub fn toggle_drawer(&mut self) {
        self.browser.toggle_drawer();
    }

    pub fn observe_width(&mut self, width: f32) {
        self.browser.observe_width(width);
    }

    pub fn handle_escape(&mut self, text_focused: bool) -> EscapeAction {
        self.surface.handle_escape(text_focused)
    }

    /// Snapshot for a new deploy, or `None` while one is already running.
    pub fn begin_deploy(&mut self) -> Option<Project> {
        if self.deploy.busy {
            return None;
        }
        self.error_banner = None;
        Some(self.project.clone())
    }

    pub fn apply_deploy_status(&mut self, status: DeployStatus) {
        match &status.outcome {
            DeployOutcome::Failed(message) => self.error_banner = Some(message.clone()),
            DeployOutcome::InFlight | DeployOutcome::Redirecting(_) => self.error_banner = None,
            DeployOutcome::Idle => {}
        }
        self.deploy = status;
    }
}

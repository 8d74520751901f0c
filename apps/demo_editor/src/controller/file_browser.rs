//! Responsive file list: persistent on wide viewports, a toggled drawer on narrow ones.

use shared::domain::{Project, ViewportClass};

use super::editor::EditorSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileBrowserLayout {
    /// File list always visible next to the editor.
    Persistent,
    /// Drawer toggle shown; the editor fills the body.
    DrawerClosed,
    /// Drawer toggle shown; the file list replaces the editor.
    DrawerOpen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileBrowser {
    viewport: ViewportClass,
    drawer_open: bool,
}

impl Default for FileBrowser {
    fn default() -> Self {
        Self {
            viewport: ViewportClass::Wide,
            drawer_open: false,
        }
    }
}

impl FileBrowser {
    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// Call on every width observation. A wide viewport always forces the drawer shut.
    pub fn observe_width(&mut self, width: f32) -> ViewportClass {
        let class = ViewportClass::from_width(width);
        if class != self.viewport {
            tracing::debug!(?class, width, "viewport class changed");
        }
        self.viewport = class;
        if class == ViewportClass::Wide {
            self.drawer_open = false;
        }
        class
    }

    pub fn toggle_drawer(&mut self) {
        if self.viewport.is_narrow() {
            self.drawer_open = !self.drawer_open;
        }
    }

    pub fn layout(&self) -> FileBrowserLayout {
        match (self.viewport, self.drawer_open) {
            (ViewportClass::Wide, _) => FileBrowserLayout::Persistent,
            (ViewportClass::Narrow, false) => FileBrowserLayout::DrawerClosed,
            (ViewportClass::Narrow, true) => FileBrowserLayout::DrawerOpen,
        }
    }

    pub fn drawer_title(&self) -> &'static str {
        if self.drawer_open {
            "Close File Browser"
        } else {
            "File Browser"
        }
    }

    /// Selects `path` and closes the drawer in the same update.
    pub fn pick_from_drawer(&mut self, surface: &mut EditorSurface, project: &Project, path: &str) {
        surface.select_file(project, path);
        self.drawer_open = false;
    }
}

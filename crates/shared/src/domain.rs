use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

pub const SEED_PROJECT_NAME: &str = "simple-now-deployment";
pub const DEFAULT_SELECTED_PATH: &str = "pages/index.js";

/// Widths strictly below this value are treated as a narrow (mobile) viewport.
pub const NARROW_VIEWPORT_MAX_WIDTH: f32 = 700.0;

const SEED_FILES: [(&str, &str); 3] = [
    (
        "pages/index.js",
        "export default () => (\n  <section>\n    <h1>Welcome to Now!</h1>\n    <p>To test the API, <a href=\"/api/date\">check todays date</a>.</p>\n  </section> \n);",
    ),
    (
        "api/date.js",
        "module.exports = (req, res) => {\n  res.send(new Date());\n};",
    ),
    (
        "package.json",
        "{\n  \"scripts\": {\n    \"build\": \"next build\"\n  },\n  \"dependencies\": {\n    \"next\": \"^9.0.1\",\n    \"react\": \"^16.8.6\",\n    \"react-dom\": \"^16.8.6\"\n  }\n}",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub path: String,
    pub content: String,
}

/// Ordered multi-file project. File order is insertion order and is observable:
/// it drives both the file list and the deploy payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    files: Vec<ProjectFile>,
}

impl Project {
    pub fn new<P, C>(
        name: impl Into<String>,
        files: impl IntoIterator<Item = (P, C)>,
    ) -> Result<Self, ProjectError>
    where
        P: Into<String>,
        C: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for (path, content) in files {
            let path = path.into();
            if !is_relative_posix_path(&path) {
                return Err(ProjectError::InvalidPath(path));
            }
            if !seen.insert(path.clone()) {
                return Err(ProjectError::DuplicatePath(path));
            }
            collected.push(ProjectFile {
                path,
                content: content.into(),
            });
        }

        if collected.is_empty() {
            return Err(ProjectError::Empty);
        }

        Ok(Self {
            name: name.into(),
            files: collected,
        })
    }

    /// The fixed demo project every editor session starts from.
    pub fn seed() -> Self {
        Self {
            name: SEED_PROJECT_NAME.to_string(),
            files: SEED_FILES
                .iter()
                .map(|(path, content)| ProjectFile {
                    path: (*path).to_string(),
                    content: (*content).to_string(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|file| file.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|file| file.path == path)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|file| file.path == path)
            .map(|file| file.content.as_str())
    }

    pub fn first_path(&self) -> Option<&str> {
        self.files.first().map(|file| file.path.as_str())
    }

    /// Returns a copy of the project with one file's content replaced.
    /// Never creates files; an unknown path is reported instead.
    pub fn set(&self, path: &str, content: impl Into<String>) -> Result<Self, ProjectError> {
        let Some(index) = self.files.iter().position(|file| file.path == path) else {
            return Err(ProjectError::UnknownPath(path.to_string()));
        };

        let mut next = self.clone();
        next.files[index].content = content.into();
        Ok(next)
    }
}

fn is_relative_posix_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Standard,
    PowerUserKeybinding,
}

impl EditorMode {
    pub fn is_power_user(self) -> bool {
        self == EditorMode::PowerUserKeybinding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    Narrow,
    Wide,
}

impl ViewportClass {
    pub fn from_width(width: f32) -> Self {
        if width < NARROW_VIEWPORT_MAX_WIDTH {
            ViewportClass::Narrow
        } else {
            ViewportClass::Wide
        }
    }

    pub fn is_narrow(self) -> bool {
        self == ViewportClass::Narrow
    }
}

//! Service configuration.

use crate::persist::PROJECT_EXTENSION;
use std::path::PathBuf;

/// Environment variable overriding the projects directory.
pub const PROJECTS_DIR_ENV: &str = "STORYLOOM_PROJECTS_DIR";

/// Default directory for new projects, relative to the working directory.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// Configuration for a [`ProjectService`](crate::ProjectService).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Where projects without a file path are saved.
    pub projects_dir: PathBuf,

    /// Extension for project files, without the dot.
    pub file_extension: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
            file_extension: PROJECT_EXTENSION.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the projects directory taken from
    /// `STORYLOOM_PROJECTS_DIR` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(PROJECTS_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.projects_dir = PathBuf::from(dir);
            }
        }
        config
    }

    /// Set the projects directory.
    pub fn with_projects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.projects_dir = dir.into();
        self
    }

    /// Set the file extension.
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }
}

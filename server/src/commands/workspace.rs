//! Per-command working directories.
//!
//! Every registered command gets `<root>/<command>` on disk, served publicly at
//! `<public_prefix>/<command>`.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::RegistrationError;

/// Root of the per-command working directories.
#[derive(Debug, Clone)]
pub struct CommandWorkspace {
    root: PathBuf,
    public_prefix: String,
}

/// Filesystem and public locations of one command's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDirs {
    pub fs_path: PathBuf,
    pub public_path: String,
}

impl CommandWorkspace {
    /// `public_prefix` must start with `/` and carry no trailing slash.
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Ensure the command's directory exists. Idempotent.
    pub fn prepare(&self, command: &str) -> Result<CommandDirs, RegistrationError> {
        let fs_path = self.root.join(command);
        std::fs::create_dir_all(&fs_path).map_err(|source| RegistrationError::Workspace {
            path: fs_path.clone(),
            source,
        })?;
        debug!(command, path = %fs_path.display(), "Prepared command working directory");

        Ok(CommandDirs {
            fs_path,
            public_path: format!("{}/{command}", self.public_prefix),
        })
    }
}

use crate::error::VersionError;
use crate::project::FileSet;
use crate::repo::Repository;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// host state kept between invocations: the file set and its repository
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub files: FileSet,

    /// absent until `init`
    #[serde(default)]
    pub repository: Option<Repository>,

    #[serde(skip)]
    path: PathBuf,
}

impl Workspace {
    /// load the workspace file, or start an empty workspace if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let mut workspace = match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str::<Self>(&data)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        workspace.path = path.to_path_buf();
        Ok(workspace)
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode workspace")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    pub fn repository(&self) -> Result<&Repository, VersionError> {
        self.repository
            .as_ref()
            .filter(|r| r.is_initialized())
            .ok_or(VersionError::NotInitialized)
    }

    /// replace the file set with a loaded project; history does not carry over
    pub fn replace_files(&mut self, files: FileSet) {
        self.files = files;
        self.repository = None;
    }
}

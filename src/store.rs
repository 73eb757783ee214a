use crate::constants::{STORE_DIR, STORE_FILE};
use crate::project::{FileSet, ProjectFile};
use crate::warning;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// a named project kept in the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    pub id: String,
    pub name: String,
    /// milliseconds since the unix epoch
    pub last_modified: i64,
    pub files: Vec<ProjectFile>,
}

impl SavedProject {
    pub fn file_set(&self) -> FileSet {
        self.files.iter().cloned().collect()
    }
}

/// flat list of saved projects in a single json file
///
/// projects are upserted by name and deleted by id
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// the store under the platform data directory
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir().context("could not determine data directory")?;
        Ok(Self::open(dir.join(STORE_DIR).join(STORE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// all projects, newest first; an unreadable store reads as empty
    pub fn list(&self) -> Vec<SavedProject> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warning!("failed to read project store: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(projects) => projects,
            Err(e) => {
                warning!("failed to parse project store: {}", e);
                Vec::new()
            }
        }
    }

    pub fn load(&self, id: &str) -> Option<SavedProject> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// save under `name`, replacing a project of the same name but keeping its id
    pub fn save(&self, name: &str, files: &FileSet) -> Result<SavedProject> {
        let mut projects = self.list();
        let now = chrono::Utc::now().timestamp_millis();

        let mut id = now;
        while projects.iter().any(|p| p.id == id.to_string()) {
            id += 1;
        }

        let mut project = SavedProject {
            id: id.to_string(),
            name: name.to_string(),
            last_modified: now,
            files: files.as_slice().to_vec(),
        };

        match projects.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                project.id = existing.id.clone();
                *existing = project.clone();
            }
            None => projects.push(project.clone()),
        }

        projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        self.write(&projects)?;
        Ok(project)
    }

    /// remove by id and return what is left
    pub fn delete(&self, id: &str) -> Result<Vec<SavedProject>> {
        let mut projects = self.list();
        projects.retain(|p| p.id != id);
        self.write(&projects)?;
        Ok(projects)
    }

    fn write(&self, projects: &[SavedProject]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(projects).context("failed to encode projects")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

use crate::changeset::{ChangeKind, FileStatus};
use crate::constants::{BRANCH_NAME, COMMIT_ID_LENGTH};
use crate::error::VersionError;
use crate::project::{FileSet, ProjectFile};
use serde::{Deserialize, Serialize};

/// an immutable point in history with a full copy of the files it captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: String,
    /// milliseconds since the unix epoch
    pub timestamp: i64,
    pub parent_id: Option<String>,
    pub files_snapshot: Vec<ProjectFile>,
}

/// single-branch snapshot history plus the staged file names
///
/// commits are stored newest-first, so HEAD is always `commits[0]` and every
/// commit's parent is the entry after it. this is also the on-disk order.
/// all operations are pure: they return a new repository value and never
/// touch `self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    initialized: bool,
    branch_name: String,
    commits: Vec<Commit>,
    staged_file_names: Vec<String>,
}

impl Repository {
    /// a fresh repository with no history; any previous value is simply dropped
    pub fn initialize() -> Self {
        Self {
            initialized: true,
            branch_name: BRANCH_NAME.to_string(),
            commits: Vec::new(),
            staged_file_names: Vec::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn head(&self) -> Option<&Commit> {
        self.commits.first()
    }

    pub fn head_snapshot(&self) -> &[ProjectFile] {
        self.head().map_or(&[], |c| c.files_snapshot.as_slice())
    }

    /// history newest-first (HEAD first)
    pub fn log(&self) -> impl Iterator<Item = &Commit> {
        self.commits.iter()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn find(&self, id: &str) -> Result<&Commit, VersionError> {
        self.commits
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| VersionError::UnknownCommit(id.to_string()))
    }

    pub fn staged(&self) -> &[String] {
        &self.staged_file_names
    }

    pub fn is_staged(&self, name: &str) -> bool {
        self.staged_file_names.iter().any(|n| n == name)
    }

    /// add names to the staging set; already staged names are ignored
    pub fn stage<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut next = self.clone();
        for name in names {
            let name = name.as_ref();
            if !next.is_staged(name) {
                next.staged_file_names.push(name.to_string());
            }
        }
        next
    }

    /// stage every name that currently has a status entry
    pub fn stage_all(&self, files: &FileSet) -> Self {
        let names: Vec<String> = compute_status(files, self)
            .into_iter()
            .map(|s| s.file_name)
            .collect();
        self.stage(&names)
    }

    pub fn unstage<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut next = self.clone();
        next.staged_file_names
            .retain(|staged| !names.iter().any(|n| n.as_ref() == staged));
        next
    }

    pub fn ensure_staged(&self) -> Result<(), VersionError> {
        if self.staged_file_names.is_empty() {
            return Err(VersionError::NoStagedChanges);
        }
        Ok(())
    }

    /// record the staged files as a new HEAD
    ///
    /// the snapshot starts from HEAD's; each staged name is dropped and then
    /// re-added from `files` if it still exists there, so a staged name that
    /// has disappeared from the file set becomes a deletion. message and
    /// author are stored verbatim.
    pub fn commit(&self, files: &FileSet, message: &str, author: &str) -> Result<Self, VersionError> {
        self.ensure_staged()?;

        let mut snapshot = self.head_snapshot().to_vec();
        for name in &self.staged_file_names {
            snapshot.retain(|f| &f.name != name);
            if let Some(file) = files.get(name) {
                snapshot.push(file.clone());
            }
        }

        let commit = Commit {
            id: self.unused_id(),
            message: message.to_string(),
            author: author.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            parent_id: self.head().map(|c| c.id.clone()),
            files_snapshot: snapshot,
        };

        let mut next = self.clone();
        next.commits.insert(0, commit);
        next.staged_file_names.clear();
        Ok(next)
    }

    fn unused_id(&self) -> String {
        loop {
            let id = short_id();
            if self.find(&id).is_err() {
                return id;
            }
        }
    }
}

/// short opaque commit token, unique enough for a session
fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(COMMIT_ID_LENGTH);
    id
}

/// diff the file set against HEAD's snapshot by name and full content
///
/// added and modified entries come first in file set order, followed by
/// deletions in snapshot order; unchanged files produce no entry
pub fn compute_status(files: &FileSet, repo: &Repository) -> Vec<FileStatus> {
    let head = repo.head_snapshot();
    let mut statuses = Vec::new();

    for file in files {
        match head.iter().find(|h| h.name == file.name) {
            None => statuses.push(FileStatus::new(&file.name, ChangeKind::Added)),
            Some(h) if h.content != file.content => {
                statuses.push(FileStatus::new(&file.name, ChangeKind::Modified));
            }
            Some(_) => {}
        }
    }

    for head_file in head {
        if !files.contains(&head_file.name) {
            statuses.push(FileStatus::new(&head_file.name, ChangeKind::Deleted));
        }
    }

    statuses
}

#[cfg(test)]
mod tests;

use serde::Serialize;

/// how a file differs from HEAD's snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// represents a single file change with its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub file_name: String,
    pub status: ChangeKind,
}

impl FileStatus {
    pub fn new(file_name: impl Into<String>, status: ChangeKind) -> Self {
        Self {
            file_name: file_name.into(),
            status,
        }
    }
}

/// the status list split by staging, in status order
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub staged: Vec<FileStatus>,
    pub unstaged: Vec<FileStatus>,
}

impl ChangeSet {
    pub fn partition(statuses: Vec<FileStatus>, staged_names: &[String]) -> Self {
        let (staged, unstaged) = statuses
            .into_iter()
            .partition(|s| staged_names.contains(&s.file_name));
        Self { staged, unstaged }
    }

    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty()
    }
}

pub fn status_char(kind: ChangeKind) -> char {
    match kind {
        ChangeKind::Added => 'A',
        ChangeKind::Modified => 'M',
        ChangeKind::Deleted => 'D',
    }
}

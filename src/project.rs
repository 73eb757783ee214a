use serde::{Deserialize, Serialize};
use std::path::Path;

/// language tag carried by every project file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Html,
    Css,
    Javascript,
    Typescript,
    Python,
    Json,
    Markdown,
    #[default]
    #[serde(other)]
    Other,
}

impl FileType {
    /// infer the language tag from a file name's extension
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        match ext.as_deref() {
            Some("html" | "htm") => Self::Html,
            Some("css") => Self::Css,
            Some("js" | "mjs") => Self::Javascript,
            Some("ts") => Self::Typescript,
            Some("py") => Self::Python,
            Some("json") => Self::Json,
            Some("md") => Self::Markdown,
            _ => Self::Other,
        }
    }
}

/// a single named file; binary assets carry base64 content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub language: FileType,
}

impl ProjectFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let language = FileType::from_name(&name);
        Self {
            name,
            content: content.into(),
            language,
        }
    }
}

/// ordered set of project files, unique by name
///
/// serialised as a plain list; a list with repeated names loads with the
/// later entry replacing the earlier one in place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProjectFile>", into = "Vec<ProjectFile>")]
pub struct FileSet {
    files: Vec<ProjectFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ProjectFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_slice(&self) -> &[ProjectFile] {
        &self.files
    }

    /// replace an existing file in place, or append a new one
    pub fn upsert(&mut self, file: ProjectFile) {
        match self.files.iter_mut().find(|f| f.name == file.name) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    /// upsert a batch of generated files, in batch order
    pub fn merge(&mut self, files: impl IntoIterator<Item = ProjectFile>) {
        for file in files {
            self.upsert(file);
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ProjectFile> {
        let index = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.remove(index))
    }
}

impl FromIterator<ProjectFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = ProjectFile>>(iter: I) -> Self {
        let mut set = Self::new();
        set.merge(iter);
        set
    }
}

impl From<Vec<ProjectFile>> for FileSet {
    fn from(files: Vec<ProjectFile>) -> Self {
        files.into_iter().collect()
    }
}

impl From<FileSet> for Vec<ProjectFile> {
    fn from(set: FileSet) -> Self {
        set.files
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a ProjectFile;
    type IntoIter = std::slice::Iter<'a, ProjectFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests;

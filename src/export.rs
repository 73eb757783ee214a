use crate::compose::{self, PreviewOptions};
use crate::error::ComposeError;
use crate::project::FileSet;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Seek, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// the merged document for download; same pipeline as the preview with
/// debug and mobile emulation off
pub fn single_document(files: &FileSet) -> Result<String, ComposeError> {
    compose::compose(files, PreviewOptions::default())
}

/// archive entry name for a project file
fn entry_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// write one archive entry per file with its raw content
pub fn write_zip<W: Write + Seek>(files: &FileSet, writer: W, show_progress: bool) -> Result<W> {
    let progress = if show_progress {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30} {pos}/{len} {msg}")
                .expect("invalid progress template"),
        );
        Some(bar)
    } else {
        None
    };

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    for file in files {
        if let Some(bar) = &progress {
            bar.set_message(file.name.clone());
        }
        zip.start_file(entry_name(&file.name), options)
            .with_context(|| format!("failed to add {} to archive", file.name))?;
        zip.write_all(file.content.as_bytes())
            .with_context(|| format!("failed to write {} to archive", file.name))?;
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    zip.finish().context("failed to finish archive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectFile;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    #[test]
    fn test_zip_has_one_entry_per_file() {
        let files: FileSet = [
            ProjectFile::new("/index.html", "<body></body>"),
            ProjectFile::new("css/style.css", "p {}"),
            ProjectFile::new("logo.png", "AAAA"),
        ]
        .into_iter()
        .collect();

        let cursor = write_zip(&files, Cursor::new(Vec::new()), false).unwrap();
        let mut archive = ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 3);

        let mut content = String::new();
        archive
            .by_name("index.html")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<body></body>");

        // raw file set, no asset decoding
        let mut logo = String::new();
        archive
            .by_name("logo.png")
            .unwrap()
            .read_to_string(&mut logo)
            .unwrap();
        assert_eq!(logo, "AAAA");
        assert!(archive.by_name("css/style.css").is_ok());
    }

    #[test]
    fn test_single_document_requires_markup() {
        let files: FileSet = [ProjectFile::new("main.py", "print(1)")].into_iter().collect();
        assert_eq!(single_document(&files), Err(ComposeError::NotComposable));
    }

    #[test]
    fn test_single_document_has_no_debug_hooks() {
        let files: FileSet = [ProjectFile::new("index.html", "<body></body>")]
            .into_iter()
            .collect();
        let document = single_document(&files).unwrap();
        assert!(!document.contains("Element clicked:"));
        assert!(document.contains("pagesmith-preview"));
    }
}

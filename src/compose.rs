//! document compositor: merges a file set into one self-contained page
//!
//! the steps run in a fixed order:
//! 1. the first `.html` file is the root document
//! 2. binary assets are inlined as `data:` URIs (see [`assets`])
//! 3. stylesheets are inlined before `</head>`
//! 4. the instrumentation block and every script are inserted before `</body>`

pub mod assets;
pub mod instrument;

use crate::constants::{MARKUP_EXTENSION, SCRIPT_EXTENSION, STYLESHEET_EXTENSION};
use crate::error::ComposeError;
use crate::project::{FileSet, ProjectFile};
use assets::{AssetRewriter, GlobalTextRewriter};
use regex::Regex;

/// switches that change the generated instrumentation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    pub debug_mode: bool,
    pub mobile_emulation: bool,
}

/// the first file that can serve as the root document, if any
pub fn root_document(files: &FileSet) -> Option<&ProjectFile> {
    files.iter().find(|f| f.name.ends_with(MARKUP_EXTENSION))
}

pub fn is_composable(files: &FileSet) -> bool {
    root_document(files).is_some()
}

/// compose with the default global-substitution asset rewriter
pub fn compose(files: &FileSet, options: PreviewOptions) -> Result<String, ComposeError> {
    compose_with(files, options, &GlobalTextRewriter)
}

pub fn compose_with(
    files: &FileSet,
    options: PreviewOptions,
    rewriter: &dyn AssetRewriter,
) -> Result<String, ComposeError> {
    let root = root_document(files).ok_or(ComposeError::NotComposable)?;

    let document = assets::inline_assets(root.content.clone(), files, rewriter);

    // styles
    let stylesheets: Vec<&ProjectFile> = files
        .iter()
        .filter(|f| f.name.ends_with(STYLESHEET_EXTENSION))
        .collect();
    let mut document = stylesheets
        .iter()
        .fold(document, |doc, f| remove_stylesheet_link(&doc, &f.name));
    if !stylesheets.is_empty() {
        let styles: String = stylesheets
            .iter()
            .map(|f| {
                format!(
                    "<style>\n{}\n</style>\n",
                    instrument::escape_close_tag(&f.content, "style")
                )
            })
            .collect();
        document = insert_before_head_close(document, &styles);
    }

    // scripts
    let scripts: Vec<&ProjectFile> = files
        .iter()
        .filter(|f| f.name.ends_with(SCRIPT_EXTENSION))
        .collect();
    let mut document = scripts
        .iter()
        .fold(document, |doc, f| remove_script_tag(&doc, &f.name));
    let mut blocks = instrument::instrumentation(options);
    for script in &scripts {
        blocks.push_str(&instrument::wrap_script(&script.name, &script.content));
    }
    document = insert_before_body_close(document, &blocks);

    Ok(document)
}

/// insert before the first `</head>`; without one, prepend to the document
fn insert_before_head_close(document: String, fragment: &str) -> String {
    match document.to_ascii_lowercase().find("</head>") {
        Some(idx) => splice(&document, idx, fragment),
        None => format!("{fragment}{document}"),
    }
}

/// insert before the last `</body>`; without one, append to the document
fn insert_before_body_close(document: String, fragment: &str) -> String {
    match document.to_ascii_lowercase().rfind("</body>") {
        Some(idx) => splice(&document, idx, fragment),
        None => format!("{document}{fragment}"),
    }
}

fn splice(document: &str, idx: usize, fragment: &str) -> String {
    let mut out = String::with_capacity(document.len() + fragment.len());
    out.push_str(&document[..idx]);
    out.push_str(fragment);
    out.push_str(&document[idx..]);
    out
}

/// drop `<link ... href="name">` tags pointing at an inlined stylesheet
fn remove_stylesheet_link(document: &str, name: &str) -> String {
    let pattern = format!(
        r#"(?i)<link\s[^>]*href=["'](?:\./)?{}["'][^>]*>"#,
        regex::escape(name)
    );
    strip(document, &pattern)
}

/// drop `<script src="name"></script>` tags pointing at an inlined script
fn remove_script_tag(document: &str, name: &str) -> String {
    let pattern = format!(
        r#"(?i)<script\s[^>]*src=["'](?:\./)?{}["'][^>]*>\s*</script>"#,
        regex::escape(name)
    );
    strip(document, &pattern)
}

fn strip(document: &str, pattern: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(document, "").into_owned(),
        Err(_) => document.to_string(),
    }
}

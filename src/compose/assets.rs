//! binary asset detection and inlining
//!
//! assets are inlined by plain text substitution: every occurrence of the
//! asset's file name anywhere in the document becomes a `data:` URI. this
//! also hits the name inside unrelated text and inside longer names
//! (`a.png` within `banana.png`), so generated asset names must be
//! distinctive. a stricter rewriter can be swapped in through
//! [`AssetRewriter`]

use crate::project::ProjectFile;
use std::path::Path;

/// mime type of a binary asset from its extension; `None` for anything that
/// is not an image, audio or video file
pub fn asset_mime(name: &str) -> Option<&'static str> {
    let ext = Path::new(name)
        .extension()?
        .to_string_lossy()
        .to_lowercase();
    let mime = match ext.as_str() {
        // images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        // audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        // video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}

/// `data:` URI embedding an asset's base64 content
pub fn data_uri(mime: &str, base64_content: &str) -> String {
    format!("data:{mime};base64,{base64_content}")
}

/// rewrites references to one asset inside the document
pub trait AssetRewriter {
    fn rewrite(&self, document: &str, asset: &ProjectFile, data_uri: &str) -> String;
}

/// replaces every literal occurrence of the asset name
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalTextRewriter;

impl AssetRewriter for GlobalTextRewriter {
    fn rewrite(&self, document: &str, asset: &ProjectFile, data_uri: &str) -> String {
        if asset.name.is_empty() {
            return document.to_string();
        }
        document.replace(asset.name.as_str(), data_uri)
    }
}

/// inline every asset of the file set into `document`, in file set order
pub fn inline_assets<'a>(
    mut document: String,
    files: impl IntoIterator<Item = &'a ProjectFile>,
    rewriter: &dyn AssetRewriter,
) -> String {
    for file in files {
        if let Some(mime) = asset_mime(&file.name) {
            let uri = data_uri(mime, &file.content);
            document = rewriter.rewrite(&document, file, &uri);
        }
    }
    document
}

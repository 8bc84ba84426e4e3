//! File naming and saving for downloaded images.

use std::path::{Path, PathBuf};

use crate::error::ClientError;
use crate::params::{coerce_number, format_number};
use crate::ports::FetchedImage;

/// Extension used when the bytes and the content type say nothing useful.
const FALLBACK_EXTENSION: &str = "png";

/// Build a filename from the form fields and a file extension.
///
/// The prompt is sanitized to at most 50 characters and followed by the
/// coerced steps and scale, e.g. `a-red-fox_50_7.5.png`.
#[must_use]
pub fn auto_filename(prompt: &str, steps: &str, scale: &str, extension: &str) -> String {
    let sanitized = sanitize_for_filename(prompt, 50);
    let steps = format_number(coerce_number(steps));
    let scale = format_number(coerce_number(scale));
    format!("{sanitized}_{steps}_{scale}.{extension}")
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // no leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Pick a file extension for downloaded bytes.
///
/// Sniffs the image signature first, then falls back to the content type.
#[must_use]
pub fn image_extension(fetched: &FetchedImage) -> &'static str {
    if let Some(ext) =
        image::guess_format(&fetched.data).ok().and_then(|f| f.extensions_str().first().copied())
    {
        return ext;
    }
    match fetched.content_type.as_deref().map(|ct| ct.split(';').next().unwrap_or("").trim()) {
        Some("image/jpeg") => "jpg",
        Some("image/webp") => "webp",
        Some("image/gif") => "gif",
        _ => FALLBACK_EXTENSION,
    }
}

/// Resolve where to save: the explicit path, or an auto-generated name.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&str>,
    prompt: &str,
    steps: &str,
    scale: &str,
    fetched: &FetchedImage,
) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(prompt, steps, scale, image_extension(fetched))),
    }
}

/// Write image bytes, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_image(data: &[u8], output_path: &Path) -> Result<(), ClientError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, data)?;
    Ok(())
}

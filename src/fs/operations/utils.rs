//! Shared helpers for transfer operations.

use std::path::{Component, Path};

use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};

use crate::error::{OpenfilesError, Result};

/// Name used when the service does not suggest one.
pub(crate) const DEFAULT_DOWNLOAD_NAME: &str = "downloaded_file";

/// Final path component of an upload source.
pub(crate) fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| OpenfilesError::InvalidArgument(format!("Invalid file path: {}", path.display())))
}

/// Archive entry name for `path` relative to `root`, with `/` separators.
pub(crate) fn relative_entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Filename suggested by a `Content-Disposition` response header.
pub(crate) fn filename_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    filename_from_content_disposition(value)
}

pub(crate) fn filename_from_content_disposition(value: &str) -> Option<String> {
    let start = value.find("filename=")? + "filename=".len();
    let rest = value[start..].trim_start();

    let raw = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next()?,
        None => rest.split(';').next()?.trim(),
    };

    sanitize_file_name(raw)
}

/// Keep only the last path component so a header cannot point outside the target directory.
fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

//! Path properties
//!
//! Derives the descriptive metadata of a single document path: name, extension,
//! human-readable size, modification time and a stable identifier.

use crate::error::ScanError;
use crate::types::{FileDescriptor, FileStatus};
use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

const SIZE_UNITS: [&str; 7] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Describe a file as it exists right now.
///
/// Fails when the path cannot be stat'ed; there is no retry, callers rescan.
pub fn describe(path: &Path) -> Result<FileDescriptor, ScanError> {
    let metadata = std::fs::metadata(path).map_err(|source| ScanError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    let updated_at = modified_millis(path, &metadata)?;

    Ok(FileDescriptor {
        id: derive_file_id(path),
        path: path.to_path_buf(),
        name: file_name(path),
        extension: extension_of(path),
        size: format_bytes(metadata.len()),
        updated_at,
        status: FileStatus::default(),
    })
}

/// Modification time of `path` in epoch milliseconds.
pub fn modified_millis(path: &Path, metadata: &Metadata) -> Result<i64, ScanError> {
    let modified = metadata.modified().map_err(|source| ScanError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DateTime::<Utc>::from(modified).timestamp_millis())
}

/// Canonical, platform-independent key for a path.
///
/// Both separator styles are accepted, `.` segments are dropped and `..` segments
/// are folded lexically. Each segment is NFC-normalized and has `%` and `-`
/// percent-escaped, so joining with `-` stays unambiguous; an absolute path keeps
/// a leading `-`. The filesystem is never consulted.
pub fn normalize_path_key(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let absolute = raw.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments
        .iter()
        .map(|segment| escape_segment(segment))
        .collect::<Vec<_>>()
        .join("-");
    if absolute {
        format!("-{}", joined)
    } else {
        joined
    }
}

/// Stable identifier for a document: its normalized path key followed by its
/// escaped name. Distinct canonical paths never share an identifier.
pub fn derive_file_id(path: &Path) -> String {
    let key = normalize_path_key(path);
    let raw = path.to_string_lossy().replace('\\', "/");
    let name = raw
        .rsplit('/')
        .find(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or_default();
    format!("{}-{}", key, escape_segment(name))
}

fn escape_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for c in segment.nfc() {
        match c {
            '%' => escaped.push_str("%25"),
            '-' => escaped.push_str("%2D"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `path` made absolute against the working directory, without resolving symlinks.
pub fn absolute_path(path: &Path) -> Result<PathBuf, ScanError> {
    if path.as_os_str().is_empty() {
        return Err(ScanError::InvalidPath("path is empty".to_string()));
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(ScanError::CurrentDir)?
            .join(path)
    };
    Ok(dunce::simplified(&absolute).to_path_buf())
}

/// Format a byte count using 1024-based units, rounded to two decimals.
///
/// Examples:
/// - 0 -> "0 Bytes"
/// - 1024 -> "1 KB"
/// - 1536 -> "1.5 KB"
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// File name of `path` including the extension.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension of `path` without the leading dot.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

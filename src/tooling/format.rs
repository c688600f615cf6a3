//! Format tracked folders, scans and notices as text.

use crate::app::{FolderPayload, Notice, NoticeKind};
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Human-readable view of a `got-folder` payload.
pub fn format_folder_text(payload: &FolderPayload) -> String {
    let Some(folder) = &payload.folder else {
        return "No folder is tracked. Run `uploadtracker track <path>` first.".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Tracked folder")));
    out.push_str(&format!("  Path: {}\n", folder.display()));

    let files = payload.files.as_deref().unwrap_or_default();
    if files.is_empty() {
        out.push_str("  No documents in the latest subfolder.\n");
        return out;
    }
    out.push_str(&format!("  Documents: {}\n\n", files.len()));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Size", "Modified", "Status", "ID"]);
    for file in files {
        table.add_row(vec![
            file.name.clone(),
            file.size.clone(),
            format_millis(file.updated_at),
            file.status.to_string(),
            file.id.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// One path per line followed by a count.
pub fn format_scan_text(root: &std::path::Path, files: &[PathBuf]) -> String {
    let mut out = String::new();
    for file in files {
        let shown = file.strip_prefix(root).unwrap_or(file);
        out.push_str(&format!("{}\n", shown.display()));
    }
    out.push_str(&format!("{} file(s) under {}", files.len(), root.display()));
    out
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Info => notice.message.clone(),
        NoticeKind::Error => format!("Error: {}", notice.message),
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

//! Meeting document records assembled from the mirror
//!
//! A meeting document lives in one mirror directory:
//! `<root>/<policymaker>/<year>/<ddMMhhmm>/` holding the index page, the
//! cover page `htmtxt0.htm`, one `htmtxt<number>.htm` per agenda item and
//! the `origin_url` sidecar. This module combines the cover page and item
//! parsers into the [`MeetingRecord`] handed to external persistence.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;
use walkdir::WalkDir;

use crate::parse::{parse_agendaitem, parse_cover_page, AgendaItem, ParseError};

/// Filename of the cover page inside a meeting document directory.
pub const COVER_PAGE_FILENAME: &str = "htmtxt0.htm";

/// Filename of the sidecar recording the originating listing URL.
pub const ORIGIN_URL_FILENAME: &str = "origin_url";

/// Normalized record of one meeting document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    /// Abbreviation of the governing body, from the mirror layout
    pub policymaker_abbreviation: String,

    /// Listing URL the document was discovered from; empty when the
    /// sidecar is missing
    pub origin_url: String,

    /// Stable path-derived key: the last three mirror path components
    pub origin_id: String,

    /// Meeting start; parsed from the cover page or derived from the
    /// directory name, never unset
    pub start_datetime: NaiveDateTime,

    /// Agenda items ordered by their number
    pub agendaitems: Vec<AgendaItem>,
}

/// Whether `path` is a meeting document directory (holds a cover page).
pub fn is_meetingdoc_dir(path: &Path) -> bool {
    path.join(COVER_PAGE_FILENAME).is_file()
}

/// Meeting document directories under a mirror root, in path order.
pub fn scan_mirror(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|path| is_meetingdoc_dir(path))
        .collect()
}

/// Parse one meeting document directory into a [`MeetingRecord`].
///
/// Agenda item pages whose filename does not encode an item number are
/// logged and skipped; the rest of the document still parses.
pub fn parse_meetingdoc(dir: &Path) -> Result<MeetingRecord, ParseError> {
    let origin_url = match std::fs::read_to_string(dir.join(ORIGIN_URL_FILENAME)) {
        Ok(contents) => contents.lines().next().unwrap_or("").trim().to_string(),
        Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err.into()),
    };

    // Mirror layout contract: <root>/<policymaker>/<year>/<meeting>.
    let tail: Vec<&str> = dir
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();
    let tail = &tail[tail.len().saturating_sub(3)..];
    let origin_id = tail.join("/");
    let policymaker_abbreviation = tail.first().copied().unwrap_or_default().to_string();

    let start_datetime = parse_cover_page(dir)?;

    let mut agendaitems = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let filename = entry.file_name();
        let Some(filename) = filename.to_str() else {
            continue;
        };
        if filename == COVER_PAGE_FILENAME
            || !filename.starts_with("htmtxt")
            || !filename.ends_with(".htm")
        {
            continue;
        }
        match parse_agendaitem(&entry.path()) {
            Ok(item) => agendaitems.push(item),
            Err(err @ ParseError::ItemNumber(_)) => {
                warn!("skipping agenda item page {}: {}", entry.path().display(), err);
            }
            Err(err) => return Err(err),
        }
    }
    agendaitems.sort_by_key(|item| item.number);

    Ok(MeetingRecord {
        policymaker_abbreviation,
        origin_url,
        origin_id,
        start_datetime,
        agendaitems,
    })
}

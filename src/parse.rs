//! # Mirror Parsing Module
//!
//! This module reads sanitized pages from the local mirror — never the
//! network — and extracts normalized records from them. The source material
//! is hand-authored HTML spanning years of publishing-system output, so
//! every extractor is a documented heuristic: marker phrases and patterns
//! over paragraph text, with absent values instead of errors for optional
//! fields.
//!
//! ## Key Components
//!
//! - `AgendaItem`: the normalized value extracted from one item page
//! - Field extractors (`subject`, `dnro`, `preparers`, `resolution`): pure
//!   functions over a flat paragraph list
//! - `parse_cover_page`: meeting start datetime with the directory-name
//!   fallback that keeps it always resolvable

mod agendaitem;
mod cover;
mod error;
mod text;

pub use agendaitem::{dnro, item_number, parse_agendaitem, preparers, resolution, subject};
pub use cover::{parse_cover_page, parse_start_datetime, start_datetime_from_dirname};
pub use error::ParseError;
pub use text::collapse_ws;

use serde::{Deserialize, Serialize};

/// One numbered decision or discussion item of a meeting document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    /// Item number from the source page's own enumeration
    pub number: u32,

    /// Case number ("Dnro"), absent for standard items
    pub dnro: Option<String>,

    /// Names of the preparers, possibly empty
    pub preparers: Vec<String>,

    /// Subject text
    pub subject: Option<String>,

    /// Resolution text; the last resolution marker in the page wins
    pub resolution: Option<String>,
}

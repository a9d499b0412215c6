//! Start datetime extraction from sanitized cover pages
//!
//! The cover page carries the meeting date and time near a "KOKOUSTIEDOT"
//! section marker. The traversal is a heuristic: locate the marker text
//! node, walk to its nearest enclosing table row and read the paragraphs of
//! the row's second cell. When no candidate line parses as a datetime, the
//! mirror directory naming convention is the backstop: the parent directory
//! is the four-digit year and the document directory's first eight digits
//! encode day, month, hour and minute. The fallback reflects template
//! scheduling values rather than confirmed times, but it guarantees a
//! result whenever the on-disk contract holds.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::meeting::COVER_PAGE_FILENAME;
use crate::parse::error::ParseError;
use crate::parse::text::{collapse_ws, elem_text};

/// Marker of the meeting-info section on a cover page.
const MEETING_INFO_MARKER: &str = "KOKOUSTIEDOT";

// Optional weekday name, day.month.year, then "kello"/"klo" hour.minute.
static START_DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\pL+)?[ ]*([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4})[, ]+(?:kello|klo)[ ]*([0-9]{1,2})\.([0-9]{2})",
    )
    .expect("invalid regex: start datetime")
});

static TD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector"));

static P_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("static selector"));

/// Parse one candidate text line as the meeting start datetime.
pub fn parse_start_datetime(text: &str) -> Option<NaiveDateTime> {
    let captures = START_DATETIME_RE.captures(text)?;
    let day: u32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    let hour: u32 = captures[4].parse().ok()?;
    let minute: u32 = captures[5].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Candidate meeting-info lines: non-empty paragraphs of the second cell of
/// the row enclosing the section marker.
fn meeting_info_lines(document: &Html) -> Vec<String> {
    let Some(marker) = document
        .tree
        .nodes()
        .find(|node| matches!(node.value(), Node::Text(text) if text.contains(MEETING_INFO_MARKER)))
    else {
        return Vec::new();
    };

    let Some(row) = marker
        .ancestors()
        .find_map(|ancestor| ElementRef::wrap(ancestor).filter(|el| el.value().name() == "tr"))
    else {
        return Vec::new();
    };

    let Some(cell) = row.select(&TD_SELECTOR).nth(1) else {
        return Vec::new();
    };

    cell.select(&P_SELECTOR)
        .map(|paragraph| collapse_ws(&elem_text(paragraph)))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Fallback: decode the start datetime from the mirror directory name.
pub fn start_datetime_from_dirname(dir: &Path) -> Option<NaiveDateTime> {
    let name = dir.file_name()?.to_str()?;
    let year: i32 = dir.parent()?.file_name()?.to_str()?.parse().ok()?;

    let digits = name.get(..8)?;
    if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let day: u32 = digits[0..2].parse().ok()?;
    let month: u32 = digits[2..4].parse().ok()?;
    let hour: u32 = digits[4..6].parse().ok()?;
    let minute: u32 = digits[6..8].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Resolve the start datetime of the meeting document mirrored at `dir`.
///
/// The first meeting-info line matching the datetime pattern wins; without
/// one the directory name decides. Fails only when the mirror violates the
/// directory naming contract.
pub fn parse_cover_page(dir: &Path) -> Result<NaiveDateTime, ParseError> {
    let html = std::fs::read_to_string(dir.join(COVER_PAGE_FILENAME))?;
    let document = Html::parse_document(&html);

    meeting_info_lines(&document)
        .iter()
        .find_map(|line| parse_start_datetime(line))
        .or_else(|| start_datetime_from_dirname(dir))
        .ok_or_else(|| ParseError::StartDate(dir.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_start_datetime_variants() {
        let cases = [
            ("Keskiviikko 4.9.2013, klo 16.00", datetime(2013, 9, 4, 16, 0)),
            ("4.9.2013 kello 16.00", datetime(2013, 9, 4, 16, 0)),
            ("Maanantai 25.11.2013, kello 18.30 - 21.02", datetime(2013, 11, 25, 18, 30)),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_start_datetime(text), Some(expected), "input {text:?}");
        }
    }

    #[test]
    fn test_parse_start_datetime_rejects_non_dates() {
        assert_eq!(parse_start_datetime("Valtuustosali, kaupungintalo"), None);
        assert_eq!(parse_start_datetime("4.9.2013"), None);
        assert_eq!(parse_start_datetime("31.2.2013 klo 10.00"), None);
    }

    #[test]
    fn test_start_datetime_from_dirname() {
        let dir = Path::new("mirror/paatokset/karltk/2013/15091000");
        assert_eq!(start_datetime_from_dirname(dir), Some(datetime(2013, 9, 15, 10, 0)));
    }

    #[test]
    fn test_start_datetime_from_malformed_dirname() {
        assert_eq!(start_datetime_from_dirname(Path::new("2013/kokous")), None);
        assert_eq!(start_datetime_from_dirname(Path::new("vuosi/15091000")), None);
        assert_eq!(start_datetime_from_dirname(Path::new("2013/1509")), None);
    }

    #[test]
    fn test_cover_page_text_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let doc_dir = dir.path().join("2013").join("15091000");
        std::fs::create_dir_all(&doc_dir).unwrap();
        std::fs::write(
            doc_dir.join(COVER_PAGE_FILENAME),
            "<html><body><table><tr>\
             <td><p>KOKOUSTIEDOT</p></td>\
             <td><p>Aika</p><p>Keskiviikko 4.9.2013, klo 16.00</p><p>Valtuustosali</p></td>\
             </tr></table></body></html>",
        )
        .unwrap();

        assert_eq!(parse_cover_page(&doc_dir).unwrap(), datetime(2013, 9, 4, 16, 0));
    }

    #[test]
    fn test_cover_page_falls_back_to_dirname() {
        let dir = tempfile::tempdir().unwrap();
        let doc_dir = dir.path().join("2013").join("15091000");
        std::fs::create_dir_all(&doc_dir).unwrap();
        std::fs::write(
            doc_dir.join(COVER_PAGE_FILENAME),
            "<html><body><table><tr>\
             <td><p>KOKOUSTIEDOT</p></td>\
             <td><p>Valtuustosali</p></td>\
             </tr></table></body></html>",
        )
        .unwrap();

        assert_eq!(parse_cover_page(&doc_dir).unwrap(), datetime(2013, 9, 15, 10, 0));
    }

    #[test]
    fn test_unresolvable_start_datetime_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc_dir = dir.path().join("arkisto").join("kokous");
        std::fs::create_dir_all(&doc_dir).unwrap();
        std::fs::write(
            doc_dir.join(COVER_PAGE_FILENAME),
            "<html><body><p>ei tietoja</p></body></html>",
        )
        .unwrap();

        assert!(matches!(
            parse_cover_page(&doc_dir),
            Err(ParseError::StartDate(_))
        ));
    }
}

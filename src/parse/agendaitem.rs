//! Field extraction from sanitized agenda item pages
//!
//! Every field is a heuristic over free-form paragraph text, so each is an
//! independent, side-effect-free function over the flat paragraph list and
//! unit-tested with literal fixtures. Missing markers resolve to absent
//! values, never to errors; only a filename that does not encode the item
//! number is fatal for the page.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::parse::error::ParseError;
use crate::parse::text::{collapse_ws, paragraphs};
use crate::parse::AgendaItem;

/// Dnro value the publishing system's template leaves behind when an item
/// has no real case number. Observed convention, not a format guarantee.
const PLACEHOLDER_DNRO: &str = "0/00";

/// Paragraphs naming the preparers start with this phrase.
const PREPARER_MARKER: &str = "Asian valmisteli";

static ITEM_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^htmtxt([0-9]+)\.htm$").expect("invalid regex: item filename"));

static DNRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Dnro (\d+[\s\u{00A0}\u{00AD}]?/\d+)").expect("invalid regex: dnro")
});

// One or more hyphen-joined capitalized tokens, at least two words.
static PERSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-ZÖÄÅ][a-zöäå]*(?:-[A-ZÖÄÅ][a-zöäå]*)*(?: [A-ZÖÄÅ][a-zöäå]*(?:-[A-ZÖÄÅ][a-zöäå]*)*)+)",
    )
    .expect("invalid regex: person name")
});

static RESOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^[\s\u{00A0}\u{00AD}]*Päätös[\s\u{00A0}\u{00AD}]+(.*)")
        .expect("invalid regex: resolution")
});

/// Item number encoded in an agenda item filename (`htmtxt<digits>.htm`).
pub fn item_number(path: &Path) -> Result<u32, ParseError> {
    let filename = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    let captures = ITEM_FILENAME_RE
        .captures(filename)
        .ok_or_else(|| ParseError::ItemNumber(filename.to_string()))?;
    captures[1]
        .parse()
        .map_err(|_| ParseError::ItemNumber(filename.to_string()))
}

/// Subject of the item: the remainder of the first paragraph starting with
/// the item number and a space.
pub fn subject(paragraphs: &[String], number: u32) -> Option<String> {
    let prefix = format!("{number} ");
    paragraphs
        .iter()
        .map(|paragraph| collapse_ws(paragraph))
        .find_map(|text| text.strip_prefix(&prefix).map(str::to_string))
}

/// Case number of the item: the first paragraph matching the Dnro pattern,
/// with separator characters removed. The template placeholder `0/00`
/// resolves to absent.
pub fn dnro(paragraphs: &[String]) -> Option<String> {
    for paragraph in paragraphs {
        let text = collapse_ws(paragraph);
        if let Some(captures) = DNRO_RE.captures(&text) {
            let value: String = captures[1]
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '\u{ad}')
                .collect();
            if value == PLACEHOLDER_DNRO {
                return None;
            }
            return Some(value);
        }
    }
    None
}

/// Names of the preparers, taken from the first paragraph starting with the
/// preparer marker phrase. Standard items (opening, quorum) have none.
pub fn preparers(paragraphs: &[String]) -> Vec<String> {
    for paragraph in paragraphs {
        let text = collapse_ws(paragraph);
        if text.starts_with(PREPARER_MARKER) {
            return PERSON_RE
                .find_iter(&text)
                .map(|name| name.as_str().to_string())
                .collect();
        }
    }
    Vec::new()
}

/// Resolution text of the item. Every paragraph opening with the "Päätös"
/// marker overwrites the previous candidate, so an amendment appended later
/// in the document wins.
pub fn resolution(paragraphs: &[String]) -> Option<String> {
    let mut resolution = None;
    for paragraph in paragraphs {
        if let Some(captures) = RESOLUTION_RE.captures(paragraph) {
            resolution = Some(collapse_ws(&captures[1]));
        }
    }
    resolution
}

/// Parse one sanitized agenda item page from the mirror.
pub fn parse_agendaitem(path: &Path) -> Result<AgendaItem, ParseError> {
    let number = item_number(path)?;
    let html = std::fs::read_to_string(path)?;
    let document = Html::parse_document(&html);
    let paragraphs = paragraphs(&document);

    Ok(AgendaItem {
        number,
        dnro: dnro(&paragraphs),
        preparers: preparers(&paragraphs),
        subject: subject(&paragraphs, number),
        resolution: resolution(&paragraphs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn test_item_number_from_filename() {
        assert_eq!(item_number(Path::new("htmtxt0005.htm")).unwrap(), 5);
        assert_eq!(item_number(Path::new("a/b/htmtxt12.htm")).unwrap(), 12);
        assert!(item_number(Path::new("frmtxt5.htm")).is_err());
        assert!(item_number(Path::new("htmtxt.htm")).is_err());
        assert!(item_number(Path::new("index.htm")).is_err());
    }

    #[test]
    fn test_subject_strips_number_prefix() {
        let paragraphs = lines(&["KARLTK", "5 VUODEN 2014 TALOUSARVIO", "muuta"]);
        assert_eq!(
            subject(&paragraphs, 5),
            Some("VUODEN 2014 TALOUSARVIO".to_string())
        );
        // "50 ..." must not match item number 5.
        let paragraphs = lines(&["50 vuotta juhlittiin"]);
        assert_eq!(subject(&paragraphs, 5), None);
    }

    #[test]
    fn test_dnro_normalizes_separators() {
        let paragraphs = lines(&["Dnro 123 /2013"]);
        assert_eq!(dnro(&paragraphs), Some("123/2013".to_string()));

        let paragraphs = lines(&["Dnro 123\u{a0}/2013"]);
        assert_eq!(dnro(&paragraphs), Some("123/2013".to_string()));

        let paragraphs = lines(&["Dnro 44/2012"]);
        assert_eq!(dnro(&paragraphs), Some("44/2012".to_string()));
    }

    #[test]
    fn test_dnro_placeholder_is_absent() {
        let paragraphs = lines(&["Dnro 0/00", "Dnro 99/2013"]);
        assert_eq!(dnro(&paragraphs), None);
    }

    #[test]
    fn test_dnro_first_match_wins() {
        let paragraphs = lines(&["Dnro 1/2013", "Dnro 2/2013"]);
        assert_eq!(dnro(&paragraphs), Some("1/2013".to_string()));
    }

    #[test]
    fn test_dnro_requires_line_start() {
        let paragraphs = lines(&["katso Dnro 1/2013"]);
        assert_eq!(dnro(&paragraphs), None);
    }

    #[test]
    fn test_preparers_from_marker_paragraph() {
        let paragraphs = lines(&[
            "5 ASIA",
            "Asian valmisteli hallintojohtaja Maija-Liisa Virtanen ja Pekka Korhonen.",
            "Asian valmisteli Joku Muu",
        ]);
        assert_eq!(
            preparers(&paragraphs),
            vec!["Maija-Liisa Virtanen".to_string(), "Pekka Korhonen".to_string()]
        );
    }

    #[test]
    fn test_preparers_absent_without_marker() {
        let paragraphs = lines(&["Kokouksen avaus", "Maija Virtanen avasi kokouksen"]);
        assert!(preparers(&paragraphs).is_empty());
    }

    #[test]
    fn test_resolution_last_marker_wins() {
        let paragraphs = lines(&[
            "Päätös Ehdotus hyväksyttiin.",
            "Keskustelua käytiin.",
            "Päätös Ehdotus hyväksyttiin äänestyksen jälkeen.",
        ]);
        assert_eq!(
            resolution(&paragraphs),
            Some("Ehdotus hyväksyttiin äänestyksen jälkeen.".to_string())
        );
    }

    #[test]
    fn test_resolution_spans_line_breaks() {
        let paragraphs = lines(&["\u{a0}Päätös\nEhdotus\nhyväksyttiin."]);
        assert_eq!(resolution(&paragraphs), Some("Ehdotus hyväksyttiin.".to_string()));
    }

    #[test]
    fn test_parse_agendaitem_from_mirror_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("htmtxt0003.htm");
        std::fs::write(
            &path,
            "<html><body>\
             <p>3 LAUSUNTO KAAVAEHDOTUKSESTA</p>\
             <p>Dnro 321 /2013</p>\
             <p>Asian valmisteli kaavoitusarkkitehti Anna Mäkinen.</p>\
             <p>Päätös Lausunto annettiin esityksen mukaisena.</p>\
             </body></html>",
        )
        .unwrap();

        let item = parse_agendaitem(&path).unwrap();
        assert_eq!(item.number, 3);
        assert_eq!(item.subject.as_deref(), Some("LAUSUNTO KAAVAEHDOTUKSESTA"));
        assert_eq!(item.dnro.as_deref(), Some("321/2013"));
        assert_eq!(item.preparers, vec!["Anna Mäkinen".to_string()]);
        assert_eq!(
            item.resolution.as_deref(),
            Some("Lausunto annettiin esityksen mukaisena.")
        );
    }
}

//! Link discovery over sanitized listing and index pages
//!
//! Two pure functions mapping the publishing system's frame structure to
//! fetchable URLs. A policymaker listing page links each meeting document
//! from a third-level heading; a meeting document index page lists its
//! agenda items as rows of frame links (`frmtxt<digits>.htm`), which are
//! rewritten to the corresponding content frames (`htmtxt<digits>.htm`).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Frame number of the closing/non-content frame. Observed convention of
/// the publishing system, not a documented guarantee of the format.
const CLOSING_FRAME_NUMBER: &str = "9999";

static FRAME_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)frmtxt(\d+)\.htm").expect("invalid regex: frame link"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// URLs of the meeting document index pages referenced by a listing page:
/// the first link target of every third-level heading, resolved against
/// `base_url`, in document order.
pub fn meetingdoc_urls(listing_html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(listing_html);
    let h3_selector = selector("h3");
    let link_selector = selector("a[href]");

    document
        .select(&h3_selector)
        .filter_map(|heading| {
            let href = heading.select(&link_selector).next()?.value().attr("href")?;
            base_url.join(href.trim()).ok()
        })
        .collect()
}

/// URLs of the agenda item content pages referenced by an index page.
///
/// Scans the first table's rows; the first anchor of each row is matched
/// against the frame link pattern and rewritten to its content frame. The
/// closing frame and rows without a frame link are skipped silently.
pub fn agendaitem_urls(index_html: &str, index_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(index_html);
    let table_selector = selector("table");
    let row_selector = selector("tr");
    let link_selector = selector("a[href]");

    let Some(table) = document.select(&table_selector).next() else {
        return Vec::new();
    };

    table
        .select(&row_selector)
        .filter_map(|row| {
            let href = row.select(&link_selector).next()?.value().attr("href")?.trim();
            let captures = FRAME_LINK_RE.captures(href)?;
            if &captures[2] == CLOSING_FRAME_NUMBER {
                return None;
            }
            index_url
                .join(&format!("{}htmtxt{}.htm", &captures[1], &captures[2]))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meetingdoc_urls_from_headings() {
        let html = "<html><body>\
            <h2><a href=\"unrelated.htm\">skip</a></h2>\
            <h3><a href=\"karltk/2013/15091000/index.htm\">15.9.2013</a></h3>\
            <h3>no link here</h3>\
            <h3><a href=\"karltk/2013/04091600/index.htm\">4.9.2013</a></h3>\
            </body></html>";
        let base = Url::parse("http://example.fi/paatokset/karltk.htm").unwrap();

        let urls = meetingdoc_urls(html, &base);
        assert_eq!(
            urls,
            vec![
                Url::parse("http://example.fi/paatokset/karltk/2013/15091000/index.htm").unwrap(),
                Url::parse("http://example.fi/paatokset/karltk/2013/04091600/index.htm").unwrap(),
            ]
        );
    }

    #[test]
    fn test_agendaitem_urls_rewrites_frame_links() {
        let html = "<html><body><table>\
            <tr><td><a href=\"frmtxt0.htm\">kansilehti</a></td></tr>\
            <tr><td><a href=\"frmtxt0005.htm\">5</a></td></tr>\
            <tr><td><a href=\"frmtxt9999.htm\">loppu</a></td></tr>\
            <tr><td><a href=\"muu.htm\">ei frame</a></td></tr>\
            <tr><td>ei linkkiä</td></tr>\
            </table></body></html>";
        let index_url = Url::parse("http://example/x/htmtxt0.htm").unwrap();

        let urls = agendaitem_urls(html, &index_url);
        assert_eq!(
            urls,
            vec![
                Url::parse("http://example/x/htmtxt0.htm").unwrap(),
                Url::parse("http://example/x/htmtxt0005.htm").unwrap(),
            ]
        );
    }

    #[test]
    fn test_agendaitem_urls_keeps_link_prefix() {
        let html = "<html><body><table>\
            <tr><td><a href=\"sub/frmtxt0002.htm\">2</a></td></tr>\
            </table></body></html>";
        let index_url = Url::parse("http://example/x/index.htm").unwrap();

        let urls = agendaitem_urls(html, &index_url);
        assert_eq!(
            urls,
            vec![Url::parse("http://example/x/sub/htmtxt0002.htm").unwrap()]
        );
    }

    #[test]
    fn test_agendaitem_urls_without_table() {
        let index_url = Url::parse("http://example/x/index.htm").unwrap();
        assert!(agendaitem_urls("<html><body><p>tyhjä</p></body></html>", &index_url).is_empty());
    }
}

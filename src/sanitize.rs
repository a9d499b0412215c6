//! Storage-reducing HTML sanitizer for mirrored pages
//!
//! KTWeb exports carry years of hand-authored presentation markup that is
//! irrelevant to text extraction. Before a page is written to the mirror it
//! is reduced to the structurally necessary parts: comments, doctype
//! declarations, `<style>` and `<meta>` elements are dropped, every element
//! keeps at most the `class`, `href` and `target` attributes, and carriage
//! returns are stripped from text. The result is deterministic and
//! idempotent, so re-sanitizing an already-mirrored page is a no-op.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Attributes preserved on every element, in output order.
const KEPT_ATTRIBUTES: [&str; 3] = ["class", "href", "target"];

/// Elements removed wholesale together with their content.
const DROPPED_ELEMENTS: [&str; 2] = ["meta", "style"];

/// Void elements, serialized without a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "frame", "hr", "img", "input", "link", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text in HTML. Escaping it would change the
/// parsed document, so it is emitted verbatim.
const RAW_TEXT_ELEMENTS: [&str; 6] = ["iframe", "noembed", "noframes", "noscript", "script", "xmp"];

/// Sanitize an HTML page into its storage-reduced form.
///
/// Pure and deterministic; performs no I/O. Sanitizing already-sanitized
/// input returns it unchanged.
pub fn sanitize(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len());
    write_node(document.tree.root(), false, &mut out);
    out
}

fn write_node(node: NodeRef<'_, Node>, raw_text: bool, out: &mut String) {
    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(child, raw_text, out);
            }
        }
        Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_) => {}
        Node::Text(text) => {
            let text = text.replace('\r', "");
            if raw_text {
                out.push_str(&text);
            } else {
                push_escaped_text(&text, out);
            }
        }
        Node::Element(element) => {
            let name = element.name();
            if DROPPED_ELEMENTS.contains(&name) {
                return;
            }

            out.push('<');
            out.push_str(name);
            for attr in KEPT_ATTRIBUTES {
                if let Some(value) = element.attr(attr) {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    push_escaped_attr(value, out);
                    out.push('"');
                }
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&name) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&name);
            for child in node.children() {
                write_node(child, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

use crate::parsers::{Anchor, Page};
use crate::parsers::text::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Elements whose text never reaches the reader
const HIDDEN_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of text
const BLOCK_TAGS: [&str; 33] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr",
];

/// Parses HTML content to extract text and links
pub fn parse(html: &str, url: &str) -> Page {
    let doc = Html::parse_document(html);

    let root = doc
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| doc.root_element());
    let text = visible_text(root);

    let links = doc
        .select(&LINK_SELECTOR)
        .filter_map(|a| {
            a.value().attr("href").map(|href| {
                let anchor_text = collapse_whitespace(&a.text().collect::<Vec<_>>().join(" "));
                Anchor::new(anchor_text, href.trim())
            })
        })
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} links on {}", links.len(), url);
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).map(|a| &a.href).collect::<Vec<_>>()
        );
    }

    Page::new(url, text, links)
}

/// Visible text under `root`, one line per block element.
///
/// Whitespace is collapsed within each line and empty lines are dropped.
fn visible_text(root: ElementRef) -> String {
    let mut raw = String::new();
    collect_text(root, &mut raw);

    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_TAGS.contains(&name) {
        return;
    }

    let block = BLOCK_TAGS.contains(&name);
    if block {
        out.push('\n');
    }
    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            collect_text(child, out);
        } else if let Some(text) = child.value().as_text() {
            out.push(' ');
            out.push_str(text);
        }
    }
    if block {
        out.push('\n');
    }
}

//! Plain-text handling: the page parser for non-HTML bodies and the
//! normalizer applied to filtered content before it is re-segmented.

use crate::parsers::Page;

/// Parses plain text content (no links)
///
/// Each paragraph becomes one whitespace-normalized line. Wrapped lines
/// inside a paragraph are joined with spaces.
pub fn parse(text: &str, url: &str) -> Page {
    let joined = split_into_paragraphs(text)
        .iter()
        .map(|para| collapse_whitespace(&para.join(" ")))
        .collect::<Vec<_>>()
        .join("\n");

    Page::new(url, joined, Vec::new())
}

/// Splits text into paragraphs based on empty lines
pub fn split_into_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current_paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !current_paragraph.is_empty() {
                paragraphs.push(std::mem::take(&mut current_paragraph));
            }
        } else {
            current_paragraph.push(trimmed);
        }
    }

    if !current_paragraph.is_empty() {
        paragraphs.push(current_paragraph);
    }

    paragraphs
}

/// Collapses every whitespace run into a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// C0 and C1 control characters
fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}

/// Normalizes raw page text
///
/// Whitespace (including newlines and tabs) becomes a single space, every
/// other control character is removed, and the result is trimmed.
pub fn clean_text(text: &str) -> String {
    let spaced = text
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if is_control(c) {
                None
            } else {
                Some(c)
            }
        })
        .collect::<String>();

    collapse_whitespace(&spaced)
}

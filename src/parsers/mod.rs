pub mod html;
pub mod text;

/// An `<a href>` found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Visible anchor text, whitespace collapsed
    pub text: String,
    /// Raw href attribute, possibly relative
    pub href: String,
}

impl Anchor {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

/// A fetched and parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// URL the page was requested from
    pub url: String,
    /// Extracted text content
    pub text: String,
    /// Outbound links in document order
    pub links: Vec<Anchor>,
}

impl Page {
    pub fn new(url: impl Into<String>, text: impl Into<String>, links: Vec<Anchor>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            links,
        }
    }
}

/// Enum to represent the content parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML parser
    Html,
    /// Plain text parser
    Text,
}

impl ParserType {
    /// Picks a parser from the response content type, falling back to the URL
    ///
    /// Returns `None` for bodies that aren't text at all (images, archives...).
    pub fn detect(content_type: Option<&str>, url: &str) -> Option<Self> {
        let Some(content_type) = content_type else {
            return Some(Self::from_url(url));
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "" => Some(Self::from_url(url)),
            "text/plain" | "text/markdown" => {
                ::log::debug!("Classifying as Text ({}): {}", mime, url);
                Some(ParserType::Text)
            }
            "text/html" | "application/xhtml+xml" => Some(ParserType::Html),
            m if m.starts_with("text/") || m.ends_with("xml") => Some(ParserType::Html),
            _ => {
                ::log::debug!("Unsupported content type {} for {}", mime, url);
                None
            }
        }
    }

    /// Determines the parser type based on the URL
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.ends_with(".txt") || path.ends_with(".md") {
            ::log::debug!("Classifying as Text: {}", url);
            ParserType::Text
        } else {
            ParserType::Html
        }
    }
}

/// Parse a response body into a [`Page`]
pub fn parse(body: &str, url: &str, parser_type: ParserType) -> Page {
    match parser_type {
        ParserType::Html => html::parse(body, url),
        ParserType::Text => text::parse(body, url),
    }
}

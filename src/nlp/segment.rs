use crate::error::{CrawlError, Result};
use srx::SRX;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

/// Splits text into sentences.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

// Parsing the rules compiles every regex, so it happens once per process
static DEFAULT_RULES: LazyLock<Arc<SRX>> = LazyLock::new(|| {
    Arc::new(SRX::from_str(include_str!("segment.srx")).expect("the bundled rules are valid"))
});

/// Segmenter driven by [SRX](https://www.unicode.org/uli/pas/srx/srx20.html)
/// break rules.
///
/// Newlines are hard breaks: each line is segmented on its own. Within a
/// line the language is detected with `whatlang` and that language's rules
/// pick the break points. Short or ambiguous text falls back to English.
#[derive(Debug, Clone)]
pub struct SrxSegmenter {
    srx: Arc<SRX>,
}

impl SrxSegmenter {
    /// Segmenter for an SRX rules document
    pub fn from_rules(rules: &str) -> Result<Self> {
        let srx = SRX::from_str(rules)
            .map_err(|e| CrawlError::Config(format!("invalid segmentation rules: {e}")))?;
        Ok(Self { srx: Arc::new(srx) })
    }

    /// Segmenter for an SRX rules document read from `reader`
    pub fn load(reader: impl std::io::Read) -> Result<Self> {
        let srx = SRX::from_reader(reader)
            .map_err(|e| CrawlError::Config(format!("invalid segmentation rules: {e}")))?;
        Ok(Self { srx: Arc::new(srx) })
    }

    fn split_line<'t>(&self, line: &'t str) -> Vec<&'t str> {
        let language = whatlang::detect(line)
            .filter(|info| info.is_reliable())
            .map(|info| info.lang().code())
            .unwrap_or("eng");

        self.srx
            .language_rules(language)
            .split_ranges(line)
            .into_iter()
            .map(|range| &line[range])
            .collect()
    }
}

impl Default for SrxSegmenter {
    fn default() -> Self {
        Self {
            srx: DEFAULT_RULES.clone(),
        }
    }
}

impl SentenceSegmenter for SrxSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.lines()
            .flat_map(|line| self.split_line(line))
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_string)
            .collect()
    }
}

//! Choosing which links on the root page are worth following.
//!
//! Anchors are first filtered lexically (does the anchor text mention a
//! keyword?), then the survivors are fetched and kept only when their page
//! text is close enough to the keywords in TF space.

use crate::fetchers::Fetcher;
use crate::filter::{UrlFilter, resolve};
use crate::nlp::TfVectorizer;
use crate::parsers::{Anchor, Page};
use std::collections::HashSet;

/// A link that survived selection
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLink {
    /// Absolute URL
    pub url: String,
    /// Keywords found in the anchor text
    pub presence: usize,
    /// TF cosine between the linked page and the keywords
    pub score: f32,
}

/// Number of keywords appearing, case-insensitively, inside `anchor_text`
pub fn presence_score<S: AsRef<str>>(anchor_text: &str, keywords: &[S]) -> usize {
    let text = anchor_text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| text.contains(&keyword.as_ref().to_lowercase()))
        .count()
}

/// Scores and selects outbound links of a page
pub struct LinkScorer<'a> {
    fetcher: &'a dyn Fetcher,
    filter: &'a UrlFilter,
    limit: usize,
    threshold: f32,
}

impl<'a> LinkScorer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, filter: &'a UrlFilter, limit: usize, threshold: f32) -> Self {
        Self {
            fetcher,
            filter,
            limit,
            threshold,
        }
    }

    /// Anchors that mention a keyword, resolved, deduplicated and capped, in
    /// discovery order
    pub fn lexical_candidates<S: AsRef<str>>(
        &self,
        anchors: &[Anchor],
        keywords: &[S],
        base_url: &str,
    ) -> Vec<(String, usize)> {
        let mut seen = HashSet::new();
        anchors
            .iter()
            .filter_map(|anchor| {
                let presence = presence_score(&anchor.text, keywords);
                if presence == 0 {
                    return None;
                }
                let Some(url) = resolve(base_url, &anchor.href) else {
                    ::log::debug!("Cannot resolve {:?} against {}", anchor.href, base_url);
                    return None;
                };
                if self.filter.is_excluded(&url) {
                    ::log::debug!("URL filter rejected: {}", url);
                    return None;
                }
                Some((url.to_string(), presence))
            })
            .filter(|(url, _)| seen.insert(url.clone()))
            .take(self.limit)
            .collect()
    }

    /// Selects the links on `page` worth following for `keywords`.
    ///
    /// At most `limit` candidates are fetched. A candidate whose fetch fails
    /// is dropped without affecting the others.
    pub async fn select_links<S: AsRef<str>>(
        &self,
        page: &Page,
        keywords: &[S],
        base_url: &str,
    ) -> Vec<CandidateLink> {
        let candidates = self.lexical_candidates(&page.links, keywords, base_url);
        ::log::debug!(
            "{} of {} anchors passed the lexical filter",
            candidates.len(),
            page.links.len()
        );
        if candidates.is_empty() {
            return Vec::new();
        }

        let vectorizer = TfVectorizer::fit(keywords);
        let keyword_text = keywords
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");

        let mut selected = Vec::new();
        for (url, presence) in candidates {
            let linked = match self.fetcher.fetch(&url).await {
                Ok(linked) => linked,
                Err(e) => {
                    ::log::warn!("Skipping candidate {}: {}", url, e);
                    continue;
                }
            };

            let score = vectorizer.similarity(&linked.text, &keyword_text);
            if score >= self.threshold {
                ::log::debug!("Candidate {} scored {:.3}, keeping", url, score);
                selected.push(CandidateLink {
                    url,
                    presence,
                    score,
                });
            } else {
                ::log::debug!("Candidate {} scored {:.3}, below {}", url, score, self.threshold);
            }
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CrawlError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages and records what was requested
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn with_page(mut self, url: &str, text: &str) -> Self {
            self.pages.insert(url.to_string(), text.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Page> {
            self.requested.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(text) => Ok(Page::new(url, text.clone(), Vec::new())),
                None => Err(CrawlError::Http {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn root(anchors: Vec<Anchor>) -> Page {
        Page::new("https://example.com", "root", anchors)
    }

    #[test]
    fn test_presence_score() {
        let keywords = ["pricing", "Plans"];
        assert_eq!(presence_score("Pricing & plans", &keywords), 2);
        assert_eq!(presence_score("See our PRICING", &keywords), 1);
        assert_eq!(presence_score("Home", &keywords), 0);
        assert_eq!(presence_score("Anything", &[] as &[&str]), 0);
    }

    #[tokio::test]
    async fn test_keeps_lexical_match_only() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/price", "Our pricing is simple. Pricing starts at $10.")
            .with_page("https://example.com/", "Welcome home");
        let filter = UrlFilter::new("https://example.com", &[]).unwrap();
        let scorer = LinkScorer::new(&fetcher, &filter, 5, 0.3);

        let page = root(vec![Anchor::new("Pricing", "/price"), Anchor::new("Home", "/")]);
        let links = scorer
            .select_links(&page, &["pricing"], "https://example.com")
            .await;

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/price");
        assert_eq!(links[0].presence, 1);
        assert!(links[0].score >= 0.3);
        assert_eq!(fetcher.requested(), vec!["https://example.com/price"]);
    }

    #[tokio::test]
    async fn test_cap_applies_before_fetching() {
        let mut fetcher = StubFetcher::default();
        let mut anchors = Vec::new();
        for i in 0..6 {
            let url = format!("https://example.com/pricing/{i}");
            fetcher = fetcher.with_page(&url, "pricing");
            anchors.push(Anchor::new(format!("Pricing {i}"), format!("/pricing/{i}")));
        }
        let filter = UrlFilter::new("https://example.com", &[]).unwrap();

        for limit in [0, 1, 3] {
            let scorer = LinkScorer::new(&fetcher, &filter, limit, 0.3);
            let links = scorer
                .select_links(&root(anchors.clone()), &["pricing"], "https://example.com")
                .await;
            assert_eq!(links.len(), limit);
        }
        // 0 + 1 + 3 fetches in total
        assert_eq!(fetcher.requested().len(), 4);
    }

    #[tokio::test]
    async fn test_order_follows_discovery_not_score() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/a", "pricing plans and more words here")
            .with_page("https://example.com/b", "pricing plans");
        let filter = UrlFilter::new("https://example.com", &[]).unwrap();
        let scorer = LinkScorer::new(&fetcher, &filter, 5, 0.3);
        let page = root(vec![Anchor::new("pricing", "/a"), Anchor::new("plans", "/b")]);

        let links = scorer
            .select_links(&page, &["pricing", "plans"], "https://example.com")
            .await;
        let urls = links.iter().map(|l| l.url.as_str()).collect::<Vec<_>>();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[tokio::test]
    async fn test_failed_or_dissimilar_candidates_are_dropped() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/about-pricing", "The team went hiking.")
            .with_page("https://example.com/pricing", "pricing");
        let filter = UrlFilter::new("https://example.com", &[]).unwrap();
        let scorer = LinkScorer::new(&fetcher, &filter, 5, 0.3);
        let page = root(vec![
            Anchor::new("Pricing (broken)", "/missing"),
            Anchor::new("About pricing", "/about-pricing"),
            Anchor::new("Pricing", "/pricing"),
        ]);

        let links = scorer
            .select_links(&page, &["pricing"], "https://example.com")
            .await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/pricing");
    }

    #[test]
    fn test_duplicates_and_excluded_links_do_not_use_the_cap() {
        let fetcher = StubFetcher::default();
        let filter = UrlFilter::new("https://example.com", &[r"\.pdf$".to_string()]).unwrap();
        let scorer = LinkScorer::new(&fetcher, &filter, 2, 0.3);
        let anchors = vec![
            Anchor::new("Pricing PDF", "/pricing.pdf"),
            Anchor::new("Pricing", "/pricing"),
            Anchor::new("Pricing again", "/pricing"),
            Anchor::new("Enterprise pricing", "/enterprise"),
        ];

        let candidates = scorer.lexical_candidates(&anchors, &["pricing"], "https://example.com");
        assert_eq!(
            candidates,
            vec![
                ("https://example.com/pricing".to_string(), 1),
                ("https://example.com/enterprise".to_string(), 1),
            ]
        );
    }
}

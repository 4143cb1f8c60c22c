//! Keyword matching over headings and links.
//!
//! # Policy
//!
//! Only `h1`, `h2` and `a` elements are considered, in document order. The
//! **first** element whose text contains the keyword (case-insensitive
//! substring) wins and scanning stops; later, possibly better, matches on
//! the same page are ignored. A page that lists its newest article first
//! therefore reports its newest matching article.
//!
//! # Link extraction
//!
//! The matched element's link is, in order of preference:
//! 1. its own `href`
//! 2. the first `a[href]` inside it (`<h2><a href=..>Title</a></h2>`)
//! 3. the page URL itself
//!
//! A link wrapping a heading (`<a href=..><h2>Title</h2></a>`) is itself a
//! candidate that precedes the heading, so it matches with its own `href`.
//!
//! Fragment-only, `javascript:` and `mailto:` hrefs do not count as links.

use crate::config::SentimentSource;
use crate::error::ParseError;
use crate::models::Match;
use crate::normalize::{normalize, resolve};
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

const CANDIDATE_SELECTOR: &str = "h1, h2, a";
const LINK_SELECTOR: &str = "a[href]";
const BODY_SELECTOR: &str = "body";

/// Finds the first heading or link mentioning a keyword.
#[derive(Debug)]
pub struct KeywordMatcher {
    candidates: Selector,
    links: Selector,
    body: Selector,
    sentiment_source: SentimentSource,
}

impl KeywordMatcher {
    /// Build a matcher. `sentiment_source` decides which text ends up in
    /// [`Match::source_text`] and is fixed for the matcher's lifetime.
    pub fn new(sentiment_source: SentimentSource) -> Result<Self, ParseError> {
        Ok(Self {
            candidates: selector(CANDIDATE_SELECTOR)?,
            links: selector(LINK_SELECTOR)?,
            body: selector(BODY_SELECTOR)?,
            sentiment_source,
        })
    }

    /// Scan `content` for the first element whose text contains `keyword`.
    ///
    /// `page_url` is the target's own URL: relative links are resolved
    /// against it and it is the fallback link when the element has none.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(match))` for the first matching element
    /// - `Ok(None)` if nothing matches, or the keyword is blank
    /// - `Err(ParseError::EmptyDocument)` if `content` is blank
    #[instrument(level = "debug", skip(self, content), fields(bytes = content.len()))]
    pub fn find_first(
        &self,
        content: &str,
        page_url: &str,
        keyword: &str,
    ) -> Result<Option<Match>, ParseError> {
        if content.trim().is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        // Element text has its whitespace collapsed; the keyword must match that form.
        let needle = collapse_whitespace(keyword).to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let document = Html::parse_document(content);
        let Some(element) = document
            .select(&self.candidates)
            .find(|el| element_text(el).to_lowercase().contains(&needle))
        else {
            debug!("No heading or link contains the keyword");
            return Ok(None);
        };

        let heading = element_text(&element);
        let link = match self.link_of(&element) {
            Some(href) => resolve(page_url, href),
            None => normalize(page_url),
        };
        let source_text = match self.sentiment_source {
            SentimentSource::Heading => heading.clone(),
            SentimentSource::Body => document
                .select(&self.body)
                .next()
                .map(|body| element_text(&body))
                .unwrap_or_else(|| heading.clone()),
        };

        debug!(%heading, %link, tag = element.value().name(), "Keyword matched");
        Ok(Some(Match {
            heading,
            link,
            source_text,
        }))
    }

    fn link_of<'a>(&self, element: &ElementRef<'a>) -> Option<&'a str> {
        usable_href(element).or_else(|| {
            element
                .select(&self.links)
                .find_map(|a| usable_href(&a))
        })
    }
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()))
}

fn usable_href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let href = element.value().attr("href")?.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return None;
    }
    Some(href)
}

/// Text content of an element with whitespace runs collapsed.
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com";

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(SentimentSource::Heading).unwrap()
    }

    #[test]
    fn test_heading_wrapping_link_resolves_relative_href() {
        let html = r#"<html><body>
            <h1>Example News</h1>
            <h2><a href="/posts/1">Product launch announced</a></h2>
        </body></html>"#;
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.heading, "Product launch announced");
        assert_eq!(found.link, "https://example.com/posts/1");
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let html = r#"<a href="/a">RELAUNCHING the site</a>"#;
        let found = matcher().find_first(html, PAGE, "Launch").unwrap().unwrap();
        assert_eq!(found.heading, "RELAUNCHING the site");
        assert_eq!(found.link, "https://example.com/a");
    }

    #[test]
    fn test_first_in_document_order_wins() {
        let html = r#"<body>
            <h2><a href="/posts/2">Second launch</a></h2>
            <h2><a href="/posts/1">First launch</a></h2>
        </body>"#;
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.link, "https://example.com/posts/2");
        assert_eq!(found.heading, "Second launch");
    }

    #[test]
    fn test_heading_without_link_falls_back_to_page_url() {
        let html = r#"<body><h1>Launch week</h1><p>no links</p></body>"#;
        let found = matcher()
            .find_first(html, "https://example.com/news/", "launch")
            .unwrap()
            .unwrap();
        assert_eq!(found.link, "https://example.com/news");
    }

    #[test]
    fn test_link_wrapping_heading_matches_on_the_link() {
        let html = r#"<div><a href="https://other.org/story/"><h2>Launch day</h2></a></div>"#;
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.link, "https://other.org/story");
        assert_eq!(found.heading, "Launch day");
    }

    #[test]
    fn test_heading_skips_unusable_inner_link() {
        let html = r##"<h2>Launch <a href="#">permalink</a> <a href="/posts/9">read</a></h2>"##;
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.link, "https://example.com/posts/9");
    }

    #[test]
    fn test_fragment_and_javascript_links_are_ignored() {
        let html = r##"<a href="#top">launch</a><a href="javascript:void(0)">launch</a>"##;
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.link, "https://example.com");
    }

    #[test]
    fn test_paragraph_text_is_not_scanned() {
        let html = r#"<body><p>launch in a paragraph</p><h3>launch in h3</h3></body>"#;
        assert!(matcher().find_first(html, PAGE, "launch").unwrap().is_none());
    }

    #[test]
    fn test_blank_keyword_never_matches() {
        let html = r#"<h1>Anything</h1>"#;
        assert!(matcher().find_first(html, PAGE, "   ").unwrap().is_none());
    }

    #[test]
    fn test_empty_document_is_parse_error() {
        let err = matcher().find_first("  \n ", PAGE, "launch").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDocument));
    }

    #[test]
    fn test_heading_whitespace_is_collapsed() {
        let html = "<h2>\n   Big\n   <em>launch</em>   today </h2>";
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.heading, "Big launch today");
    }

    #[test]
    fn test_keyword_with_repeated_whitespace_matches() {
        let html = "<h2>Big  launch</h2>";
        let found = matcher()
            .find_first(html, PAGE, "big  launch")
            .unwrap()
            .unwrap();
        assert_eq!(found.heading, "Big launch");

        let html = "<h2>Big\n   launch</h2>";
        assert!(matcher().find_first(html, PAGE, " Big\tlaunch ").unwrap().is_some());
    }

    #[test]
    fn test_body_policy_carries_page_text() {
        let matcher = KeywordMatcher::new(SentimentSource::Body).unwrap();
        let html = r#"<body><h2>Launch</h2><p>A terrible failure.</p></body>"#;
        let found = matcher.find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.heading, "Launch");
        assert_eq!(found.source_text, "Launch A terrible failure.");
    }

    #[test]
    fn test_heading_policy_carries_heading_text() {
        let html = r#"<body><h2>Launch</h2><p>A terrible failure.</p></body>"#;
        let found = matcher().find_first(html, PAGE, "launch").unwrap().unwrap();
        assert_eq!(found.source_text, "Launch");
    }
}

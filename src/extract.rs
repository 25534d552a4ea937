// Link extraction: find LinkedIn profile and company URLs in message text
// and pair each one with the sender's display name.

use std::collections::BTreeSet;
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::api::Message;

/// Absolute `http(s)` URLs on linkedin.com (optionally behind a 2-3 letter
/// subdomain such as `www.` or `uk.`) pointing at `/in/`, `/pub/` or
/// `/company/` followed by one slug segment. The trailing slash is kept
/// when present.
pub const LINKEDIN_PATTERN: &str =
    r"https?://(?:[a-z]{2,3}\.)?linkedin\.com/(?:in|pub|company)/[a-zA-Z0-9\-_%]+/?";

/// Sender name used when a message has none.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// A `(sender, url)` pair. Ordering is by sender, then by URL, both
/// case-sensitive, and two pairs are equal only if both parts match exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtractedLink {
    pub sender: String,
    pub url: String,
}

impl ExtractedLink {
    pub fn new(sender: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            url: url.into(),
        }
    }
}

/// Renders the line written to the console and the output file.
impl fmt::Display for ExtractedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {} - LinkedIn URL: {}", self.sender, self.url)
    }
}

/// Links gathered across the whole run, kept sorted and free of duplicates.
pub type LinkSet = BTreeSet<ExtractedLink>;

/// Owns the compiled pattern. Build one per run and reuse it for every page.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(LINKEDIN_PATTERN)
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    /// All non-overlapping matches in `text`, verbatim and in order.
    pub fn find_urls<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern.find_iter(text).map(|m| m.as_str())
    }

    /// Scan one page of messages and add every `(sender, url)` found to
    /// `links`. Returns how many pairs were new to the set.
    pub fn collect_into(&self, messages: &[Message], links: &mut LinkSet) -> usize {
        let mut added = 0;
        for message in messages {
            let text = message.text.as_deref().unwrap_or_default();
            let sender = message.name.as_deref().unwrap_or(UNKNOWN_SENDER);
            for url in self.find_urls(text) {
                if links.insert(ExtractedLink::new(sender, url)) {
                    added += 1;
                }
            }
        }
        added
    }
}

// Message pagination: walk a group's history from newest to oldest, one
// page at a time, feeding each page to the link extractor before the next
// page is requested. Pages are dropped once scanned.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::api::{ApiError, MessageSource};
use crate::extract::{LinkExtractor, LinkSet};

/// Running totals reported after each page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestProgress {
    pub pages: usize,
    pub messages: usize,
    pub links: usize,
}

/// Result of walking a group's history.
#[derive(Debug)]
pub struct Harvest {
    pub links: LinkSet,
    pub progress: HarvestProgress,
    /// Set when a page request failed. Pagination stopped there, so `links`
    /// covers only the newer part of the history.
    pub error: Option<ApiError>,
}

impl Harvest {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetch every page of `group_id` and extract links from each.
///
/// The first request has no cursor; each later one passes the id of the
/// last (oldest) message of the previous page as `before_id`. The walk ends
/// on the first empty page or the first failed request, and `delay` is
/// slept between consecutive requests.
pub fn harvest_links<S, F>(
    source: &S,
    group_id: &str,
    extractor: &LinkExtractor,
    delay: Duration,
    mut on_page: F,
) -> Harvest
where
    S: MessageSource + ?Sized,
    F: FnMut(&HarvestProgress),
{
    let mut links = LinkSet::new();
    let mut progress = HarvestProgress::default();
    let mut before_id: Option<String> = None;

    let error = loop {
        let messages = match source.fetch_messages(group_id, before_id.as_deref()) {
            Ok(messages) => messages,
            Err(e) => break Some(e),
        };
        let Some(oldest) = messages.last() else {
            break None;
        };

        let added = extractor.collect_into(&messages, &mut links);
        progress.pages += 1;
        progress.messages += messages.len();
        progress.links = links.len();
        debug!(
            group_id,
            page = progress.pages,
            size = messages.len(),
            added,
            before_id = ?before_id,
            "scanned message page"
        );
        on_page(&progress);

        before_id = Some(oldest.id.clone());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    };

    Harvest {
        links,
        progress,
        error,
    }
}

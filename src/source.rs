use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;

const ADJECTIVES: [&str; 8] = [
    "Quiet", "Rusty", "Amber", "Hollow", "Bright", "Frozen", "Velvet", "Swift",
];
const NOUNS: [&str; 7] = ["Harbor", "Signal", "Orchard", "Lantern", "Circuit", "Meadow", "Relay"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: u64,
    pub title: String,
    /// Rows the item occupies in a staggered layout.
    pub height: u16,
}

impl FeedItem {
    pub fn new(id: u64) -> Self {
        let adjective = ADJECTIVES[(id % ADJECTIVES.len() as u64) as usize];
        let noun = NOUNS[((id / ADJECTIVES.len() as u64) % NOUNS.len() as u64) as usize];
        Self {
            id,
            title: format!("{adjective} {noun} #{id}"),
            height: 1 + (id % 3) as u16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<FeedItem>,
    pub has_more: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Injected failure, see `fail_every`.
    #[error("page {page} unavailable")]
    Unavailable { page: usize },
    #[error("page {page} is past the end of the feed")]
    OutOfRange { page: usize },
}

impl SourceError {
    /// Short text for the status row.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable { page } => format!("Could not load page {}.", page + 1),
            Self::OutOfRange { .. } => "Nothing left to load.".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceConfig {
    pub page_size: usize,
    pub max_pages: usize,
    pub latency: Duration,
    /// Fail every Nth request. `None` or zero never fails.
    pub fail_every: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_pages: 5,
            latency: Duration::from_millis(600),
            fail_every: None,
        }
    }
}

/// A simulated remote feed that serves fixed-size pages after a delay.
#[derive(Debug, Clone)]
pub struct PagedSource {
    config: SourceConfig,
    requests: Arc<AtomicU64>,
}

impl PagedSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub async fn fetch_page(&self, page: usize) -> Result<Page, SourceError> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        if self
            .config
            .fail_every
            .is_some_and(|n| n > 0 && request % n == 0)
        {
            return Err(SourceError::Unavailable { page });
        }
        if page >= self.config.max_pages {
            return Err(SourceError::OutOfRange { page });
        }

        let start = (page * self.config.page_size) as u64;
        let items = (start..start + self.config.page_size as u64)
            .map(FeedItem::new)
            .collect();
        Ok(Page {
            items,
            has_more: page + 1 < self.config.max_pages,
        })
    }
}

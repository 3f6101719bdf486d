use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ScrapeError;
use crate::scrape::BookingSource;

/// Serves pages saved from the portal instead of fetching them.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    overview: String,
    details: HashMap<String, String>,
}

impl SnapshotSource {
    pub fn new(overview: impl Into<String>) -> Self {
        Self {
            overview: overview.into(),
            details: HashMap::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    /// Registers the conversation page served for `link`.
    pub fn with_detail(mut self, link: impl Into<String>, html: impl Into<String>) -> Self {
        self.details.insert(link.into(), html.into());
        self
    }
}

impl BookingSource for SnapshotSource {
    fn fetch_overview(&mut self) -> Result<String, ScrapeError> {
        Ok(self.overview.clone())
    }

    fn fetch_detail(&mut self, link: &str) -> Result<String, ScrapeError> {
        self.details.get(link).cloned().ok_or(ScrapeError::Status(404))
    }
}

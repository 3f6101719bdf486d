use thiserror::Error;

/// Failures that abort a whole extraction batch.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("portal answered HTTP {0}")]
    Status(u16),

    #[error("login rejected (HTTP {0})")]
    LoginFailed(u16),

    #[error("not logged in to the portal")]
    NotLoggedIn,

    #[error("unexpected page structure: {0}")]
    Structure(String),

    #[error("invalid portal url: {0}")]
    Url(String),

    #[error("could not read page snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures scoped to one list item; the item is skipped.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("price/arrival/departure block has unexpected layout: {0}")]
    MetaLayout(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed bookings file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine home directory")]
    NoDataDir,
}

impl StoreError {
    /// The bookings file does not exist yet.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("departure {departure} is before arrival {arrival}")]
    DepartureBeforeArrival { arrival: String, departure: String },
}

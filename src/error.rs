use thiserror::Error;

/// Failures the tracking core can report.
///
/// A retailer confirming a page is gone, or a variant missing from an
/// otherwise valid page, is not an error: both are recorded as
/// observations. Everything here aborts processing of a single order.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("no adapter registered for retailer \"{retailer_id}\"")]
    AdapterNotFound { retailer_id: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid selector \"{selector}\": {message}")]
    Selector { selector: String, message: String },

    #[error("persistence error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl TrackError {
    /// Processing step a failure belongs to, for cycle reports and logs.
    pub fn step(&self) -> &'static str {
        match self {
            Self::AdapterNotFound { .. } => "resolve-adapter",
            Self::Http(_) | Self::Fetch { .. } | Self::UnexpectedStatus { .. } => "fetch",
            Self::Selector { .. } => "parse",
            Self::Store(_) | Self::Migrate(_) => "persist",
        }
    }
}

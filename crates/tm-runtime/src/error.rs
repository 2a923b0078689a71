//! Error types for the reconciliation runtime

use tm_core::TabId;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by collaborators and persisted state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Persistence read or write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored value has the wrong shape
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Page mutation or page dialog failed (tab gone, permission denied)
    #[error("Page error on tab {tab_id}: {message}")]
    Page { tab_id: TabId, message: String },

    /// Tab inventory or tab control failed
    #[error("Tab error: {0}")]
    Tab(String),

    /// Timer registration failed
    #[error("Timer error: {0}")]
    Timer(String),
}

impl Error {
    pub fn page(tab_id: TabId, message: impl Into<String>) -> Self {
        Error::Page {
            tab_id,
            message: message.into(),
        }
    }
}

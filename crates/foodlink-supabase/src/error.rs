use thiserror::Error;

/// Errors returned by the store table client.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("request to the store table failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body was not a JSON array of store rows.
    #[error("store table response from {context} is not a JSON array: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

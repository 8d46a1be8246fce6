use thiserror::Error;

/// Errors from the upstream geodata services.
#[derive(Debug, Error)]
pub enum GeodataError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("status {0}")]
    Status(u16),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A configured service base URL is not a valid URL.
    #[error("invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

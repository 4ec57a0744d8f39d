use thiserror::Error;

/// Errors returned by the DataForSEO SERP client.
#[derive(Debug, Error)]
pub enum DataForSeoError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials were rejected. Fatal for the whole request since both
    /// SERP legs share them. The message is the provider's status text,
    /// never the credentials themselves.
    #[error("DataForSEO authentication failed: {0}")]
    Auth(String),

    /// The account is out of funds or over its rate limits. Fatal like
    /// [`DataForSeoError::Auth`]: both SERP legs draw on the same
    /// account, so the other leg cannot succeed either.
    #[error("DataForSEO quota exhausted: {0}")]
    Quota(String),

    /// The API answered with a non-success envelope or task status.
    #[error("DataForSEO API error: {0}")]
    Api(String),

    /// Depth outside the permitted range; rejected before any network call.
    #[error("invalid depth {depth}: must be between 1 and {max}")]
    InvalidDepth { depth: u32, max: u32 },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DataForSeoError {
    /// Whether the error dooms the whole ranking request rather than just
    /// the leg it occurred on.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DataForSeoError::Auth(_)
                | DataForSeoError::Quota(_)
                | DataForSeoError::InvalidDepth { .. }
        )
    }
}

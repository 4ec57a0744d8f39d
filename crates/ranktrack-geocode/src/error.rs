use thiserror::Error;

/// Errors from the geocoding provider chain.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provider answered 2xx but the body did not match its documented shape.
    #[error("unexpected {provider} response: {reason}")]
    UnexpectedResponse { provider: String, reason: String },

    /// The provider returned a well-formed response with zero candidates.
    #[error("{provider} returned no candidates for \"{query}\"")]
    NoCandidates { provider: String, query: String },

    /// Every provider in the chain failed or returned zero candidates.
    /// Carries the attempted-provider list and the last underlying error.
    #[error("all geocoding providers failed ({}): {last_error}", .attempted.join(", "))]
    AllProvidersFailed {
        attempted: Vec<String>,
        last_error: String,
    },
}

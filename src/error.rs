//! Error taxonomy for repository fetches.

use thiserror::Error;

/// Errors returned by every [`GitHubFetcher`](crate::github::GitHubFetcher) operation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher was built without a transport.
    #[error("GitHub client is not configured")]
    MissingClient,

    /// The identifier is not a well-formed `owner/name` pair.
    #[error("Invalid GitHub repository: {0}")]
    InvalidRepositoryIdentifier(String),

    /// A request made on behalf of the operation failed.
    #[error(transparent)]
    RemoteFetchFailed(#[from] RemoteError),
}

/// Underlying cause of a [`FetchError::RemoteFetchFailed`].
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("GitHub API returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to parse JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A `rel="next"` link that will not be followed: another host, a page
    /// already fetched, or past the page limit.
    #[error("Refusing to follow next page {url}: {reason}")]
    Pagination { url: String, reason: String },
}

impl RemoteError {
    /// URL of the request that failed, or of the next page that was refused.
    pub fn url(&self) -> &str {
        match self {
            RemoteError::Status { url, .. }
            | RemoteError::Transport { url, .. }
            | RemoteError::Decode { url, .. }
            | RemoteError::Pagination { url, .. } => url,
        }
    }

    /// HTTP status, when the server answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

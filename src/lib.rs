pub mod config;
pub mod error;
pub mod github;
pub mod http;

pub use config::Config;
pub use error::{FetchError, RemoteError};
pub use github::{GitHubFetcher, ReleaseNames, RepoId, RepoMetadata, TreePaths};
pub use http::{HttpClient, HttpResponse, Transport};

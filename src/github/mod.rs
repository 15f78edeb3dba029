//! GitHub repository facts: metadata, file tree and release names.

mod fetcher;
mod link;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

pub use fetcher::{DEFAULT_API_URL, FALLBACK_BRANCH, GitHubFetcher};
pub use link::next_page_url;

/// Repository identifier (owner/name format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(FetchError::InvalidRepositoryIdentifier(s.to_string()))
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                name: parts[1].to_string(),
            })
        }
    }
}

/// Descriptive metadata of a repository. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub description: String,
    pub homepage: String,
}

/// Paths of every file in a tree.
pub type TreePaths = BTreeSet<String>;

/// Display names of the published releases, tag-only releases excluded.
pub type ReleaseNames = BTreeSet<String>;

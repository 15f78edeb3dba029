use std::collections::HashSet;

use log::{debug, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::{FetchError, RemoteError};
use crate::http::Transport;

use super::link::next_page_url;
use super::{ReleaseNames, RepoId, RepoMetadata, TreePaths};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Branch used for the tree when the repository payload names no default branch.
pub const FALLBACK_BRANCH: &str = "master";

const RELEASES_PER_PAGE: u32 = 100;

/// Limit to 100 pages (10000 releases) so a misbehaving `Link` header cannot loop forever.
const MAX_RELEASE_PAGES: usize = 100;

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct RepoInfo {
        pub description: Option<String>,
        pub homepage: Option<String>,
        pub default_branch: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Tree {
        #[serde(default)]
        pub tree: Vec<TreeEntry>,
        #[serde(default)]
        pub truncated: bool,
    }

    #[derive(Deserialize, Debug)]
    pub struct TreeEntry {
        pub path: String,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    impl TreeEntry {
        /// Directories (`tree`) and submodules (`commit`) are not files.
        pub fn is_file(&self) -> bool {
            !matches!(self.kind.as_deref(), Some("tree") | Some("commit"))
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub name: Option<String>,
    }
}

/// Read-only facade over the GitHub REST API for a single repository at a time.
///
/// The transport is borrowed: the fetcher never builds, closes or reconfigures
/// it. A fetcher built with [`GitHubFetcher::default`] has no transport and
/// every fetch fails with [`FetchError::MissingClient`].
pub struct GitHubFetcher<'a> {
    client: Option<&'a dyn Transport>,
    api_url: String,
}

impl Default for GitHubFetcher<'_> {
    fn default() -> Self {
        Self {
            client: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl<'a> GitHubFetcher<'a> {
    /// Create a fetcher against the public GitHub API.
    pub fn new(client: &'a dyn Transport) -> Self {
        Self::with_api_url(Some(client), DEFAULT_API_URL)
    }

    /// Create a fetcher against a custom API URL (GitHub Enterprise, test servers).
    pub fn with_api_url(client: Option<&'a dyn Transport>, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL every request is built from, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether a transport is bound; without one every fetch fails with `MissingClient`.
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Split an `owner/name` identifier.
    pub fn parse_full_name(&self, identifier: &str) -> Result<RepoId, FetchError> {
        identifier.parse()
    }

    /// Fetch the description and homepage of a repository.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_repository(&self, identifier: &str) -> Result<RepoMetadata, FetchError> {
        let (client, repo) = self.prepare(identifier)?;
        let info = self.fetch_repo_info(client, &repo).await?;

        Ok(RepoMetadata {
            description: info.description.unwrap_or_default(),
            homepage: info.homepage.unwrap_or_default(),
        })
    }

    /// Fetch every file path at the tip of the repository's default branch.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_tree(&self, identifier: &str) -> Result<TreePaths, FetchError> {
        let (client, repo) = self.prepare(identifier)?;
        let info = self.fetch_repo_info(client, &repo).await?;

        let branch = match info.default_branch.filter(|b| !b.is_empty()) {
            Some(branch) => branch,
            None => {
                debug!(
                    "{} reports no default branch, using {}",
                    repo, FALLBACK_BRANCH
                );
                FALLBACK_BRANCH.to_string()
            }
        };

        self.fetch_tree_paths(client, &repo, &branch).await
    }

    /// Fetch every file path at the tip of `branch`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_tree_at(
        &self,
        identifier: &str,
        branch: &str,
    ) -> Result<TreePaths, FetchError> {
        let (client, repo) = self.prepare(identifier)?;
        self.fetch_tree_paths(client, &repo, branch).await
    }

    /// Fetch the display names of all releases, following pagination.
    ///
    /// Tag-only releases (no display name) are left out. A failure on any
    /// page fails the whole call, as does a next link that leaves the API
    /// host, repeats a fetched page or runs past the page limit.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_releases(&self, identifier: &str) -> Result<ReleaseNames, FetchError> {
        let (client, repo) = self.prepare(identifier)?;

        let mut first = self.repo_url(&repo, ["releases"])?;
        first
            .query_pairs_mut()
            .append_pair("per_page", &RELEASES_PER_PAGE.to_string());

        let mut names = ReleaseNames::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut next = Some(first);

        while let Some(url) = next {
            if visited.len() >= MAX_RELEASE_PAGES {
                return Err(RemoteError::Pagination {
                    url: url.to_string(),
                    reason: format!("more than {} pages", MAX_RELEASE_PAGES),
                }
                .into());
            }
            visited.insert(url.to_string());

            debug!("Fetching releases page {} from {}...", visited.len(), url);

            let (releases, link): (Vec<api::Release>, _) =
                get_json(client, url.as_str()).await?;

            names.extend(
                releases
                    .into_iter()
                    .filter_map(|release| release.name)
                    .filter(|name| !name.is_empty()),
            );

            next = match link.as_deref().and_then(next_page_url) {
                Some(target) => Some(self.next_page(&target, &visited)?),
                None => None,
            };
        }

        Ok(names)
    }

    /// Client check first, then identifier parsing; neither touches the network.
    fn prepare(&self, identifier: &str) -> Result<(&'a dyn Transport, RepoId), FetchError> {
        let client = self.client.ok_or(FetchError::MissingClient)?;
        let repo = self.parse_full_name(identifier)?;
        Ok((client, repo))
    }

    fn base_url(&self) -> Result<Url, RemoteError> {
        Url::parse(&self.api_url).map_err(|e| RemoteError::Transport {
            url: self.api_url.clone(),
            source: e.into(),
        })
    }

    /// `{api_url}/repos/{owner}/{name}/{tail..}` with every segment percent-encoded.
    fn repo_url<'s>(
        &self,
        repo: &'s RepoId,
        tail: impl IntoIterator<Item = &'s str>,
    ) -> Result<Url, RemoteError> {
        let mut url = self.base_url()?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport {
                url: self.api_url.clone(),
                source: "API URL cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
            .extend(tail);
        Ok(url)
    }

    /// Validates a `rel="next"` target before anything is sent to it.
    fn next_page(&self, target: &str, visited: &HashSet<String>) -> Result<Url, RemoteError> {
        let refuse = |reason: String| RemoteError::Pagination {
            url: target.to_string(),
            reason,
        };

        let url = Url::parse(target).map_err(|e| refuse(format!("invalid URL: {}", e)))?;

        // Requests carry the bearer token; stay on the API origin.
        if url.origin() != self.base_url()?.origin() {
            return Err(refuse(format!("points outside {}", self.api_url)));
        }
        if visited.contains(url.as_str()) {
            return Err(refuse("page was already fetched".to_string()));
        }

        Ok(url)
    }

    async fn fetch_repo_info(
        &self,
        client: &dyn Transport,
        repo: &RepoId,
    ) -> Result<api::RepoInfo, RemoteError> {
        let url = self.repo_url(repo, std::iter::empty())?;
        debug!("Fetching repo info from {}...", url);
        let (info, _) = get_json(client, url.as_str()).await?;
        Ok(info)
    }

    async fn fetch_tree_paths(
        &self,
        client: &dyn Transport,
        repo: &RepoId,
        branch: &str,
    ) -> Result<TreePaths, FetchError> {
        // Slashes in branch names stay path separators; everything else is encoded.
        let mut url = self.repo_url(repo, ["git", "trees"].into_iter().chain(branch.split('/')))?;
        url.query_pairs_mut().append_pair("recursive", "1");
        debug!("Fetching tree from {}...", url);

        let (tree, _): (api::Tree, _) = get_json(client, url.as_str()).await?;

        if tree.truncated {
            warn!(
                "Tree listing for {}@{} was truncated by GitHub; some paths are missing",
                repo, branch
            );
        }

        Ok(tree
            .tree
            .into_iter()
            .filter(api::TreeEntry::is_file)
            .map(|entry| entry.path)
            .collect())
    }
}

/// GET `url` and decode a JSON body, returning it with the raw `Link` header.
async fn get_json<T: DeserializeOwned>(
    client: &dyn Transport,
    url: &str,
) -> Result<(T, Option<String>), RemoteError> {
    let response = client
        .get(url)
        .await
        .map_err(|e| RemoteError::Transport {
            url: url.to_string(),
            source: e.into(),
        })?;

    if !response.is_success() {
        return Err(RemoteError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    let parsed = response.json::<T>().map_err(|source| RemoteError::Decode {
        url: url.to_string(),
        source,
    })?;

    Ok((parsed, response.link))
}

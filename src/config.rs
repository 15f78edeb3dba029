use anyhow::Result;
use log::debug;

use crate::github::DEFAULT_API_URL;
use crate::http::{HttpClient, build_http_client};

/// Connection settings for the GitHub API.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

impl Config {
    /// Blank values are treated as unset.
    pub fn new(api_url: Option<String>, token: Option<String>) -> Self {
        let api_url = api_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = token.filter(|t| !t.trim().is_empty());

        if let Some(token) = &token {
            debug!("Using GitHub token for authentication: {}", mask_token(token));
        }

        Self { api_url, token }
    }

    /// Build the HTTP client shared by every fetch made with this configuration.
    pub fn build_client(&self) -> Result<HttpClient> {
        build_http_client(self.token.as_deref())
    }
}

/// Keeps the first 8 and last 4 characters of long tokens; short ones are hidden entirely.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 16 {
        return "*********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

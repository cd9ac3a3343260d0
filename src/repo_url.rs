//! Validation and extraction of GitHub repository links.
//!
//! Only the strict form is accepted: `https://github.com/<owner>/<repo>`,
//! optionally followed by `.git` and/or a trailing slash. Bare `owner/repo`
//! text, any other host or scheme, and links carrying a port or credentials
//! are rejected.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Result, SnapRepoError};
use crate::models::RepoRef;

const GITHUB_HOST: &str = "github.com";

/// Parse a pasted repository link into its owner and repository name.
pub fn parse_github_url(link: &str) -> Result<RepoRef> {
    if link.trim().is_empty() {
        return Err(SnapRepoError::InvalidRepoUrl("link is empty".to_string()));
    }

    let url = Url::parse(link)
        .map_err(|e| SnapRepoError::InvalidRepoUrl(format!("{}: {}", link, e)))?;

    if url.scheme() != "https" {
        return Err(SnapRepoError::InvalidRepoUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if url.host_str() != Some(GITHUB_HOST) {
        return Err(SnapRepoError::InvalidRepoUrl(format!(
            "host must be {}, got {}",
            GITHUB_HOST,
            url.host_str().unwrap_or("<none>")
        )));
    }

    if url.port().is_some() || !url.username().is_empty() || url.password().is_some() {
        return Err(SnapRepoError::InvalidRepoUrl(
            "port and credentials are not allowed".to_string(),
        ));
    }

    // One trailing slash, then one trailing ".git"
    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_suffix(".git").unwrap_or(path);

    let decoded = path
        .split('/')
        .map(decode_segment)
        .collect::<Result<Vec<_>>>()?;
    let segments: Vec<&str> = decoded
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [owner, repo] => Ok(RepoRef::new(*owner, *repo)),
        _ => Err(SnapRepoError::InvalidRepoUrl(format!(
            "expected /<owner>/<repo>, got {} path segment(s)",
            segments.len()
        ))),
    }
}

/// `Url` keeps the path percent-encoded; owner and repo are compared decoded.
fn decode_segment(segment: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| SnapRepoError::InvalidRepoUrl(format!("path is not UTF-8: {}", e)))
}

pub fn is_valid_github_url(link: &str) -> bool {
    parse_github_url(link).is_ok()
}

/// Canonical link for a repository reference.
pub fn canonical_url(repo: &RepoRef) -> String {
    format!("https://{}/{}/{}", GITHUB_HOST, repo.owner, repo.repo)
}

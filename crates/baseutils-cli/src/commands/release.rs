// Rust guideline compliant 2026-02-06

//! Implementation of the `baseutils release` command.

use anyhow::Result;
use baseutils_core::discover_github_latest_patch_release;

/// Builds the releases API URL for `owner/name`.
pub fn releases_url(repo: &str) -> String {
    format!("https://api.github.com/repos/{}/releases", repo.trim_matches('/'))
}

/// Prints the newest patch release tag for `version`.
///
/// # Arguments
///
/// * `version` - `MAJOR.MINOR` or `MAJOR.MINOR.PATCH`
/// * `repo` - GitHub `owner/name`
/// * `url` - Explicit releases URL, overriding `repo`
///
/// # Errors
///
/// Returns an error if neither `repo` nor `url` is given, or discovery fails.
pub fn execute(version: &str, repo: Option<String>, url: Option<String>) -> Result<()> {
    let url = match (url, repo) {
        (Some(url), _) => url,
        (None, Some(repo)) => releases_url(&repo),
        (None, None) => anyhow::bail!("Provide --repo <owner/name> or --url <releases url>"),
    };
    let tag = discover_github_latest_patch_release(version, &url)?;
    println!("{}", tag);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_releases_url() {
        assert_eq!(
            releases_url("kubernetes/kubernetes/"),
            "https://api.github.com/repos/kubernetes/kubernetes/releases"
        );
    }
}

// Rust guideline compliant 2026-02-06

//! Discovering the newest patch release of a GitHub project.

use crate::{Error, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on release pages fetched from the API.
const MAX_PAGES: u32 = 10;
const PER_PAGE: u32 = 100;

/// A release entry as returned by the GitHub releases API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Git tag of the release, e.g. `v1.16.3`.
    pub tag_name: String,
    /// Whether the release is an unpublished draft.
    #[serde(default)]
    pub draft: bool,
    /// Whether the release is marked as a prerelease.
    #[serde(default)]
    pub prerelease: bool,
}

/// Extracts `(major, minor)` from `MAJOR.MINOR[.PATCH]`, with an optional `v`.
fn parse_minor(version: &str) -> Result<(u64, u64)> {
    let trimmed = version.trim().trim_start_matches('v');
    let mut parts = trimmed.split('.');
    let mut next = || -> Result<u64> {
        parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| Error::InvalidVersion(version.to_string()))
    };
    Ok((next()?, next()?))
}

fn parse_tag(tag: &str) -> Option<Version> {
    Version::parse(tag.trim_start_matches('v')).ok()
}

/// Picks the newest stable release sharing `version`'s major.minor.
///
/// Any patch component in `version` is ignored, so `1.16` and `1.16.1`
/// select the same release.
///
/// # Errors
///
/// Returns an error if `version` is malformed or no release matches.
pub fn latest_patch_release(version: &str, releases: &[Release]) -> Result<String> {
    let (major, minor) = parse_minor(version)?;
    releases
        .iter()
        .filter(|release| !release.draft && !release.prerelease)
        .filter_map(|release| parse_tag(&release.tag_name).map(|parsed| (parsed, release)))
        .filter(|(parsed, _)| parsed.major == major && parsed.minor == minor && parsed.pre.is_empty())
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, release)| release.tag_name.clone())
        .ok_or_else(|| Error::NoMatchingRelease(version.to_string()))
}

/// Fetches the releases at `releases_url` and returns the newest patch tag.
///
/// `releases_url` is a GitHub releases endpoint such as
/// `https://api.github.com/repos/kubernetes/kubernetes/releases`. Pages are
/// fetched until an empty page is returned.
///
/// # Errors
///
/// Returns an error if:
/// - `version` is malformed
/// - Any request fails or returns a non-success status
/// - No release matches
pub fn discover_github_latest_patch_release(version: &str, releases_url: &str) -> Result<String> {
    parse_minor(version)?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("baseutils/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut releases = Vec::new();
    for page in 1..=MAX_PAGES {
        let batch: Vec<Release> = client
            .get(releases_url)
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .header("Accept", "application/vnd.github+json")
            .send()?
            .error_for_status()?
            .json()?;
        tracing::debug!("Fetched {} releases from page {}", batch.len(), page);
        if batch.is_empty() {
            break;
        }
        releases.extend(batch);
    }

    latest_patch_release(version, &releases)
}

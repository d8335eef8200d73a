//! `--pr`: payload files touched by the current pull request.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use payload_io::PAYLOAD_DIR;

const USER_AGENT: &str = concat!("payload-report/", env!("CARGO_PKG_VERSION"));
const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{0} is not set")]
    MissingEnv(&'static str),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Deserialize)]
struct PullFile {
    filename: String,
    #[serde(default)]
    status: String,
}

/// Where to ask. `GITHUB_API_URL` overrides the public API host.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub api_url: String,
    pub repository: String,
    pub number: String,
    pub token: Option<String>,
}

impl PullRequest {
    /// From `GITHUB_REPOSITORY`, `PR_NUMBER`, and optionally
    /// `GITHUB_API_URL` / `GITHUB_TOKEN`.
    pub fn from_env() -> Result<Self, DiscoveryError> {
        let var = |name: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
        };
        Ok(Self {
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            repository: var("GITHUB_REPOSITORY").ok_or(DiscoveryError::MissingEnv("GITHUB_REPOSITORY"))?,
            number: var("PR_NUMBER").ok_or(DiscoveryError::MissingEnv("PR_NUMBER"))?,
            token: var("GITHUB_TOKEN"),
        })
    }

    fn files_url(&self) -> String {
        format!(
            "{}/repos/{}/pulls/{}/files",
            self.api_url.trim_end_matches('/'),
            self.repository,
            self.number
        )
    }

    /// Every file name the pull request touches, across all pages.
    fn list_files(&self) -> Result<Vec<PullFile>, DiscoveryError> {
        let url = self.files_url();
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| DiscoveryError::Http { url: url.clone(), source })?;

        let mut files = Vec::new();
        for page in 1.. {
            let mut request = http
                .get(&url)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .header("Accept", "application/vnd.github+json");
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .map_err(|source| DiscoveryError::Http { url: url.clone(), source })?;
            let status = response.status();
            if !status.is_success() {
                return Err(DiscoveryError::Status { url, status: status.as_u16() });
            }
            let batch: Vec<PullFile> = response
                .json()
                .map_err(|source| DiscoveryError::Http { url: url.clone(), source })?;
            let last = batch.len() < PER_PAGE;
            files.extend(batch);
            if last {
                break;
            }
        }
        Ok(files)
    }
}

/// Payload files changed in the pull request that still exist under `root`.
pub fn changed_payloads(pr: &PullRequest, root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let files = pr.list_files()?;
    log::info!("pull request {} touches {} file(s)", pr.number, files.len());
    Ok(select_payloads(root, files))
}

fn select_payloads(root: &Path, files: Vec<PullFile>) -> Vec<PathBuf> {
    let prefix = format!("{PAYLOAD_DIR}/");
    files
        .into_iter()
        .filter(|f| f.filename.starts_with(&prefix) && f.filename.ends_with(".json"))
        .filter(|f| {
            let exists = root.join(&f.filename).is_file();
            if !exists {
                log::debug!("skipping {} ({})", f.filename, f.status);
            }
            exists
        })
        .map(|f| PathBuf::from(f.filename))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file(name: &str, status: &str) -> PullFile {
        PullFile { filename: name.into(), status: status.into() }
    }

    #[test]
    fn keeps_existing_payloads_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("BIPs/2024-W07")).unwrap();
        fs::write(dir.path().join("BIPs/2024-W07/BIP-512.json"), "{}").unwrap();
        fs::write(dir.path().join("BIPs/2024-W07/BIP-512.report.txt"), "").unwrap();

        let selected = select_payloads(
            dir.path(),
            vec![
                file("BIPs/2024-W07/BIP-512.json", "added"),
                file("BIPs/2024-W07/BIP-512.report.txt", "added"),
                file("BIPs/2024-W07/BIP-513.json", "removed"),
                file("README.md", "modified"),
                file("other/BIP-1.json", "added"),
            ],
        );
        assert_eq!(selected, vec![PathBuf::from("BIPs/2024-W07/BIP-512.json")]);
    }

    #[test]
    fn files_url_shape() {
        let pr = PullRequest {
            api_url: "https://api.github.com/".into(),
            repository: "org/repo".into(),
            number: "42".into(),
            token: None,
        };
        assert_eq!(pr.files_url(), "https://api.github.com/repos/org/repo/pulls/42/files");
    }
}

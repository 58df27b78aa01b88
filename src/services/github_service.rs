use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteFile {
    pub name: String,
    pub path: String,
    pub download_url: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    download_url: Option<String>,
    #[serde(default)]
    size: u64,
}

/// Lists and fetches markdown question banks from a GitHub repository.
#[derive(Clone)]
pub struct GithubService {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubService {
    pub fn new(api_url: String, token: Option<String>, client: Client) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub async fn list_markdown_files(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Vec<RemoteFile>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            owner,
            repo,
            path.trim_matches('/')
        );

        let mut req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, "interview-assessor")
            .timeout(Duration::from_secs(30));
        if let Some(branch) = branch {
            req = req.query(&[("ref", branch)]);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?;
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("{}/{}/{} not found on GitHub", owner, repo, path)));
        }
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("GitHub API error {}: {}", status, text)));
        }

        let entries: Vec<ContentEntry> = res.json().await?;
        let mut files: Vec<RemoteFile> = entries
            .into_iter()
            .filter(|e| e.entry_type == "file" && e.name.to_lowercase().ends_with(".md"))
            .filter_map(|e| {
                Some(RemoteFile {
                    download_url: e.download_url?,
                    name: e.name,
                    path: e.path,
                    size: e.size,
                })
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!(owner, repo, path, count = files.len(), "Listed remote question banks");
        Ok(files)
    }

    pub async fn fetch_file(&self, download_url: &str) -> Result<String> {
        let mut req = self
            .client
            .get(download_url)
            .header(reqwest::header::USER_AGENT, "interview-assessor")
            .timeout(Duration::from_secs(30));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(Error::Upstream(format!(
                "Failed to fetch {}: {}",
                download_url,
                res.status()
            )));
        }
        Ok(res.text().await?)
    }
}

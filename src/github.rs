use std::sync::Once;

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::Deserialize;
use tracing::debug;

use crate::types::{ChangedFile, Forge, PullRequestRef, ReviewComment};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct PullRequestDetail {
    head: HeadRef,
}

#[derive(Debug, Deserialize)]
struct HeadRef {
    sha: String,
}

static CRYPTO_PROVIDER: Once = Once::new();

/// Selects ring as the process-wide rustls provider.
///
/// octocrab and the AWS SDK enable different rustls backends, and rustls
/// refuses to pick one on its own when both are compiled in.
fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }
    });
}

/// GitHub REST client backing the [`Forge`] operations.
#[derive(Clone)]
pub struct GitHub {
    octocrab: Octocrab,
}

impl GitHub {
    /// Creates an authenticated client against `api_url`.
    ///
    /// Requests are never retried; a failed call surfaces immediately.
    pub fn new(token: impl Into<String>, api_url: &str) -> Result<Self> {
        install_crypto_provider();

        let octocrab = Octocrab::builder()
            .personal_token(token.into())
            .add_retry_config(RetryConfig::None)
            .base_uri(api_url)
            .with_context(|| format!("Invalid GitHub API URL: '{}'", api_url))?
            .build()
            .context("Failed to create GitHub client")?;
        Ok(Self { octocrab })
    }

    fn pull_route(pr: &PullRequestRef) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            pr.repo.owner(),
            pr.repo.name(),
            pr.number
        )
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn list_changed_files(&self, pr: &PullRequestRef) -> Result<Vec<ChangedFile>> {
        let route = format!("{}/files", Self::pull_route(pr));
        debug!(%route, "listing changed files");
        self.octocrab
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("Failed to list changed files for {}", pr))
    }

    async fn head_commit_sha(&self, pr: &PullRequestRef) -> Result<String> {
        let route = Self::pull_route(pr);
        debug!(%route, "resolving head commit");
        let detail: PullRequestDetail = self
            .octocrab
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("Failed to fetch pull request {}", pr))?;
        Ok(detail.head.sha)
    }

    async fn create_review_comment(
        &self,
        pr: &PullRequestRef,
        comment: &ReviewComment,
    ) -> Result<()> {
        let route = format!("{}/comments", Self::pull_route(pr));
        debug!(
            %route,
            path = %comment.path,
            commit = %comment.commit_id,
            "posting review comment"
        );
        let _created: serde_json::Value = self
            .octocrab
            .post(&route, Some(comment))
            .await
            .with_context(|| {
                format!(
                    "Failed to post review comment on '{}' in {}",
                    comment.path, pr
                )
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Repo;

    #[test]
    fn pull_route_uses_owner_repo_and_number() {
        let pr = PullRequestRef::new(Repo::new("octocat", "hello-world").unwrap(), 7);
        assert_eq!(GitHub::pull_route(&pr), "/repos/octocat/hello-world/pulls/7");
    }

    #[test]
    fn pull_request_detail_reads_head_sha() {
        let body = r#"{
            "number": 7,
            "head": {"ref": "feature", "sha": "0123abcd"},
            "base": {"ref": "main", "sha": "ffff0000"}
        }"#;
        let detail: PullRequestDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.head.sha, "0123abcd");
    }

    #[test]
    fn changed_files_deserialize_in_api_order() {
        let body = r#"[
            {"filename": "README.md", "status": "modified", "patch": "@@ -1 +1 @@\n-a\n+b"},
            {"filename": "logo.png", "status": "added"}
        ]"#;
        let files: Vec<ChangedFile> = serde_json::from_str(body).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "README.md");
        assert!(files[0].diff().is_some());
        assert_eq!(files[1].filename, "logo.png");
        assert!(files[1].diff().is_none());
    }

    #[tokio::test]
    async fn new_rejects_invalid_api_url() {
        assert!(GitHub::new("token", "not a url").is_err());
    }

    #[tokio::test]
    async fn new_builds_client_for_default_api_url() {
        assert!(GitHub::new("token", DEFAULT_API_URL).is_ok());
        // A second client reuses the already installed provider.
        assert!(GitHub::new("token", DEFAULT_API_URL).is_ok());
    }
}

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error returned when a repository identifier is not of the form
/// `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    MissingSeparator(String),
    TooManySeparators(String),
    EmptyOwner(String),
    EmptyName(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::MissingSeparator(s) => {
                write!(f, "repository must be in format 'owner/repo', got: '{s}'")
            }
            RepoError::TooManySeparators(s) => {
                write!(f, "repository has more than one '/' separator: '{s}'")
            }
            RepoError::EmptyOwner(s) => write!(f, "repository owner is empty in '{s}'"),
            RepoError::EmptyName(s) => write!(f, "repository name is empty in '{s}'"),
        }
    }
}

impl std::error::Error for RepoError {}

/// A GitHub repository, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into().trim().to_string();
        let name = name.into().trim().to_string();
        let full = format!("{owner}/{name}");

        if owner.is_empty() {
            return Err(RepoError::EmptyOwner(full));
        }
        if name.is_empty() {
            return Err(RepoError::EmptyName(full));
        }
        if owner.contains('/') || name.contains('/') {
            return Err(RepoError::TooManySeparators(full));
        }

        Ok(Self { owner, name })
    }

    /// Parses `owner/name`.
    pub fn parse(s: &str) -> Result<Self, RepoError> {
        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| RepoError::MissingSeparator(s.to_string()))?;
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A single pull request within a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub repo: Repo,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(repo: Repo, number: u64) -> Self {
        Self { repo, number }
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// A file touched by a pull request, as listed by the pulls/files endpoint.
///
/// GitHub omits `patch` for binary files and for diffs too large to
/// render inline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub patch: Option<String>,
}

impl ChangedFile {
    /// Returns the textual diff, or `None` when there is nothing to review.
    pub fn diff(&self) -> Option<&str> {
        self.patch.as_deref().filter(|p| !p.is_empty())
    }
}

/// Which side of a diff a review comment is attached to. Generated
/// comments always target the new version of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffSide {
    Right,
}

/// Payload for `POST /repos/{owner}/{repo}/pulls/{number}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewComment {
    pub body: String,
    pub commit_id: String,
    pub path: String,
    pub line: u64,
    pub side: DiffSide,
}

/// Body of a text-completion model invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub max_tokens_to_sample: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    pub completion: String,
}

/// Files handled by one review run, in the order they were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub posted: Vec<String>,
    pub skipped: Vec<String>,
}

/// Source-hosting operations needed to review a pull request.
#[async_trait]
pub trait Forge {
    async fn list_changed_files(&self, pr: &PullRequestRef) -> anyhow::Result<Vec<ChangedFile>>;

    async fn head_commit_sha(&self, pr: &PullRequestRef) -> anyhow::Result<String>;

    async fn create_review_comment(
        &self,
        pr: &PullRequestRef,
        comment: &ReviewComment,
    ) -> anyhow::Result<()>;
}

/// A hosted text-completion model.
#[async_trait]
pub trait Model {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

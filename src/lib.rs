//! pr-reviewer: AI-generated review comments for GitHub pull requests.
//!
//! Lists the files changed by a pull request, asks a Bedrock-hosted
//! text-completion model to review each textual diff, and posts the
//! model's answer as a review comment on the file. Files are processed
//! one at a time and the first failure stops the run.

pub mod bedrock;
pub mod cli;
pub mod github;
pub mod prompt;
pub mod review;
pub mod types;

pub use bedrock::Bedrock;
pub use cli::{ReviewSpec, parse_args};
pub use github::GitHub;
pub use review::{COMMENT_LINE, generate_review, post_comment, review_pull_request};
pub use types::{
    ChangedFile, CompletionRequest, CompletionResponse, DiffSide, Forge, Model, PullRequestRef,
    Repo, RepoError, ReviewComment, ReviewOutcome,
};

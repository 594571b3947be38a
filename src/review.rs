use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    prompt::build_review_prompt,
    types::{DiffSide, Forge, Model, PullRequestRef, ReviewComment, ReviewOutcome},
};

/// Line every generated comment is anchored to.
pub const COMMENT_LINE: u64 = 1;

/// Asks the model to review a single file's diff and returns its feedback.
pub async fn generate_review<M>(model: &M, patch: &str) -> Result<String>
where
    M: Model + Sync,
{
    let prompt = build_review_prompt(patch);
    model.complete(&prompt).await
}

/// Posts `body` as a review comment on `path` at `line`.
///
/// The head commit is resolved immediately before posting so the comment
/// always targets the commit the pull request points at right now.
pub async fn post_comment<F>(
    forge: &F,
    pr: &PullRequestRef,
    path: &str,
    line: u64,
    body: String,
) -> Result<()>
where
    F: Forge + Sync,
{
    let commit_id = forge.head_commit_sha(pr).await?;
    let comment = ReviewComment {
        body,
        commit_id,
        path: path.to_string(),
        line,
        side: DiffSide::Right,
    };
    forge.create_review_comment(pr, &comment).await
}

/// Reviews every changed file of a pull request in listing order.
///
/// Files without a textual diff are skipped. The first failure aborts the
/// run; files after it are left untouched. A progress line is written to
/// `writer` as soon as each comment is posted.
pub async fn review_pull_request<F, M, W>(
    forge: &F,
    model: &M,
    pr: &PullRequestRef,
    writer: &mut W,
) -> Result<ReviewOutcome>
where
    F: Forge + Sync,
    M: Model + Sync,
    W: Write,
{
    let files = forge.list_changed_files(pr).await?;
    info!(%pr, files = files.len(), "fetched changed files");

    let mut outcome = ReviewOutcome::default();

    for file in files {
        let Some(patch) = file.diff() else {
            debug!(path = %file.filename, "skipping file without a textual diff");
            outcome.skipped.push(file.filename);
            continue;
        };

        let feedback = generate_review(model, patch).await?;
        post_comment(forge, pr, &file.filename, COMMENT_LINE, feedback).await?;

        info!(path = %file.filename, "posted review comment");
        writeln!(writer, "Posted review comment on file: {}", file.filename)
            .context("Failed to write progress output")?;
        outcome.posted.push(file.filename);
    }

    Ok(outcome)
}

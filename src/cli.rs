use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    bedrock::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID},
    github::DEFAULT_API_URL,
    types::{PullRequestRef, Repo},
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Debug)]
#[command(
    name = "pr-reviewer",
    about = "Review each changed file of a GitHub pull request with a Bedrock-hosted model and post the feedback as review comments"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// AWS region hosting the model endpoint
    #[arg(long, env = "BEDROCK_REGION", value_name = "REGION")]
    pub region: String,

    /// GitHub access token
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub repository in format 'owner/repo'
    #[arg(short = 'r', long, env = "GITHUB_REPO", value_name = "OWNER/REPO")]
    pub repo: String,

    /// Pull request number
    #[arg(short = 'p', long = "pr", env = "PR_NUMBER", value_name = "PR-NUMBER")]
    pub pr_number: String,

    /// Bedrock model identifier
    #[arg(long = "model-id", env = "BEDROCK_MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// Maximum number of tokens the model may generate per file
    #[arg(long = "max-tokens", env = "BEDROCK_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// GitHub REST API base URL
    #[arg(long = "github-api-url", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,
}

/// Fully validated settings for one review run.
#[derive(Debug, Clone)]
pub struct ReviewSpec {
    pub pull_request: PullRequestRef,
    pub github_token: String,
    pub github_api_url: String,
    pub region: String,
    pub model_id: String,
    pub max_tokens: u32,
}

fn parse_pr_number(s: &str) -> Result<u64> {
    let s = s.trim();
    let number: u64 = s
        .parse()
        .with_context(|| format!("Invalid PR number: '{}'", s))?;
    if number == 0 {
        anyhow::bail!("Invalid PR number: '{}'", s);
    }
    Ok(number)
}

fn build_review_spec(cli: CliArgs) -> Result<ReviewSpec> {
    let repo = Repo::parse(&cli.repo)
        .map_err(|e| anyhow::anyhow!("Invalid repository format '{}': {}", cli.repo, e))?;
    let number = parse_pr_number(&cli.pr_number)?;

    if cli.region.trim().is_empty() {
        anyhow::bail!("Bedrock region must not be empty");
    }
    if cli.github_token.trim().is_empty() {
        anyhow::bail!("GitHub token must not be empty");
    }
    if cli.max_tokens == 0 {
        anyhow::bail!("--max-tokens must be greater than zero");
    }

    Ok(ReviewSpec {
        pull_request: PullRequestRef::new(repo, number),
        github_token: cli.github_token,
        github_api_url: cli.github_api_url,
        region: cli.region.trim().to_string(),
        model_id: cli.model_id,
        max_tokens: cli.max_tokens,
    })
}

/// Parses command-line arguments, falling back to environment variables,
/// into a validated review specification.
pub fn parse_args<I, T>(args: I) -> Result<ReviewSpec>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_review_spec(cli)
}

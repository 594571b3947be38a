use anyhow::Context;
use pr_reviewer::{Bedrock, GitHub, parse_args, review_pull_request};
use tracing::info;

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let spec = match parse_args(std::env::args_os()) {
        Ok(spec) => spec,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let github = GitHub::new(spec.github_token.as_str(), &spec.github_api_url)
        .context("Failed to set up GitHub access")?;
    let model = Bedrock::from_region(
        spec.region.as_str(),
        spec.model_id.as_str(),
        spec.max_tokens,
    )
    .await;
    info!(pr = %spec.pull_request, model = model.model_id(), "starting review");

    let mut stdout = std::io::stdout();
    let outcome = review_pull_request(&github, &model, &spec.pull_request, &mut stdout).await?;
    info!(
        posted = outcome.posted.len(),
        skipped = outcome.skipped.len(),
        "review finished"
    );

    Ok(())
}

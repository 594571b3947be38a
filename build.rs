//! Build script for pr-reviewer - embeds version information.
//!
//! `BUILD_INFO_HUMAN` is assembled from the crate version, the output of
//! `git describe --tags --always --dirty` (when git is available) and the
//! rustc version. Outside a git checkout the build timestamp stands in for
//! the describe output.

use std::{env, process::Command};

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

/// Runs a command and returns its trimmed stdout on success.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn source_revision() -> String {
    command_stdout("git", &["describe", "--tags", "--always", "--dirty"])
        .unwrap_or_else(|| format!("built {}", Utc::now().format("%Y%m%d%H%M%S")))
}

fn build_info() -> String {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    [
        Some(version),
        Some(format!("({})", source_revision())),
        command_stdout("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

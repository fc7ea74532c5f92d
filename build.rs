//! Build script for StudentVibe
//!
//! Embeds build-time information into the binary so `studentvibe version`
//! can report exactly which revision produced it.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-changed=config/personas.toml");

    let git_hash = command_stdout("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_branch = command_stdout("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    let git_dirty = git_dirty_flag();

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let rustc_version = command_stdout("rustc", &["--version"]);

    let vars = [
        ("STUDENTVIBE_GIT_HASH", git_hash),
        ("STUDENTVIBE_GIT_BRANCH", git_branch),
        ("STUDENTVIBE_GIT_DIRTY", git_dirty.to_string()),
        ("STUDENTVIBE_BUILD_TIMESTAMP", build_timestamp),
        ("STUDENTVIBE_TARGET", cargo_var("TARGET")),
        ("STUDENTVIBE_PROFILE", cargo_var("PROFILE")),
        ("STUDENTVIBE_RUSTC_VERSION", rustc_version),
    ];

    for (key, value) in &vars {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

/// Read a cargo-provided variable, falling back to "unknown"
fn cargo_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| "unknown".to_string())
}

/// Run a command and return its trimmed stdout, or "unknown" on any failure
fn command_stdout(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// "true" when the working tree has uncommitted changes
fn git_dirty_flag() -> &'static str {
    match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(output) if output.status.success() => {
            if output.stdout.is_empty() {
                "false"
            } else {
                "true"
            }
        }
        _ => "unknown",
    }
}

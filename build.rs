//! Build script for steadfast
//!
//! Embeds the git revision and build timestamp so the running service can
//! report exactly what it was built from.

use std::process::Command;

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}

fn main() {
    let short = git_output(&["rev-parse", "--short", "HEAD"]);
    let full = git_output(&["rev-parse", "HEAD"]);

    println!(
        "cargo:rustc-env=GIT_COMMIT_SHORT={}",
        short.as_deref().unwrap_or("unknown")
    );
    println!(
        "cargo:rustc-env=GIT_COMMIT_FULL={}",
        full.as_deref().unwrap_or("unknown")
    );
    println!(
        "cargo:rustc-env=BUILD_TIMESTAMP={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
}

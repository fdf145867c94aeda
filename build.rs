//! Build script that embeds build metadata (timestamp and git hash) into the binary.
//!
//! Uses command-line git instead of git2 to avoid OpenSSL dependency issues.

use std::process::Command;

fn main() {
    let now = chrono::Utc::now();
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", now.timestamp());
    println!(
        "cargo:rustc-env=BUILD_DATETIME={}",
        now.format("%Y-%m-%d %H:%M:%S UTC")
    );

    // Fall back to "unknown" when building outside a git checkout (e.g. Docker context)
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=BUILD_GIT_HASH={git_hash}");

    println!("cargo:rerun-if-changed=.git/HEAD");
}

//! Stamps the git revision into the binary for `--version`.

use std::process::Command;

/// Trimmed stdout of a successful git invocation.
fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    for path in [".git/HEAD", ".git/refs/", ".git/index"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());
    // A release build is a clean checkout of a tagged commit
    let release = !dirty && git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=RESIZE_IMAGE_GIT_HASH={hash}");
    println!("cargo:rustc-env=RESIZE_IMAGE_DIRTY={dirty}");
    println!("cargo:rustc-env=RESIZE_IMAGE_RELEASE={release}");
}

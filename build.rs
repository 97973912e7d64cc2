use std::process::Command;

const NIGHTLY_FLAG: &str = "ELPRICE_NIGHTLY";

fn main() {
    let base = env!("CARGO_PKG_VERSION");
    let version = if nightly_requested() {
        nightly_version(base, short_sha())
    } else {
        base.to_string()
    };

    // Read by main for the startup banner
    println!("cargo:rustc-env=APP_VERSION={}", version);

    println!("cargo:rerun-if-env-changed={}", NIGHTLY_FLAG);
    println!("cargo:rerun-if-env-changed=GIT_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}

fn nightly_requested() -> bool {
    std::env::var(NIGHTLY_FLAG).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// `git rev-parse` first, then `GIT_SHA` for checkouts without `.git`
fn short_sha() -> Option<String> {
    let from_git = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string());

    from_git
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("GIT_SHA").ok().filter(|s| !s.is_empty()))
}

fn nightly_version(base: &str, sha: Option<String>) -> String {
    match sha {
        Some(sha) => format!("{}-nightly+{}", base, sha),
        None => format!("{}-nightly", base),
    }
}

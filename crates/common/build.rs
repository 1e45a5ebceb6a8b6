use std::env;
use std::process::Command;

/// `git describe` of the checkout, if git is available and this is a repository.
fn describe_checkout() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()
        .filter(|out| out.status.success())?;
    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    (!described.is_empty()).then(|| described.to_string())
}

fn features() -> String {
    let mut names: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_")
                .map(|name| name.to_lowercase().replace('_', "-"))
        })
        .collect();
    names.sort();
    match names.is_empty() {
        true => "none".to_string(),
        false => names.join(","),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=FERRY_BUILD_VERSION");

    // an explicit version from CI wins over git, then the crate version
    let version = env::var("FERRY_BUILD_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(describe_checkout)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let stamps = [
        ("BUILD_PROFILE", env::var("PROFILE").unwrap_or_else(|_| "unknown".into())),
        ("BUILD_FEATURES", features()),
        ("REPO_VERSION", version),
        ("BUILD_TIMESTAMP", chrono::Utc::now().to_rfc3339()),
    ];
    for (key, value) in stamps {
        println!("cargo:rustc-env={key}={value}");
    }
}

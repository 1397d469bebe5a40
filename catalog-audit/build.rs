//! Stamps the `catalog` binary with its build identity
//!
//! Exposes `GIT_HASH`, `BUILD_TIMESTAMP` (UTC, RFC 3339) and `BUILD_PROFILE`
//! to `env!`. `SOURCE_DATE_EPOCH`, when set, pins the timestamp so release
//! builds are reproducible.

use chrono::{DateTime, SecondsFormat, Utc};
use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", git_short_hash());
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_time().to_rfc3339_opts(SecondsFormat::Secs, true));
    println!(
        "cargo:rustc-env=BUILD_PROFILE={}",
        env::var("PROFILE").unwrap_or_else(|_| "unknown".into())
    );

    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}

fn git_short_hash() -> String {
    let stdout = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| out.stdout);

    match stdout.and_then(|bytes| String::from_utf8(bytes).ok()) {
        Some(hash) if !hash.trim().is_empty() => hash.trim().to_owned(),
        _ => "unknown".to_owned(),
    }
}

fn build_time() -> DateTime<Utc> {
    env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

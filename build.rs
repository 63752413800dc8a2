//! Build script for kardiyo
//!
//! Stamps every compilation with an increasing build number (kept in
//! `build_number.txt`) and the UTC build time.

use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn previous_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let path = Path::new(BUILD_NUMBER_FILE);
    let build_number = previous_build_number(path) + 1;
    if let Err(e) = fs::write(path, build_number.to_string()) {
        println!("cargo:warning=could not record build number: {}", e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=KARDIYO_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=KARDIYO_BUILD_TIMESTAMP={}", timestamp);
}

//! Error handling example for estat-rs
//!
//! This example demonstrates how failures are classified.

use estat_rs::prelude::*;

fn describe(label: &str, err: &EStatError) {
    let kind = match err.kind() {
        ErrorKind::Network => "network",
        ErrorKind::Decode => "decode",
        ErrorKind::Parse => "parse",
        ErrorKind::Input => "input",
    };
    println!("  {label}: [{kind}] {err}");
}

fn main() -> Result<()> {
    println!("=== estat-rs Error Handling Example ===\n");

    // Example 1: no application id anywhere
    println!("--- Example 1: Missing application id ---");
    let fetcher = Fetcher::new(Config::default())?;
    let template = "http://api.e-stat.go.jp/rest/3.0/app/getStatsData?appId=";
    if let Err(e) = fetcher.fetch(template, None) {
        describe("fetch", &e);
    }
    println!();

    // Example 2: template without the placeholder
    println!("--- Example 2: URL template without `appId=` ---");
    if let Err(e) = fetcher.fetch("http://api.e-stat.go.jp/rest/3.0/app/getStatsData", Some("k")) {
        describe("fetch", &e);
    }
    println!();

    // Example 3: bodies that are not gzip
    println!("--- Example 3: Plain JSON where gzip was expected ---");
    if let Err(e) = StatsDocument::from_gzip_bytes(b"{}") {
        describe("decode", &e);
    }
    println!();

    // Example 4: empty document
    println!("--- Example 4: Empty document ---");
    let session = StatsTable::new(
        StatsData::with_document("empty", None, StatsDocument::empty()),
        Names::Omitted,
    );
    println!("  names: {:?}", session.names()?);
    if let Err(e) = session.to_table(Substitution::Omitted) {
        describe("table", &e);
    }

    Ok(())
}

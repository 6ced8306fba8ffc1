//! Basic usage example for estat-rs
//!
//! This example demonstrates how to:
//! - Fetch a `getStatsData` response (needs `ESTAT_APP_ID`)
//! - Build the name dictionary
//! - Print the name-form table
//!
//! Run with:
//!   ESTAT_APP_ID=... cargo run --example basic_usage

use estat_rs::prelude::*;

const URL: &str =
    "http://api.e-stat.go.jp/rest/3.0/app/getStatsData?appId=&lang=J&statsDataId=0003411595&limit=20";

fn main() -> Result<()> {
    println!("=== estat-rs Basic Usage Example ===\n");

    let fetcher = Fetcher::new(Config::from_env())?;
    let session = StatsTable::fetch(URL, None, &fetcher)?;
    println!("✓ Document fetched\n");

    println!("--- Example 1: Name dictionary ---");
    if let Some(names) = session.names()? {
        for (column, name) in names.id_to_name() {
            let codes = names.code_to_name().get(column).map_or(0, |c| c.len());
            println!("{column} -> {name} ({codes} codes)");
        }
    }
    println!();

    println!("--- Example 2: Name-form table ---");
    let table = session.to_table(Substitution::Omitted)?;
    println!("{}", table.columns().join(" | "));
    for row in table.rows().iter().take(10) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join(" | "));
    }
    println!("... {} rows in total", table.len());

    Ok(())
}

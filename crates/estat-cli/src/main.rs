//! estat — Command-line interface for estat-core
//!
//! Fetches a `getStatsData` response from e-Stat and prints it in one of
//! three shapes.
//!
//! Usage examples
//! --------------
//!
//! - Name-form table as CSV
//!   $ estat table 'http://api.e-stat.go.jp/rest/3.0/app/getStatsData?appId=&statsDataId=0003411595'
//!
//! - Codes and ids untouched, as JSON records
//!   $ estat table --codes --format json '<url>'
//!
//! - Code and name columns side by side
//!   $ estat table --mixed '<url>'
//!
//! - The substitution dictionary of a saved response
//!   $ estat --input saved.json.gz names --codes
//!
//! The application id comes from `--app-id` or `ESTAT_APP_ID`.
use anyhow::Context;
use clap::Parser;
use estat_cli::args::{CliArgs, Commands, OutputFormat};
use estat_cli::logging::init_logging;
use estat_core::{NameDictionary, Names, StatsData, StatsDocument, StatsTable, Substitution, Table};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let url = args.command.url().map(str::to_string);
    let doc = load_document(args.input.as_deref(), url.as_deref(), args.app_id.as_deref())?;
    let session = StatsTable::new(
        StatsData::with_document(url.unwrap_or_default(), args.app_id.clone(), doc),
        Names::Omitted,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Table {
            codes,
            mixed,
            format,
            ..
        } => {
            let table = if mixed {
                session.to_mixed_table()?
            } else if codes {
                session.to_table(Substitution::Explicit(&NameDictionary::default()))?
            } else {
                session.to_table(Substitution::Omitted)?
            };
            info!(rows = table.len(), columns = table.columns().len(), "built table");
            match format {
                OutputFormat::Csv => write_csv(&table, &mut out)?,
                OutputFormat::Json => write_json(&table, &mut out)?,
            }
        }

        Commands::Names { codes, .. } => match session.names()? {
            Some(names) => write_names(names, codes, &mut out)?,
            None => eprintln!("Document is empty; no names to show"),
        },

        Commands::Raw { .. } => {
            serde_json::to_writer_pretty(&mut out, session.stats().data().as_value())?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn load_document(
    input: Option<&Path>,
    url: Option<&str>,
    app_id: Option<&str>,
) -> anyhow::Result<StatsDocument> {
    if let Some(path) = input {
        info!(path = %path.display(), "reading saved response");
        return StatsDocument::from_path(path)
            .with_context(|| format!("cannot load {}", path.display()));
    }
    let url = url.context("a URL is required unless --input is given")?;
    fetch_document(url, app_id)
}

#[cfg(feature = "fetch")]
fn fetch_document(url: &str, app_id: Option<&str>) -> anyhow::Result<StatsDocument> {
    let fetcher = estat_core::Fetcher::new(estat_core::Config::from_env())?;
    fetcher
        .fetch(url, app_id)
        .with_context(|| format!("fetching {url} failed"))
}

#[cfg(not(feature = "fetch"))]
fn fetch_document(_url: &str, _app_id: Option<&str>) -> anyhow::Result<StatsDocument> {
    anyhow::bail!("estat was built without the `fetch` feature; use --input")
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_csv(table: &Table, out: &mut impl Write) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(table: &Table, out: &mut impl Write) -> anyhow::Result<()> {
    let records: Vec<_> = (0..table.len()).filter_map(|i| table.record(i)).collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

fn write_names(names: &NameDictionary, codes: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let columns: BTreeMap<&String, &String> = names.id_to_name().iter().collect();
    for (column, name) in columns {
        let column_codes = names.code_to_name().get(column);
        writeln!(
            out,
            "{column}\t{name}\t{} codes",
            column_codes.map_or(0, |c| c.len())
        )?;
        if !codes {
            continue;
        }
        if let Some(column_codes) = column_codes {
            let sorted: BTreeMap<&String, &String> = column_codes.iter().collect();
            for (code, label) in sorted {
                writeln!(out, "  {code}\t{label}")?;
            }
        }
    }
    Ok(())
}

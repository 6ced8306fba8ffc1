use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for estat
#[derive(Debug, Parser)]
#[command(
    name = "estat",
    version,
    about = "Fetch e-Stat statistics and print them as name-substituted tables"
)]
pub struct CliArgs {
    /// e-Stat application id (overrides ESTAT_APP_ID)
    #[arg(long = "app-id", env = "ESTAT_APP_ID", hide_env_values = true, global = true)]
    pub app_id: Option<String>,

    /// Read a saved response (.json or .json.gz) instead of fetching
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the data values as a table
    Table {
        /// API URL as copied from the e-Stat site (optional with --input)
        url: Option<String>,

        /// Keep codes and ids, no substitution
        #[arg(long, conflicts_with = "mixed")]
        codes: bool,

        /// Print each code column next to its name column
        #[arg(long)]
        mixed: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Print the code/id -> name dictionary
    Names {
        /// API URL as copied from the e-Stat site (optional with --input)
        url: Option<String>,

        /// List every code of every column
        #[arg(long)]
        codes: bool,
    },

    /// Print the decoded JSON document
    Raw {
        /// API URL as copied from the e-Stat site (optional with --input)
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl Commands {
    pub fn url(&self) -> Option<&str> {
        match self {
            Commands::Table { url, .. } | Commands::Names { url, .. } | Commands::Raw { url } => {
                url.as_deref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_flags() {
        let args = CliArgs::try_parse_from([
            "estat",
            "-vv",
            "--app-id",
            "k",
            "table",
            "http://x/app/?appId=",
            "--mixed",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.app_id.as_deref(), Some("k"));
        assert_eq!(args.command.url(), Some("http://x/app/?appId="));
        assert!(matches!(
            args.command,
            Commands::Table { mixed: true, codes: false, format: OutputFormat::Json, .. }
        ));
    }

    #[test]
    fn codes_and_mixed_conflict() {
        let res = CliArgs::try_parse_from(["estat", "table", "u", "--codes", "--mixed"]);
        assert!(res.is_err());
    }

    #[test]
    fn input_makes_the_url_optional() {
        let args = CliArgs::try_parse_from(["estat", "-i", "saved.json.gz", "names"]).unwrap();
        assert_eq!(args.command.url(), None);
        assert!(args.input.is_some());
    }
}

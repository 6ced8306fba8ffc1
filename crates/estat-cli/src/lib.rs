//! estat-cli
//! =========
//!
//! Command-line interface for the `estat-core` e-Stat client.
//!
//! The binary (`estat`) is the primary deliverable; this library target
//! holds its argument definitions and logging setup.
//!
//! Basic usage:
//!
//! ```text
//! export ESTAT_APP_ID=...
//! estat table 'http://api.e-stat.go.jp/rest/3.0/app/getStatsData?appId=&statsDataId=0003411595'
//! estat table --codes --format json '<url>'
//! estat --input saved.json.gz names --codes
//! ```
//!
//! For programmatic access use the `estat-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod args;
pub mod logging;

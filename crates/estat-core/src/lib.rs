// crates/estat-core/src/lib.rs

//! Fetch statistics from the e-Stat API and reshape them into tables.
//!
//! This crate uses the API of e-Stat (Portal Site of Official Statistics of
//! Japan), but its content is not guaranteed by the government.
//!
//! The pipeline is: URL template + app id -> [`Fetcher`] -> [`StatsDocument`]
//! -> [`NameDictionary`] + [`Table`] -> name-form table. [`StatsTable`] ties
//! these together and caches the dictionary.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod document;
pub mod endpoint;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod names;
pub mod session;
pub mod table;

// Re-exports
pub use crate::config::Config;
pub use crate::document::{Category, ClassCode, ClassObject, StatsDocument};
pub use crate::error::{EStatError, ErrorKind, Result};
#[cfg(feature = "fetch")]
pub use crate::fetch::Fetcher;
pub use crate::names::NameDictionary;
pub use crate::session::{Names, StatsData, StatsTable, Substitution};
pub use crate::table::Table;

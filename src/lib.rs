//! estat-rs
//!
//! Facade over [`estat_core`]: re-exports the whole API and a [`prelude`]
//! for the demos.

pub use estat_core::*;

pub mod prelude {
    pub use estat_core::{
        Config, EStatError, ErrorKind, Fetcher, NameDictionary, Names, Result, StatsData,
        StatsDocument, StatsTable, Substitution, Table,
    };
}

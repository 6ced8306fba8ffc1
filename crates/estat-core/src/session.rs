// crates/estat-core/src/session.rs

//! # Sessions
//!
//! [`StatsData`] holds one fetched document together with the URL and id it
//! came from. [`StatsTable`] adds the name dictionary on top and turns the
//! document into tables.
//!
//! ```no_run
//! use estat_core::{Config, Fetcher, StatsTable, Substitution};
//!
//! # fn main() -> estat_core::Result<()> {
//! let fetcher = Fetcher::new(Config::from_env())?;
//! let session = StatsTable::fetch(
//!     "http://api.e-stat.go.jp/rest/3.0/app/getStatsData?appId=&statsDataId=0003411595",
//!     None,
//!     &fetcher,
//! )?;
//! let named = session.to_table(Substitution::Omitted)?;
//! println!("{:?}", named.columns());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "fetch")]
use crate::fetch::Fetcher;

use crate::document::StatsDocument;
use crate::error::Result;
use crate::names::NameDictionary;
use crate::table::Table;
use once_cell::unsync::OnceCell;
use serde_json::Value;
use tracing::debug;

/// A fetched document and where it came from.
#[derive(Debug, Clone)]
pub struct StatsData {
    url: String,
    app_id: Option<String>,
    data: StatsDocument,
}

impl StatsData {
    /// Fetches `url` right away.
    #[cfg(feature = "fetch")]
    pub fn fetch(
        url: impl Into<String>,
        app_id: Option<String>,
        fetcher: &Fetcher,
    ) -> Result<Self> {
        let mut stats = Self::with_document(url, app_id, StatsDocument::empty());
        stats.load(fetcher)?;
        Ok(stats)
    }

    /// Wraps a document obtained elsewhere; nothing is fetched.
    pub fn with_document(
        url: impl Into<String>,
        app_id: Option<String>,
        data: StatsDocument,
    ) -> Self {
        Self {
            url: url.into(),
            app_id,
            data,
        }
    }

    /// (Re)fetches the document, replacing the current one.
    ///
    /// On error the current document is left as it was.
    #[cfg(feature = "fetch")]
    pub fn load(&mut self, fetcher: &Fetcher) -> Result<()> {
        let data = fetcher.fetch(&self.url, self.app_id.as_deref())?;
        self.replace_document(data);
        Ok(())
    }

    /// Swaps in `data`, returning the previous document.
    pub fn replace_document(&mut self, data: StatsDocument) -> StatsDocument {
        std::mem::replace(&mut self.data, data)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn data(&self) -> &StatsDocument {
        &self.data
    }

    pub fn into_document(self) -> StatsDocument {
        self.data
    }
}

/// Dictionary handed to [`StatsTable::new`].
#[derive(Debug, Clone)]
pub enum Names {
    /// Build lazily from the document on first use.
    Omitted,
    /// Use this dictionary as is. An empty one turns substitution off.
    Explicit(NameDictionary),
}

/// Dictionary choice for one table-building call.
#[derive(Debug, Clone, Copy)]
pub enum Substitution<'a> {
    /// Use the session's cached dictionary.
    Omitted,
    /// Use this dictionary instead; an empty one leaves codes and ids alone.
    Explicit(&'a NameDictionary),
}

/// A [`StatsData`] that can be turned into code- or name-form tables.
#[derive(Debug)]
pub struct StatsTable {
    stats: StatsData,
    names: OnceCell<Option<NameDictionary>>,
    explicit_names: bool,
}

impl StatsTable {
    pub fn new(stats: StatsData, names: Names) -> Self {
        match names {
            Names::Omitted => Self {
                stats,
                names: OnceCell::new(),
                explicit_names: false,
            },
            Names::Explicit(dict) => Self {
                stats,
                names: OnceCell::with_value(Some(dict)),
                explicit_names: true,
            },
        }
    }

    /// Fetches `url` and derives names lazily.
    #[cfg(feature = "fetch")]
    pub fn fetch(
        url: impl Into<String>,
        app_id: Option<String>,
        fetcher: &Fetcher,
    ) -> Result<Self> {
        Ok(Self::new(StatsData::fetch(url, app_id, fetcher)?, Names::Omitted))
    }

    pub fn stats(&self) -> &StatsData {
        &self.stats
    }

    /// Refetches the document.
    ///
    /// A dictionary derived from the old document is dropped and rebuilt on
    /// next use; an explicitly supplied one is kept.
    #[cfg(feature = "fetch")]
    pub fn load(&mut self, fetcher: &Fetcher) -> Result<()> {
        let data = fetcher.fetch(self.stats.url(), self.stats.app_id())?;
        self.replace_document(data);
        Ok(())
    }

    /// Swaps in `data` with the same dictionary rules as [`StatsTable::load`].
    pub fn replace_document(&mut self, data: StatsDocument) -> StatsDocument {
        let previous = self.stats.replace_document(data);
        if !self.explicit_names {
            self.names = OnceCell::new();
        }
        previous
    }

    /// Rebuilds the dictionary from the current document now.
    pub fn make_names(&mut self) -> Result<()> {
        let built = NameDictionary::build(self.stats.data())?;
        self.names = OnceCell::with_value(built);
        self.explicit_names = false;
        Ok(())
    }

    /// The session dictionary, built on first call.
    ///
    /// `None` when the document is empty.
    pub fn names(&self) -> Result<Option<&NameDictionary>> {
        self.names
            .get_or_try_init(|| NameDictionary::build(self.stats.data()))
            .map(Option::as_ref)
    }

    fn resolve<'a>(&'a self, names: Substitution<'a>) -> Result<Option<&'a NameDictionary>> {
        match names {
            Substitution::Omitted => self.names(),
            Substitution::Explicit(dict) => Ok(Some(dict)),
        }
    }

    /// Flattens the data values and applies `names` to cells, then headers.
    pub fn to_table(&self, names: Substitution<'_>) -> Result<Table> {
        let mut table = Table::from_records(self.stats.data().values()?)?;
        self.code_to_name_in_place(&mut table, names)?;
        self.id_to_name_in_place(&mut table, names)?;
        Ok(table)
    }

    /// Cell values from code form to name form; `table` must still have id-form headers.
    pub fn code_to_name(&self, table: &Table, names: Substitution<'_>) -> Result<Table> {
        let mut table = table.clone();
        self.code_to_name_in_place(&mut table, names)?;
        Ok(table)
    }

    pub fn code_to_name_in_place(&self, table: &mut Table, names: Substitution<'_>) -> Result<()> {
        if let Some(dict) = self.resolve(names)? {
            table.replace_values(dict.code_to_name());
        }
        Ok(())
    }

    /// Headers from id form to name form.
    pub fn id_to_name(&self, table: &Table, names: Substitution<'_>) -> Result<Table> {
        let mut table = table.clone();
        self.id_to_name_in_place(&mut table, names)?;
        Ok(table)
    }

    pub fn id_to_name_in_place(&self, table: &mut Table, names: Substitution<'_>) -> Result<()> {
        if let Some(dict) = self.resolve(names)? {
            table.rename_columns(dict.id_to_name());
        }
        Ok(())
    }

    /// Code form and name form side by side.
    ///
    /// Each substituted column is followed by its name-form twin; columns
    /// that substitution leaves alone appear once. Both forms come from the
    /// same records, so rows are paired by position. A twin whose header
    /// would clash with another column gets [`NAME_SUFFIX`] appended.
    pub fn to_mixed_table(&self) -> Result<Table> {
        let codes = self.to_table(Substitution::Explicit(&NameDictionary::default()))?;
        let named = self.to_table(Substitution::Omitted)?;

        let mut columns: Vec<String> = Vec::with_capacity(codes.columns().len() * 2);
        let mut picks: Vec<(bool, usize)> = Vec::with_capacity(columns.capacity());
        for (i, (code_col, name_col)) in codes.columns().iter().zip(named.columns()).enumerate() {
            let same = code_col == name_col
                && codes.rows().iter().zip(named.rows()).all(|(c, n)| c[i] == n[i]);
            columns.push(code_col.clone());
            picks.push((false, i));
            if !same {
                let header = distinct_header(name_col, codes.columns(), &columns);
                columns.push(header);
                picks.push((true, i));
            }
        }

        let rows: Vec<Vec<Value>> = codes
            .rows()
            .iter()
            .zip(named.rows())
            .map(|(c, n)| {
                picks
                    .iter()
                    .map(|&(from_named, i)| if from_named { n[i].clone() } else { c[i].clone() })
                    .collect()
            })
            .collect();

        debug!(columns = columns.len(), rows = rows.len(), "built mixed table");
        Ok(Table::new(columns, rows))
    }
}

/// Appended to a name-form header in the mixed view when it clashes.
pub const NAME_SUFFIX: &str = " (name)";

fn distinct_header(name: &str, code_columns: &[String], taken: &[String]) -> String {
    let clashes = |h: &str| code_columns.iter().chain(taken).any(|c| c == h);
    if !clashes(name) {
        return name.to_string();
    }
    let mut header = format!("{name}{NAME_SUFFIX}");
    let mut n = 2;
    while clashes(&header) {
        header = format!("{name}{NAME_SUFFIX} {n}");
        n += 1;
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn region_doc() -> StatsDocument {
        StatsDocument::from(json!({"GET_STATS_DATA": {"STATISTICAL_DATA": {
            "CLASS_INF": {"CLASS_OBJ": [
                {"@id": "01", "@name": "Region", "CLASS": [
                    {"@code": "R1", "@name": "North"},
                    {"@code": "R2", "@name": "South"}
                ]}
            ]},
            "DATA_INF": {"VALUE": [
                {"@01": "R1", "value": "10"},
                {"@01": "R2", "value": "20"}
            ]}
        }}}))
    }

    fn renamed_region_doc() -> StatsDocument {
        let mut value = region_doc().into_value();
        value["GET_STATS_DATA"]["STATISTICAL_DATA"]["CLASS_INF"]["CLASS_OBJ"][0]["@name"] =
            json!("Prefecture");
        StatsDocument::from(value)
    }

    fn session(names: Names) -> StatsTable {
        StatsTable::new(StatsData::with_document("u", None, region_doc()), names)
    }

    #[test]
    fn omitted_names_use_the_cached_dictionary() {
        let s = session(Names::Omitted);
        let table = s.to_table(Substitution::Omitted).unwrap();
        assert_eq!(table.columns(), ["Region", "value"]);
        let first = json!({"Region": "North", "value": "10"});
        let second = json!({"Region": "South", "value": "20"});
        assert_eq!(&table.record(0).unwrap(), first.as_object().unwrap());
        assert_eq!(&table.record(1).unwrap(), second.as_object().unwrap());
    }

    #[test]
    fn empty_dictionary_bypasses_substitution() {
        let s = session(Names::Omitted);
        let table = s.to_table(Substitution::Explicit(&NameDictionary::default())).unwrap();
        let plain = Table::from_records(region_doc().values().unwrap()).unwrap();
        assert_eq!(table, plain);
    }

    #[test]
    fn explicit_session_dictionary_replaces_the_derived_one() {
        let dict = NameDictionary::new(
            HashMap::from([("@01".to_string(), "Area".to_string())]),
            HashMap::new(),
        );
        let s = session(Names::Explicit(dict));
        let table = s.to_table(Substitution::Omitted).unwrap();
        assert_eq!(table.columns(), ["Area", "value"]);
        assert_eq!(table.get(0, "Area"), Some(&json!("R1")));
    }

    #[test]
    fn make_names_rebuilds_from_the_document() {
        let mut s = session(Names::Explicit(NameDictionary::default()));
        assert!(s.names().unwrap().unwrap().is_empty());
        s.make_names().unwrap();
        assert_eq!(s.names().unwrap().unwrap().column_name("@01"), Some("Region"));
    }

    #[test]
    fn new_document_drops_derived_names() {
        let mut s = session(Names::Omitted);
        assert_eq!(s.names().unwrap().unwrap().column_name("@01"), Some("Region"));

        let previous = s.replace_document(renamed_region_doc());
        assert_eq!(previous, region_doc());
        assert_eq!(s.names().unwrap().unwrap().column_name("@01"), Some("Prefecture"));
        let table = s.to_table(Substitution::Omitted).unwrap();
        assert_eq!(table.columns(), ["Prefecture", "value"]);
    }

    #[test]
    fn new_document_keeps_explicit_names() {
        let dict = NameDictionary::new(
            HashMap::from([("@01".to_string(), "Area".to_string())]),
            HashMap::new(),
        );
        let mut s = session(Names::Explicit(dict));
        s.replace_document(renamed_region_doc());
        assert_eq!(s.names().unwrap().unwrap().column_name("@01"), Some("Area"));
        assert_eq!(s.stats().data(), &renamed_region_doc());
    }

    #[test]
    fn steps_can_run_separately() {
        let s = session(Names::Omitted);
        let raw = s.to_table(Substitution::Explicit(&NameDictionary::default())).unwrap();

        let values = s.code_to_name(&raw, Substitution::Omitted).unwrap();
        assert_eq!(values.columns(), ["@01", "value"]);
        assert_eq!(values.get(1, "@01"), Some(&json!("South")));

        let headers = s.id_to_name(&values, Substitution::Omitted).unwrap();
        assert_eq!(headers.columns(), ["Region", "value"]);

        let mut in_place = raw.clone();
        s.id_to_name_in_place(&mut in_place, Substitution::Omitted).unwrap();
        assert_eq!(in_place.columns(), ["Region", "value"]);
        assert_eq!(in_place.get(0, "Region"), Some(&json!("R1")));
    }

    #[test]
    fn mixed_table_interleaves_code_and_name_columns() {
        let s = session(Names::Omitted);
        let mixed = s.to_mixed_table().unwrap();
        assert_eq!(mixed.columns(), ["@01", "Region", "value"]);
        assert_eq!(mixed.rows()[1], vec![json!("R2"), json!("South"), json!("20")]);
    }

    #[test]
    fn mixed_table_keeps_codes_when_headers_are_not_renamed() {
        let dict = NameDictionary::new(
            HashMap::new(),
            HashMap::from([(
                "@01".to_string(),
                HashMap::from([("R1".to_string(), "North".to_string())]),
            )]),
        );
        let s = session(Names::Explicit(dict));
        let mixed = s.to_mixed_table().unwrap();
        assert_eq!(mixed.columns(), ["@01", "@01 (name)", "value"]);

        let record = mixed.record(0).unwrap();
        assert_eq!(record.get("@01"), Some(&json!("R1")));
        assert_eq!(record.get("@01 (name)"), Some(&json!("North")));
        assert_eq!(mixed.get(1, "@01 (name)"), Some(&json!("R2")));
    }

    #[test]
    fn mixed_table_avoids_renames_onto_other_code_columns() {
        let dict = NameDictionary::new(
            HashMap::from([("@01".to_string(), "value".to_string())]),
            HashMap::new(),
        );
        let s = session(Names::Explicit(dict));
        let mixed = s.to_mixed_table().unwrap();
        assert_eq!(mixed.columns(), ["@01", "value (name)", "value"]);
    }

    #[test]
    fn empty_document_has_no_names_and_no_table() {
        let doc = StatsDocument::empty();
        let s = StatsTable::new(StatsData::with_document("u", None, doc), Names::Omitted);
        assert!(s.names().unwrap().is_none());
        assert_eq!(
            s.to_table(Substitution::Omitted).unwrap_err().kind(),
            crate::error::ErrorKind::Parse
        );

        let mut table = Table::from_records(&[json!({"@01": "R1"})]).unwrap();
        s.code_to_name_in_place(&mut table, Substitution::Omitted).unwrap();
        assert_eq!(table.get(0, "@01"), Some(&json!("R1")));
    }
}

// crates/estat-core/src/names.rs

//! Code-to-name substitution dictionary.
//!
//! Built from the `CLASS_INF.CLASS_OBJ` section of a document. Each class
//! object becomes one table column keyed `@<id>`, so the dictionary has two
//! halves:
//!
//! - `id_to_name`: `@<id>` -> display name of the axis (used for headers);
//! - `code_to_name`: `@<id>` -> (category code -> category name) (used for cells).

use crate::document::{ClassObject, StatsDocument};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Prefix that turns a class-object id into its column identifier.
pub const COLUMN_PREFIX: char = '@';

/// `"area"` -> `"@area"`.
pub fn column_id(id: &str) -> String {
    format!("{COLUMN_PREFIX}{id}")
}

/// Immutable snapshot of the substitution mappings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameDictionary {
    id_to_name: HashMap<String, String>,
    code_to_name: HashMap<String, HashMap<String, String>>,
}

impl NameDictionary {
    /// Assembles a dictionary from explicit mappings.
    ///
    /// Either half may be empty; an empty half disables that substitution.
    pub fn new(
        id_to_name: HashMap<String, String>,
        code_to_name: HashMap<String, HashMap<String, String>>,
    ) -> Self {
        Self {
            id_to_name,
            code_to_name,
        }
    }

    /// Builds the dictionary from `doc`.
    ///
    /// Returns `Ok(None)` for an empty document. A non-empty document without
    /// the class-object list is an error.
    pub fn build(doc: &StatsDocument) -> Result<Option<Self>> {
        if doc.is_empty() {
            debug!("empty document; no name dictionary");
            return Ok(None);
        }
        let objects = doc.class_objects()?;
        Ok(Some(Self::from_class_objects(&objects)))
    }

    /// Later descriptors overwrite earlier ones with the same id.
    pub fn from_class_objects(objects: &[ClassObject]) -> Self {
        let mut names = Self::default();
        for obj in objects {
            let column = column_id(&obj.id);

            let codes: HashMap<String, String> = obj
                .class
                .codes()
                .iter()
                .map(|c| (c.code.clone(), c.name.clone()))
                .collect();

            if names.id_to_name.insert(column.clone(), obj.name.clone()).is_some() {
                warn!(column = %column, "duplicate class object id; keeping the last one");
            }
            names.code_to_name.insert(column, codes);
        }
        debug!(
            columns = names.id_to_name.len(),
            codes = names.code_to_name.values().map(HashMap::len).sum::<usize>(),
            "built name dictionary"
        );
        names
    }

    pub fn id_to_name(&self) -> &HashMap<String, String> {
        &self.id_to_name
    }

    pub fn code_to_name(&self) -> &HashMap<String, HashMap<String, String>> {
        &self.code_to_name
    }

    /// Display name for a column identifier.
    pub fn column_name(&self, column: &str) -> Option<&str> {
        self.id_to_name.get(column).map(String::as_str)
    }

    /// Display name for `code` in `column`.
    pub fn code_name(&self, column: &str, code: &str) -> Option<&str> {
        self.code_to_name
            .get(column)
            .and_then(|codes| codes.get(code))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty() && self.code_to_name.is_empty()
    }
}

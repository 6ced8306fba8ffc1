// crates/estat-core/src/document.rs

//! # Parsed Document
//!
//! The decoded JSON tree returned by `getStatsData`, plus the typed views the
//! name and table builders read from it.
//!
//! Handles the decode stages (gzip -> UTF-8 -> JSON) so the network fetcher
//! and the offline file loader share one transport path.

use crate::error::{EStatError, Result};
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Path to the class-object descriptors.
pub const CLASS_OBJ_PATH: [&str; 4] =
    ["GET_STATS_DATA", "STATISTICAL_DATA", "CLASS_INF", "CLASS_OBJ"];
/// Path to the data-value records.
pub const VALUE_PATH: [&str; 4] = ["GET_STATS_DATA", "STATISTICAL_DATA", "DATA_INF", "VALUE"];

/// One category of a class object: a code and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCode {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "@name")]
    pub name: String,
}

/// The `CLASS` field of a class object.
///
/// The API writes a bare object when an axis has exactly one category and a
/// list otherwise. The shape is decided once, when the descriptor is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Single(ClassCode),
    Multiple(Vec<ClassCode>),
}

impl Category {
    pub fn codes(&self) -> &[ClassCode] {
        match self {
            Category::Single(code) => std::slice::from_ref(code),
            Category::Multiple(codes) => codes,
        }
    }
}

/// One classification axis (e.g. "region") and its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassObject {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "CLASS")]
    pub class: Category,
}

/// Read-only JSON document as delivered by the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsDocument(Value);

impl From<Value> for StatsDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl StatsDocument {
    /// An empty top-level object (`{}`), the "nothing loaded yet" document.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    /// Decodes a gzip-compressed response body.
    pub fn from_gzip_bytes(body: &[u8]) -> Result<Self> {
        Self::from_gzip_reader(body)
    }

    /// Decompresses `reader`, checks UTF-8, then parses JSON.
    ///
    /// Every gzip member in the stream is decoded, not just the first.
    pub fn from_gzip_reader<R: Read>(reader: R) -> Result<Self> {
        let mut raw = Vec::new();
        MultiGzDecoder::new(reader)
            .read_to_end(&mut raw)
            .map_err(EStatError::Gzip)?;
        let text = String::from_utf8(raw)?;
        debug!(bytes = text.len(), "decompressed response body");
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    /// Loads a saved response from disk.
    ///
    /// Files ending in `.gz` go through the same gzip path as a network
    /// body; anything else is read as plain JSON text.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            EStatError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot open {}: {}", path.display(), e),
            ))
        })?;
        let mut reader = BufReader::new(file);

        let gzipped = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        if gzipped {
            return Self::from_gzip_reader(reader);
        }

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        Self::from_json_str(&String::from_utf8(raw)?)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// `true` for `{}` and `null`: nothing was loaded.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Walks `path`, failing with [`EStatError::MissingPath`] at the first gap.
    pub fn lookup(&self, path: &[&str]) -> Result<&Value> {
        let mut node = &self.0;
        for (depth, key) in path.iter().enumerate() {
            node = node
                .get(key)
                .ok_or_else(|| EStatError::MissingPath(path[..=depth].join(".")))?;
        }
        Ok(node)
    }

    /// Decodes the class-object descriptors.
    pub fn class_objects(&self) -> Result<Vec<ClassObject>> {
        let node = self.lookup(&CLASS_OBJ_PATH)?;
        Vec::<ClassObject>::deserialize(node).map_err(|e| EStatError::InvalidShape {
            path: CLASS_OBJ_PATH.join("."),
            reason: e.to_string(),
        })
    }

    /// The data-value records; a lone object counts as one record.
    pub fn values(&self) -> Result<&[Value]> {
        let node = self.lookup(&VALUE_PATH)?;
        match node {
            Value::Array(records) => Ok(records),
            Value::Object(_) => Ok(std::slice::from_ref(node)),
            other => Err(EStatError::InvalidShape {
                path: VALUE_PATH.join("."),
                reason: format!("expected a list of records, found {}", type_name(other)),
            }),
        }
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

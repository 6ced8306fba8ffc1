//! End-to-end: document -> dictionary -> table, without the network.

use estat_core::{
    ErrorKind, NameDictionary, Names, StatsData, StatsDocument, StatsTable, Substitution, Table,
};
use flate2::{write::GzEncoder, Compression};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io::Write;

fn region_doc() -> StatsDocument {
    StatsDocument::from_json_str(
        r#"{"GET_STATS_DATA":{"STATISTICAL_DATA":{"CLASS_INF":{"CLASS_OBJ":[{"@id":"01","@name":"Region","CLASS":[{"@code":"R1","@name":"North"},{"@code":"R2","@name":"South"}]}]},"DATA_INF":{"VALUE":[{"@01":"R1","value":"10"},{"@01":"R2","value":"20"}]}}}}"#,
    )
    .unwrap()
}

/// Shaped like a real `getStatsData` response: a single-category table
/// item, a multi-category area axis, a time axis and a unit attribute.
fn census_doc() -> StatsDocument {
    StatsDocument::from(json!({"GET_STATS_DATA": {
        "RESULT": {"STATUS": 0, "ERROR_MSG": "正常に終了しました。"},
        "STATISTICAL_DATA": {
            "TABLE_INF": {"@id": "0003411595", "STATISTICS_NAME": "Census"},
            "CLASS_INF": {"CLASS_OBJ": [
                {"@id": "tab", "@name": "Table item",
                 "CLASS": {"@code": "020", "@name": "Population", "@unit": "persons"}},
                {"@id": "area", "@name": "Area", "CLASS": [
                    {"@code": "00000", "@name": "Japan", "@level": "1"},
                    {"@code": "01000", "@name": "Hokkaido", "@level": "2", "@parentCode": "00000"},
                    {"@code": "13000", "@name": "Tokyo", "@level": "2", "@parentCode": "00000"}
                ]},
                {"@id": "time", "@name": "Year", "CLASS": [
                    {"@code": "2015000000", "@name": "2015"},
                    {"@code": "2020000000", "@name": "2020"}
                ]}
            ]},
            "DATA_INF": {"VALUE": [
                {"@tab": "020", "@area": "00000", "@time": "2020000000", "@unit": "persons", "$": "126146099"},
                {"@tab": "020", "@area": "01000", "@time": "2020000000", "@unit": "persons", "$": "5224614"},
                {"@tab": "020", "@area": "13000", "@time": "2015000000", "@unit": "persons", "$": "13515271"},
                {"@tab": "020", "@area": "99999", "@time": "2020000000", "@unit": "persons", "$": "-"}
            ]}
        }
    }}))
}

fn session(doc: StatsDocument) -> StatsTable {
    StatsTable::new(StatsData::with_document("offline", None, doc), Names::Omitted)
}

fn row(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn region_example_is_fully_substituted() {
    let table = session(region_doc()).to_table(Substitution::Omitted).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.record(0).unwrap(), row(json!({"Region": "North", "value": "10"})));
    assert_eq!(table.record(1).unwrap(), row(json!({"Region": "South", "value": "20"})));
}

#[test]
fn single_category_axes_have_one_code_each() {
    let doc = StatsDocument::from(json!({"GET_STATS_DATA": {"STATISTICAL_DATA": {
        "CLASS_INF": {"CLASS_OBJ": [
            {"@id": "a", "@name": "A", "CLASS": {"@code": "1", "@name": "one"}},
            {"@id": "b", "@name": "B", "CLASS": {"@code": "2", "@name": "two"}}
        ]}
    }}}));
    let names = NameDictionary::build(&doc).unwrap().unwrap();
    assert_eq!(names.id_to_name().len(), 2);
    assert!(names.code_to_name().values().all(|codes| codes.len() == 1));
}

#[test]
fn category_lists_have_one_entry_per_code() {
    let names = NameDictionary::build(&census_doc()).unwrap().unwrap();
    assert_eq!(names.code_to_name()["@area"].len(), 3);
    assert_eq!(names.code_to_name()["@time"].len(), 2);
    assert_eq!(names.code_to_name()["@tab"].len(), 1);
}

#[test]
fn empty_override_matches_plain_flattening() {
    let doc = census_doc();
    let plain = Table::from_records(doc.values().unwrap()).unwrap();
    let untouched = session(doc)
        .to_table(Substitution::Explicit(&NameDictionary::default()))
        .unwrap();

    assert_eq!(untouched, plain);
    assert_eq!(
        serde_json::to_string(&untouched).unwrap(),
        serde_json::to_string(&plain).unwrap()
    );
}

#[test]
fn renamed_headers_come_from_the_dictionary() {
    let s = session(census_doc());
    let names = s.names().unwrap().unwrap().clone();
    let raw = s
        .to_table(Substitution::Explicit(&NameDictionary::default()))
        .unwrap();

    let values = s.code_to_name(&raw, Substitution::Explicit(&names)).unwrap();
    let named = s.id_to_name(&values, Substitution::Explicit(&names)).unwrap();

    let display: HashSet<&str> = names.id_to_name().values().map(String::as_str).collect();
    for (before, after) in raw.columns().iter().zip(named.columns()) {
        if names.id_to_name().contains_key(before) {
            assert!(display.contains(after.as_str()), "{before} -> {after}");
        } else {
            assert_eq!(before, after);
        }
    }
    assert_eq!(named.columns(), ["Table item", "Area", "Year", "@unit", "$"]);
}

#[test]
fn unknown_codes_survive_substitution() {
    let table = session(census_doc()).to_table(Substitution::Omitted).unwrap();
    let areas: Vec<&Value> = table.column("Area").unwrap().collect();
    assert_eq!(areas, [&json!("Japan"), &json!("Hokkaido"), &json!("Tokyo"), &json!("99999")]);
    assert_eq!(table.get(3, "$"), Some(&json!("-")));
}

#[test]
fn mixed_table_keeps_both_forms() {
    let mixed = session(census_doc()).to_mixed_table().unwrap();
    assert_eq!(
        mixed.columns(),
        ["@tab", "Table item", "@area", "Area", "@time", "Year", "@unit", "$"]
    );
    assert_eq!(mixed.get(1, "@area"), Some(&json!("01000")));
    assert_eq!(mixed.get(1, "Area"), Some(&json!("Hokkaido")));
}

#[test]
fn merge_pairs_forms_on_shared_columns() {
    let s = session(region_doc());
    let codes = s
        .to_table(Substitution::Explicit(&NameDictionary::default()))
        .unwrap();
    let named = s.to_table(Substitution::Omitted).unwrap();

    let merged = codes.merge(&named).unwrap();
    assert_eq!(merged.columns(), ["@01", "value", "Region"]);
    assert_eq!(
        merged.record(1).unwrap(),
        row(json!({"@01": "R2", "value": "20", "Region": "South"}))
    );
}

#[test]
fn empty_document_short_circuits_names_but_not_tables() {
    let doc = StatsDocument::from_json_str("{}").unwrap();
    assert_eq!(NameDictionary::build(&doc).unwrap(), None);

    let err = session(doc).to_table(Substitution::Omitted).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn saved_responses_load_from_disk() {
    let dir = std::env::temp_dir().join(format!("estat-core-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let text = serde_json::to_string(region_doc().as_value()).unwrap();
    let plain = dir.join("stats.json");
    std::fs::write(&plain, &text).unwrap();

    let gz = dir.join("stats.json.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

    assert_eq!(StatsDocument::from_path(&plain).unwrap(), region_doc());
    assert_eq!(StatsDocument::from_path(&gz).unwrap(), region_doc());

    let err = StatsDocument::from_path(dir.join("missing.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);

    std::fs::remove_dir_all(&dir).ok();
}

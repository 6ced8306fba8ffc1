//! Offline example: code form, name form and both side by side.
//!
//! Works on an inline document, so no application id is needed.

use estat_rs::prelude::*;

const DOC: &str = r#"{"GET_STATS_DATA":{"STATISTICAL_DATA":{
  "CLASS_INF":{"CLASS_OBJ":[
    {"@id":"01","@name":"Region","CLASS":[{"@code":"R1","@name":"North"},{"@code":"R2","@name":"South"}]},
    {"@id":"time","@name":"Year","CLASS":{"@code":"2020000000","@name":"2020"}}
  ]},
  "DATA_INF":{"VALUE":[
    {"@01":"R1","@time":"2020000000","$":"10"},
    {"@01":"R2","@time":"2020000000","$":"20"}
  ]}}}}"#;

fn print(title: &str, table: &Table) {
    println!("--- {title} ---");
    println!("{}", table.columns().join(" | "));
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join(" | "));
    }
    println!();
}

fn main() -> Result<()> {
    let doc = StatsDocument::from_json_str(DOC)?;
    let session = StatsTable::new(StatsData::with_document("inline", None, doc), Names::Omitted);

    // 1. Untouched codes and ids
    let codes = session.to_table(Substitution::Explicit(&NameDictionary::default()))?;
    print("code/id form", &codes);

    // 2. Values first, headers second
    let values = session.code_to_name(&codes, Substitution::Omitted)?;
    print("names in cells, ids in headers", &values);
    let named = session.id_to_name(&values, Substitution::Omitted)?;
    print("name form", &named);

    // 3. Both, side by side
    print("mixed", &session.to_mixed_table()?);

    Ok(())
}

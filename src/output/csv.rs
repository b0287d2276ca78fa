//! CSV output for query records.

use super::json::write_atomic;
use crate::error::{AuditError, Result};
use itertools::Itertools;
use serde_json::{Map, Value};
use std::path::Path;

/// Flatten records into CSV text.
///
/// The header is the union of keys in first-seen order; a record missing a
/// key gets an empty cell. Nested arrays and objects are written as compact
/// JSON. Fails if any record is not a JSON object.
pub fn records_to_csv(records: &[Value]) -> Result<String> {
    let rows: Vec<&Map<String, Value>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.as_object().ok_or_else(|| {
                AuditError::export("csv", format!("record {i} is not an object, cannot flatten"))
            })
        })
        .collect::<Result<_>>()?;

    let header: Vec<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .unique()
        .collect();

    let mut out = String::new();
    out.push_str(&header.iter().map(|h| escape_csv_field(h)).join(","));
    out.push('\n');
    for row in rows {
        let line = header
            .iter()
            .map(|key| escape_csv_field(&cell_text(row.get(*key))))
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Write records as CSV. The caller skips empty record sets.
pub fn export_csv(records: &[Value], path: &Path) -> Result<()> {
    let csv = records_to_csv(records)?;
    write_atomic(path, csv.as_bytes())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n', '\r']) {
        // Enclose in double quotes and double any embedded quotes.
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_header_is_union_in_first_seen_order() {
        let records = vec![
            json!({"name": "vnet1", "location": "eastus"}),
            json!({"name": "vnet2", "subnets": 3}),
        ];
        let csv = records_to_csv(&records).unwrap();
        assert_eq!(
            csv,
            "name,location,subnets\nvnet1,eastus,\nvnet2,,3\n"
        );
    }

    #[test]
    fn test_nested_values_as_json() {
        let records = vec![json!({
            "name": "vnet1",
            "addressSpace": ["10.0.0.0/16", "10.1.0.0/16"],
            "tags": {"env": "prod"},
            "enabled": true,
            "owner": null
        })];
        let csv = records_to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,addressSpace,tags,enabled,owner");
        assert_eq!(
            lines[1],
            r#"vnet1,"[""10.0.0.0/16"",""10.1.0.0/16""]","{""env"":""prod""}",true,"#
        );
    }

    #[test]
    fn test_non_object_record_fails() {
        let records = vec![json!({"name": "a"}), json!("loose string")];
        let err = records_to_csv(&records).unwrap_err();
        assert!(matches!(err, AuditError::Export { format: "csv", .. }));
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_export_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nsgs.csv");
        export_csv(&[json!({"name": "nsg-1", "rulesCount": 4})], &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name,rulesCount\nnsg-1,4\n"
        );
    }
}

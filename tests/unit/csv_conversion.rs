//! Unit tests for JSON to CSV conversion
//!
//! Tests cover:
//! - Column derivation from heterogeneous records
//! - Cell quoting and escaping rules
//! - Shape errors and the empty-input special cases
//! - Depth limits on adversarial input

use assert_matches::assert_matches;
use jsonconv::conversion::{convert_json_string, ConversionConfig, DelimiterType};
use jsonconv::error::ConversionError;
use jsonconv::{to_csv, CsvFormatter, FormatError, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn value(json: serde_json::Value) -> Value {
    Value::try_from(json).unwrap()
}

#[cfg(test)]
mod csv_conversion_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Uniform flat records: one header plus one line per record
    #[test]
    fn test_uniform_records_line_and_field_counts() {
        let records = value(json!([
            {"id": 1, "name": "Alice", "active": true},
            {"id": 2, "name": "Bob", "active": false},
            {"id": 3, "name": "Carol", "active": true}
        ]));

        let csv = to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id,name,active");
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 3);
        }
        assert_eq!(lines[2], "2,Bob,false");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_empty_array_is_empty_string() {
        assert_eq!(to_csv(&value(json!([]))).unwrap(), "");
    }

    #[test]
    fn test_single_empty_object_is_header_only_line() {
        assert_eq!(to_csv(&value(json!([{}]))).unwrap(), "\n");
        assert_eq!(to_csv(&value(json!({}))).unwrap(), "\n");
    }

    /// Columns are the first-seen union; missing fields are empty, not "null"
    #[test]
    fn test_heterogeneous_records_union_columns() {
        let records = value(json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "email": "bob@example.com"},
            {"name": "Carol", "id": 3, "phone": null}
        ]));

        let csv = to_csv(&records).unwrap();
        assert_eq!(
            csv,
            "id,name,email,phone\n1,Alice,,\n2,,bob@example.com,\n3,Carol,,"
        );
    }

    #[test]
    fn test_string_quoting_rules() {
        let record = value(json!({
            "plain": "hello world",
            "comma": "a,b",
            "quote": "say \"hi\"",
            "both": "x, \"y\""
        }));

        let csv = to_csv(&record).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#"hello world,"a,b","say ""hi""","x, ""y""""#
        );
    }

    #[test]
    fn test_scalar_cells() {
        let record = value(json!({"n": 1.5, "i": -7, "t": true, "f": false, "z": null, "e": ""}));
        let csv = to_csv(&record).unwrap();
        assert_eq!(csv, "n,i,t,f,z,e\n1.5,-7,true,false,,");
    }

    #[test]
    fn test_nested_values_serialized_as_quoted_json() {
        let record = value(json!({
            "tags": ["a", "b"],
            "address": {"city": "Oslo", "zip": "0150"},
            "empty": []
        }));

        let csv = to_csv(&record).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#""[""a"",""b""]","{""city"":""Oslo"",""zip"":""0150""}","[]""#
        );
    }

    #[test]
    fn test_newlines_not_quoted_by_default() {
        let csv = to_csv(&value(json!([{"note": "a\nb"}]))).unwrap();
        assert_eq!(csv, "note\na\nb");
    }

    #[test]
    fn test_strict_csv_quotes_newlines() {
        let config = ConversionConfig::strict_csv();
        let csv = CsvFormatter::from_config(&config)
            .format(&value(json!([{"note": "a\r\nb", "ok": "c"}])))
            .unwrap();
        assert_eq!(csv, "note,ok\n\"a\r\nb\",c");
    }

    #[test]
    fn test_pipe_delimiter() {
        let config = ConversionConfig::default().with_delimiter(DelimiterType::Pipe);
        let csv = CsvFormatter::from_config(&config)
            .format(&value(json!([{"a": "x|y", "b": "p,q"}])))
            .unwrap();
        assert_eq!(csv, "a|b\n\"x|y\"|p,q");
    }

    /// Splitting a flat record's CSV on commas gives back the field pairs
    #[test]
    fn test_flat_record_split_roundtrip() {
        let record = value(json!({"id": 42, "name": "Widget", "price": 9.99, "stock": true}));
        let csv = to_csv(&record).unwrap();

        let mut lines = csv.lines();
        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        let pairs: Vec<(&str, &str)> = header.into_iter().zip(row).collect();

        assert_eq!(
            pairs,
            vec![("id", "42"), ("name", "Widget"), ("price", "9.99"), ("stock", "true")]
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        for input in [json!(42), json!("text"), json!(null), json!([1, 2, 3])] {
            assert_matches!(
                to_csv(&value(input)),
                Err(FormatError::UnsupportedShape { .. })
            );
        }
    }

    #[test]
    fn test_array_with_non_object_element_rejected() {
        let records = value(json!([{"a": 1}, "stray", {"a": 2}]));
        let err = to_csv(&records).unwrap_err();
        assert_eq!(err, FormatError::unsupported_shape("array containing string"));
    }

    #[test]
    fn test_deterministic_output() {
        let records = value(json!([{"b": 1, "a": 2}, {"c": 3, "a": 4}]));
        let first = to_csv(&records).unwrap();
        for _ in 0..10 {
            assert_eq!(to_csv(&records).unwrap(), first);
        }
        assert_eq!(first, "b,a,c\n1,2,\n,4,3");
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = value(json!([{"a": [1, {"b": null}]}]));
        let before = records.clone();
        to_csv(&records).unwrap();
        assert_eq!(records, before);
    }

    /// 10,000 levels of nesting inside a cell fail cleanly
    #[test]
    fn test_very_deep_cell_fails_with_depth_exceeded() {
        // Dropping a deep tree recurses, so give the worker room
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(|| {
                let mut deep = Value::Null;
                for _ in 0..10_000 {
                    deep = Value::Array(vec![deep]);
                }
                let record = Value::Object([("deep", deep)].into_iter().collect());
                to_csv(&Value::Array(vec![record]))
            })
            .unwrap();

        assert_eq!(
            handle.join().unwrap(),
            Err(FormatError::DepthExceeded { limit: 1000 })
        );
    }

    /// The same limit holds when the input arrives as JSON text
    #[test]
    fn test_very_deep_json_text_fails_with_depth_exceeded() {
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(|| {
                let json = format!("{}{}", "[".repeat(10_000), "]".repeat(10_000));
                convert_json_string(&json, &ConversionConfig::csv())
            })
            .unwrap();

        assert_matches!(
            handle.join().unwrap(),
            Err(ConversionError::FormatError(FormatError::DepthExceeded { limit: 1000 }))
        );
    }

    #[test]
    fn test_convert_json_string_csv() {
        let config = ConversionConfig::csv();
        let result = convert_json_string(r#"[{"x": 1}, {"y": 2}]"#, &config).unwrap();
        assert_eq!(result.content, "x,y\n1,\n,2");
        assert_eq!(result.metadata.record_count, Some(2));
    }

    #[test]
    fn test_convert_json_string_shape_error() {
        let config = ConversionConfig::csv();
        assert_matches!(
            convert_json_string("[[1]]", &config),
            Err(ConversionError::FormatError(FormatError::UnsupportedShape { .. }))
        );
    }
}

//! CSV transcoder
//!
//! Flattens one record or an array of records into a header line plus one
//! line per record. Columns are the ordered union of every record's fields,
//! in first-seen order.
//!
//! Cell rules, in priority order:
//! 1. Arrays and objects are re-serialised as JSON and always quoted
//! 2. Strings holding the delimiter or a double quote are quoted
//! 3. Null becomes an empty cell
//! 4. Anything else is written as its plain text
//!
//! Quoting doubles any inner double quote. Line breaks inside strings are
//! left alone unless `strict_csv` is set.

use crate::conversion::config::{ConversionConfig, DelimiterType};
use crate::error::{FormatError, FormattingResult};
use crate::value::{Map, Shape, Value};
use std::collections::HashSet;

/// CSV formatter
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    delimiter: DelimiterType,
    strict: bool,
    max_depth: Option<usize>,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::from_config(&ConversionConfig::default())
    }
}

impl CsvFormatter {
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            strict: config.strict_csv,
            max_depth: config.max_depth,
        }
    }

    /// Format a value as CSV text
    pub fn format(&self, value: &Value) -> FormattingResult<String> {
        // A record inside an array sits one level deeper than a lone record.
        let (records, record_depth): (Vec<&Map>, usize) = match (value.shape(), value) {
            (Shape::Object, Value::Object(map)) => (vec![map], 1),
            (Shape::RecordSet, Value::Array(items)) if items.is_empty() => {
                return Ok(String::new())
            }
            (Shape::RecordSet, Value::Array(items)) => {
                (items.iter().filter_map(Value::as_object).collect(), 2)
            }
            _ => return Err(FormatError::unsupported_shape(describe_shape(value))),
        };

        let columns = collect_columns(&records);
        let delimiter = self.delimiter.as_str();

        let mut lines = Vec::with_capacity(records.len() + 1);
        lines.push(columns.join(delimiter));

        for record in &records {
            let cells = columns
                .iter()
                .map(|column| match record.get(column) {
                    Some(cell) => self.format_cell(cell, record_depth),
                    None => Ok(String::new()),
                })
                .collect::<FormattingResult<Vec<_>>>()?;
            lines.push(cells.join(delimiter));
        }

        Ok(lines.join("\n"))
    }

    /// Render one cell; `depth` is the nesting level of the enclosing record
    fn format_cell(&self, value: &Value, depth: usize) -> FormattingResult<String> {
        match value {
            Value::Array(_) | Value::Object(_) => {
                if let Some(limit) = self.max_depth {
                    if depth + value.nesting_depth() > limit {
                        return Err(FormatError::DepthExceeded { limit });
                    }
                }
                let json = serde_json::to_string(value)
                    .map_err(|e| FormatError::serialization(e.to_string()))?;
                Ok(quote(&json))
            }
            Value::String(s) => {
                if self.needs_quoting(s) {
                    Ok(quote(s))
                } else {
                    Ok(s.clone())
                }
            }
            scalar => Ok(scalar.scalar_text().unwrap_or_default()),
        }
    }

    fn needs_quoting(&self, s: &str) -> bool {
        let delimiter = self.delimiter.as_char();
        s.chars().any(|c| {
            c == delimiter || c == '"' || (self.strict && (c == '\n' || c == '\r'))
        })
    }
}

/// What an unsupported value looks like, for the shape error
fn describe_shape(value: &Value) -> String {
    match value {
        Value::Array(items) => match items.iter().find(|item| item.as_object().is_none()) {
            Some(item) => format!("array containing {}", item.kind()),
            None => "array".to_string(),
        },
        other => other.kind().to_string(),
    }
}

/// Ordered union of field names across records, first-seen order
fn collect_columns<'a>(records: &[&'a Map]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    columns
}

/// Wrap in double quotes, doubling any inner double quote
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Convert a value to CSV with the default comma dialect
pub fn to_csv(value: &Value) -> FormattingResult<String> {
    CsvFormatter::default().format(value)
}

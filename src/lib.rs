//! JSON to CSV and XML converter
//!
//! Parsed JSON is turned into a typed [`Value`] once, then handed to one of
//! two pure transcoders:
//!
//! - [`to_csv`] flattens an object or an array of objects into a header row
//!   and data rows, deriving the columns from the fields it sees.
//! - [`to_xml`] renders any value as nested elements under a root tag.
//!
//! ```
//! use jsonconv::{to_csv, to_xml, Value};
//!
//! let value: Value = serde_json::from_str(r#"[{"id": 1, "tags": ["a"]}]"#).unwrap();
//! assert_eq!(to_csv(&value).unwrap(), "id,tags\n1,\"[\"\"a\"\"]\"");
//! assert!(to_xml(&value).unwrap().ends_with("<root>\n  <id>1</id>\n  <tags>a</tags>\n</root>"));
//! ```

pub mod cli;
pub mod conversion;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod value;

// Re-export commonly used types
pub use conversion::{
    convert_json_string, ConversionConfig, ConversionEngine, ConvertedData, DelimiterType,
    OutputFormat,
};
pub use error::{ConversionError, ConversionErrorKind, FormatError, ParseError};
pub use formatter::{to_csv, to_xml, to_xml_with_root, CsvFormatter, XmlFormatter};
pub use parser::JsonSource;
pub use value::{Map, Shape, Value};

/// Convert a value to the given format with default configuration
pub fn convert_json(value: &Value, format: OutputFormat) -> Result<String, ConversionError> {
    let config = ConversionConfig::default().with_format(format);
    convert_json_with_config(value, &config)
}

/// Convert a value with custom configuration
pub fn convert_json_with_config(
    value: &Value,
    config: &ConversionConfig,
) -> Result<String, ConversionError> {
    let result = conversion::convert_value(value, config)?;
    Ok(result.content)
}

//! CSV and XML formatting module

pub mod csv;
pub mod xml;

pub use csv::{to_csv, CsvFormatter};
pub use xml::{escape_xml, to_xml, to_xml_with_root, XmlFormatter, XML_DECLARATION};

use crate::conversion::config::{ConversionConfig, OutputFormat};
use crate::error::FormattingResult;
use crate::value::Value;

/// Format a value in the configured output format
pub fn format_value(value: &Value, config: &ConversionConfig) -> FormattingResult<String> {
    match config.format {
        OutputFormat::Csv => CsvFormatter::from_config(config).format(value),
        OutputFormat::Xml => XmlFormatter::from_config(config).format(value),
    }
}

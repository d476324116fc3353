//! Core conversion engine for JSON to CSV/XML transformation

use crate::conversion::config::{ConversionConfig, OutputFormat};
use crate::conversion::limits;
use crate::conversion::ConversionResult;
use crate::error::{ConversionError, ConversionErrorKind};
use crate::formatter::format_value;
use crate::parser::JsonSource;
use crate::value::Value;
use std::time::Instant;

/// Core conversion result
#[derive(Debug, Clone)]
pub struct ConvertedData {
    pub content: String,
    pub metadata: ConversionMetadata,
}

impl ConvertedData {
    /// Create a new conversion result
    pub fn new(content: String, metadata: ConversionMetadata) -> Self {
        Self { content, metadata }
    }

    /// Get the formatted output
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Get the length of the output in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the output is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata about the conversion process
#[derive(Debug, Clone)]
pub struct ConversionMetadata {
    pub format: OutputFormat,
    /// Input size in bytes, when the text was available
    pub input_size: u64,
    pub output_size: u64,
    pub line_count: usize,
    /// Records written, for CSV output
    pub record_count: Option<usize>,
    pub processing_time_ms: u64,
}

/// Main conversion engine
#[derive(Debug)]
pub struct ConversionEngine {
    config: ConversionConfig,
}

impl ConversionEngine {
    /// Create a new engine, rejecting invalid configuration
    pub fn new(config: ConversionConfig) -> ConversionResult<Self> {
        config.validate().map_err(|e| {
            ConversionError::conversion(ConversionErrorKind::configuration(e))
        })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a parsed value
    pub fn convert(&self, value: &Value) -> ConversionResult<ConvertedData> {
        self.convert_sized(value, 0)
    }

    /// Convert JSON from a source
    pub fn convert_from_source(&self, source: &JsonSource) -> ConversionResult<ConvertedData> {
        // Check source size before reading to avoid loading very large files
        limits::check_source_size_before_read(source, &self.config)?;

        let content = source
            .read_content()
            .map_err(|e| ConversionError::io(e, source_path(source)))?;
        limits::check_content_size(&content, &self.config)?;

        self.convert_text(&content)
    }

    /// Convert a JSON string
    pub fn convert_string(&self, json_str: &str) -> ConversionResult<ConvertedData> {
        limits::check_content_size(json_str, &self.config)?;
        self.convert_text(json_str)
    }

    fn convert_text(&self, text: &str) -> ConversionResult<ConvertedData> {
        let source = JsonSource::String(text.to_string());
        let value = source.parse_with(self.config.enable_simd, self.config.max_depth)?;
        self.convert_sized(&value, text.len() as u64)
    }

    fn convert_sized(&self, value: &Value, input_size: u64) -> ConversionResult<ConvertedData> {
        let start_time = Instant::now();

        let content = format_value(value, &self.config)?;

        let record_count = match (self.config.format, value) {
            (OutputFormat::Csv, Value::Array(items)) => Some(items.len()),
            (OutputFormat::Csv, _) => Some(1),
            (OutputFormat::Xml, _) => None,
        };

        let metadata = ConversionMetadata {
            format: self.config.format,
            input_size,
            output_size: content.len() as u64,
            line_count: count_lines(&content),
            record_count,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(ConvertedData::new(content, metadata))
    }
}

fn source_path(source: &JsonSource) -> Option<std::path::PathBuf> {
    match source {
        JsonSource::File(path) | JsonSource::Directory(path) => Some(path.clone()),
        _ => None,
    }
}

// "" has no lines, "\n" has two (empty header and empty row).
fn count_lines(content: &str) -> usize {
    if content.is_empty() {
        0
    } else {
        content.split('\n').count()
    }
}

/// Convert a parsed value with the given configuration
pub fn convert_value(value: &Value, config: &ConversionConfig) -> ConversionResult<ConvertedData> {
    ConversionEngine::new(config.clone())?.convert(value)
}

/// Parse and convert a JSON string with the given configuration
pub fn convert_json_string(
    json_str: &str,
    config: &ConversionConfig,
) -> ConversionResult<ConvertedData> {
    ConversionEngine::new(config.clone())?.convert_string(json_str)
}

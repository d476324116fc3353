//! Configuration options for JSON to CSV/XML conversion

use crate::value::convert::DEFAULT_MAX_DEPTH;
use std::fmt;
use std::str::FromStr;

/// Target text format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Xml,
}

impl OutputFormat {
    /// File extension used for converted files
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => f.write_str("CSV"),
            OutputFormat::Xml => f.write_str("XML"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "xml" => Ok(OutputFormat::Xml),
            other => Err(format!("Invalid format '{}'. Use 'csv' or 'xml'", other)),
        }
    }
}

/// CSV field delimiter options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterType {
    /// Comma delimiter (,)
    #[default]
    Comma,
    /// Tab delimiter (\\t)
    Tab,
    /// Pipe delimiter (|)
    Pipe,
}

impl DelimiterType {
    pub fn as_char(&self) -> char {
        match self {
            DelimiterType::Comma => ',',
            DelimiterType::Tab => '\t',
            DelimiterType::Pipe => '|',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DelimiterType::Comma => ",",
            DelimiterType::Tab => "\t",
            DelimiterType::Pipe => "|",
        }
    }
}

impl FromStr for DelimiterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(DelimiterType::Comma),
            "tab" | "\t" => Ok(DelimiterType::Tab),
            "pipe" | "|" => Ok(DelimiterType::Pipe),
            other => Err(format!(
                "Invalid delimiter '{}'. Use 'comma', 'tab', or 'pipe'",
                other
            )),
        }
    }
}

/// Conversion configuration options
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Target format
    pub format: OutputFormat,
    /// Name of the XML root element
    pub root_name: String,
    /// Spaces per XML indentation level (0-8)
    pub indent_size: u8,
    /// CSV field delimiter
    pub delimiter: DelimiterType,
    /// Also quote CSV strings that contain line breaks
    pub strict_csv: bool,
    /// Maximum input size in bytes
    pub memory_limit: usize,
    /// Maximum nesting depth; `None` disables the guard
    pub max_depth: Option<usize>,
    /// Parse with simd-json when the `simd` feature is compiled in
    pub enable_simd: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            root_name: "root".to_string(),
            indent_size: 2,
            delimiter: DelimiterType::Comma,
            strict_csv: false,
            memory_limit: 100 * 1024 * 1024, // 100MB
            enable_simd: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default CSV configuration
    pub fn csv() -> Self {
        Self::default()
    }

    /// Default XML configuration
    pub fn xml() -> Self {
        Self {
            format: OutputFormat::Xml,
            ..Default::default()
        }
    }

    /// RFC 4180 style CSV: line breaks inside strings are quoted too
    pub fn strict_csv() -> Self {
        Self {
            strict_csv: true,
            ..Default::default()
        }
    }

    /// Set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set XML root element name
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Set indentation size
    pub fn with_indent_size(mut self, size: u8) -> Result<Self, String> {
        if size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }
        self.indent_size = size;
        Ok(self)
    }

    /// Set CSV delimiter
    pub fn with_delimiter(mut self, delimiter: DelimiterType) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable/disable newline quoting in CSV cells
    pub fn with_strict_csv(mut self, strict: bool) -> Self {
        self.strict_csv = strict;
        self
    }

    /// Set memory limit
    pub fn with_memory_limit(mut self, limit_bytes: usize) -> Self {
        self.memory_limit = limit_bytes;
        self
    }

    /// Enable SIMD parsing
    pub fn with_simd(mut self, enabled: bool) -> Self {
        self.enable_simd = enabled;
        self
    }

    /// Set maximum nesting depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.indent_size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }

        if self.memory_limit < 1024 {
            return Err("Memory limit must be at least 1KB".to_string());
        }

        if let Some(depth) = self.max_depth {
            if depth == 0 {
                return Err("Max depth must be at least 1".to_string());
            }
        }

        if self.format == OutputFormat::Xml && self.root_name.is_empty() {
            return Err("Root element name must not be empty".to_string());
        }

        Ok(())
    }
}

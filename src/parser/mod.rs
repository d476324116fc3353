//! JSON input sources, parsed straight into the value model

pub mod directory;
pub mod filter;

use crate::error::{ConversionError, ConversionResult, FormatError, ParseError, ParseResult};
use crate::value::convert::DEFAULT_MAX_DEPTH;
use crate::value::serde_impl::DepthLimitedSeed;
use crate::value::Value;
use serde::de::DeserializeSeed;
use std::cell::Cell;
use std::io::Read;
use std::path::PathBuf;

/// Characters of the offending line shown in a parse error preview
const PREVIEW_WIDTH: usize = 40;

/// Source for parsing operations
#[derive(Debug, Clone, PartialEq)]
pub enum JsonSource {
    /// Raw JSON string input
    String(String),
    /// Single JSON file path
    File(PathBuf),
    /// Directory containing multiple JSON files
    Directory(PathBuf),
    /// Standard input stream
    Stdin,
}

impl JsonSource {
    /// Parse JSON from this source with the default nesting limit
    pub fn parse(&self) -> ConversionResult<Value> {
        self.parse_with(false, Some(DEFAULT_MAX_DEPTH))
    }

    /// Parse JSON from this source, optionally with the SIMD parser
    pub fn parse_with(&self, simd: bool, max_depth: Option<usize>) -> ConversionResult<Value> {
        match self {
            JsonSource::Directory(_) => Err(ParseError::new(
                "Cannot parse directory as single JSON value".to_string(),
                None,
            )
            .into()),
            _ => {
                let content = self.read_content().map_err(|e| {
                    ParseError::new(format!("Failed to read {}: {}", self.description(), e), None)
                })?;
                if simd {
                    parse_from_string_simd(&content, max_depth)
                } else {
                    parse_with_depth(&content, max_depth)
                }
            }
        }
    }

    /// Get a human-readable description of the source
    pub fn description(&self) -> String {
        match self {
            JsonSource::String(_) => "string input".to_string(),
            JsonSource::File(path) => format!("file: {}", path.display()),
            JsonSource::Directory(path) => format!("directory: {}", path.display()),
            JsonSource::Stdin => "standard input".to_string(),
        }
    }

    /// Check if the source exists and is accessible
    pub fn exists(&self) -> bool {
        match self {
            JsonSource::String(_) | JsonSource::Stdin => true,
            JsonSource::File(path) => path.is_file(),
            JsonSource::Directory(path) => path.is_dir(),
        }
    }

    /// Get the size of the source in bytes, if known before reading
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            JsonSource::String(s) => Some(s.len() as u64),
            JsonSource::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            JsonSource::Directory(_) | JsonSource::Stdin => None,
        }
    }

    /// Read content as string (if possible)
    pub fn read_content(&self) -> Result<String, std::io::Error> {
        match self {
            JsonSource::String(content) => Ok(content.clone()),
            JsonSource::File(path) => std::fs::read_to_string(path),
            JsonSource::Stdin => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
            JsonSource::Directory(_) => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Cannot read directory as content",
            )),
        }
    }
}

/// Parse JSON text into a [`Value`] with the default nesting limit
pub fn parse_from_string(content: &str) -> ConversionResult<Value> {
    parse_with_depth(content, Some(DEFAULT_MAX_DEPTH))
}

/// Parse JSON text into a [`Value`], allowing at most `max_depth` nested
/// arrays and objects.
///
/// Nesting past the limit fails with [`FormatError::DepthExceeded`]. With
/// `max_depth: None` serde_json's own recursion limit of 128 levels still
/// applies and surfaces as a parse error.
pub fn parse_with_depth(content: &str, max_depth: Option<usize>) -> ConversionResult<Value> {
    let trimmed = non_empty(content)?;

    let exceeded = Cell::new(false);
    let mut deserializer = serde_json::Deserializer::from_str(trimmed);
    if max_depth.is_some() {
        // The seed bounds recursion instead
        deserializer.disable_recursion_limit();
    }

    DepthLimitedSeed::new(max_depth, &exceeded)
        .deserialize(&mut deserializer)
        .and_then(|value| deserializer.end().map(|_| value))
        .map_err(|e| match depth_error(&exceeded, max_depth) {
            Some(err) => err,
            None => {
                let location = (e.line() > 0).then(|| (e.line(), e.column()));
                let error = ParseError::new(format!("Invalid JSON: {}", e), location);
                match location.and_then(|(line, col)| error_preview(trimmed, line, col)) {
                    Some(preview) => error.with_preview(preview).into(),
                    None => error.into(),
                }
            }
        })
}

fn non_empty(content: &str) -> ParseResult<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new("Empty JSON string".to_string(), None));
    }
    Ok(trimmed)
}

fn depth_error(exceeded: &Cell<bool>, max_depth: Option<usize>) -> Option<ConversionError> {
    match (exceeded.get(), max_depth) {
        (true, Some(limit)) => Some(FormatError::DepthExceeded { limit }.into()),
        _ => None,
    }
}

#[cfg(feature = "simd")]
fn parse_from_string_simd(content: &str, max_depth: Option<usize>) -> ConversionResult<Value> {
    let trimmed = non_empty(content)?;

    // simd-json parses in place
    let mut bytes = trimmed.as_bytes().to_vec();
    let exceeded = Cell::new(false);
    simd_json::Deserializer::from_slice(&mut bytes)
        .and_then(|mut deserializer| {
            DepthLimitedSeed::new(max_depth, &exceeded).deserialize(&mut deserializer)
        })
        .map_err(|e| match depth_error(&exceeded, max_depth) {
            Some(err) => err,
            None => ParseError::new(format!("Invalid JSON: {}", e), None).into(),
        })
}

#[cfg(not(feature = "simd"))]
fn parse_from_string_simd(content: &str, max_depth: Option<usize>) -> ConversionResult<Value> {
    parse_with_depth(content, max_depth)
}

/// A window of the offending line around `col` with a caret under it.
///
/// `col` is the 1-based byte column reported by serde_json. Lines longer
/// than [`PREVIEW_WIDTH`] are clipped and marked with `...`.
fn error_preview(content: &str, line: usize, col: usize) -> Option<String> {
    let text = content.lines().nth(line.checked_sub(1)?)?;
    let pos = floor_char_boundary(text, col.saturating_sub(1));
    let start = floor_char_boundary(text, pos.saturating_sub(PREVIEW_WIDTH / 2));
    let end = ceil_char_boundary(text, start + PREVIEW_WIDTH);

    let lead = if start > 0 { "..." } else { "" };
    let trail = if end < text.len() { "..." } else { "" };
    let caret = " ".repeat(lead.len() + text[start..pos].chars().count());
    Some(format!("{}{}{}\n{}^", lead, &text[start..end], trail, caret))
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

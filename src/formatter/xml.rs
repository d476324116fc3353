//! XML transcoder
//!
//! Renders any value as nested elements named after its fields. Arrays
//! repeat their tag once per element at the same indentation instead of
//! wrapping the elements in a list element. There is no shape check: every
//! value is renderable, and tag names are written as given.

use crate::conversion::config::ConversionConfig;
use crate::error::FormattingResult;
use crate::value::convert::descend;
use crate::value::{format_number, Value};
use std::borrow::Cow;

/// Fixed first line of every document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// XML formatter
#[derive(Debug, Clone)]
pub struct XmlFormatter {
    root_name: String,
    indent: String,
    max_depth: Option<usize>,
}

impl Default for XmlFormatter {
    fn default() -> Self {
        Self::from_config(&ConversionConfig::default())
    }
}

impl XmlFormatter {
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            root_name: config.root_name.clone(),
            indent: " ".repeat(config.indent_size as usize),
            max_depth: config.max_depth,
        }
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Format a value as an XML document
    pub fn format(&self, value: &Value) -> FormattingResult<String> {
        let mut out = String::with_capacity(64);
        out.push_str(XML_DECLARATION);
        out.push('\n');

        match value {
            Value::Object(map) => {
                let depth = descend(0, self.max_depth)?;
                out.push('<');
                out.push_str(&self.root_name);
                out.push_str(">\n");
                for (key, field) in map.iter() {
                    self.write_element(&mut out, key, field, 1, depth)?;
                }
                out.push_str("</");
                out.push_str(&self.root_name);
                out.push_str(">\n");
            }
            other => self.write_element(&mut out, &self.root_name, other, 0, 0)?,
        }

        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    /// Write `value` as element(s) named `tag`.
    ///
    /// `level` is the indentation level, `depth` the number of enclosing
    /// composites. Array elements keep the level but add to the depth.
    fn write_element(
        &self,
        out: &mut String,
        tag: &str,
        value: &Value,
        level: usize,
        depth: usize,
    ) -> FormattingResult<()> {
        match value {
            Value::Null => {
                self.write_indent(out, level);
                out.push('<');
                out.push_str(tag);
                out.push_str(" />\n");
            }
            Value::Array(items) => {
                let depth = descend(depth, self.max_depth)?;
                for item in items {
                    self.write_element(out, tag, item, level, depth)?;
                }
            }
            Value::Object(map) => {
                let depth = descend(depth, self.max_depth)?;
                self.write_indent(out, level);
                out.push('<');
                out.push_str(tag);
                out.push_str(">\n");
                for (key, field) in map.iter() {
                    self.write_element(out, key, field, level + 1, depth)?;
                }
                self.write_indent(out, level);
                out.push_str("</");
                out.push_str(tag);
                out.push_str(">\n");
            }
            Value::Bool(b) => self.write_leaf(out, tag, if *b { "true" } else { "false" }, level),
            Value::Number(n) => self.write_leaf(out, tag, &format_number(*n), level),
            Value::String(s) => self.write_leaf(out, tag, &escape_xml(s), level),
        }
        Ok(())
    }

    fn write_leaf(&self, out: &mut String, tag: &str, text: &str, level: usize) {
        self.write_indent(out, level);
        out.push('<');
        out.push_str(tag);
        out.push('>');
        out.push_str(text);
        out.push_str("</");
        out.push_str(tag);
        out.push_str(">\n");
    }

    fn write_indent(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str(&self.indent);
        }
    }
}

/// Escape element text: `&`, `<`, `>`, `"` and `'`.
///
/// Single pass, so an entity produced here is never escaped again.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Convert a value to XML under a `<root>` element.
///
/// A top-level array renders each element as its own `<root>` element, so
/// an array of two or more values gives a fragment with several top-level
/// elements rather than a well-formed document. Wrap the array in an
/// object first when a single root is needed.
pub fn to_xml(value: &Value) -> FormattingResult<String> {
    XmlFormatter::default().format(value)
}

/// Convert a value to XML under a custom root element.
///
/// Top-level arrays repeat the root element as in [`to_xml`].
pub fn to_xml_with_root(value: &Value, root_name: &str) -> FormattingResult<String> {
    XmlFormatter::default().with_root_name(root_name).format(value)
}

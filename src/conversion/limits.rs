use crate::conversion::config::ConversionConfig;
use crate::conversion::ConversionResult;
use crate::error::{ConversionError, ConversionErrorKind};
use crate::parser::JsonSource;

/// Check the source size before attempting to read or parse the JSON.
/// This avoids loading very large files into memory if the user-configured
/// limit is smaller than the file.
pub fn check_source_size_before_read(
    source: &JsonSource,
    config: &ConversionConfig,
) -> ConversionResult<()> {
    match source.estimated_size() {
        Some(size) => check_size(size, config),
        None => Ok(()),
    }
}

/// Check the size of JSON text that is already in memory, e.g. from stdin
pub fn check_content_size(content: &str, config: &ConversionConfig) -> ConversionResult<()> {
    check_size(content.len() as u64, config)
}

fn check_size(size: u64, config: &ConversionConfig) -> ConversionResult<()> {
    if size > config.memory_limit as u64 {
        return Err(ConversionError::conversion(
            ConversionErrorKind::JsonTooLarge {
                size: size as usize,
                limit: config.memory_limit,
            },
        ));
    }
    Ok(())
}

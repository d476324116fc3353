//! JSON to CSV/XML conversion module
//!
//! This module contains the conversion engine, configuration, limits and statistics.

pub mod batch;
pub mod config;
pub mod engine;
pub mod limits;
pub mod stats;

pub use config::{ConversionConfig, DelimiterType, OutputFormat};

pub use engine::{
    convert_json_string, convert_value, ConversionEngine, ConversionMetadata, ConvertedData,
};

pub use crate::error::ConversionResult;

//! Statistics and performance tracking for conversion operations

use crate::conversion::engine::ConversionMetadata;
use serde::{Deserialize, Serialize};

/// Aggregate statistics across one or more conversions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStatistics {
    /// Input JSON size in bytes
    pub input_size_bytes: u64,
    /// Output size in bytes
    pub output_size_bytes: u64,
    /// Output lines written
    pub line_count: usize,
    /// CSV records written
    pub record_count: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Number of files converted
    pub file_count: usize,
    /// Number of sources that failed
    pub failed_count: usize,
    /// Average time per conversion
    pub avg_time_per_operation_ms: f32,
    /// Timestamp of when statistics were collected
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl Default for ConversionStatistics {
    fn default() -> Self {
        Self {
            input_size_bytes: 0,
            output_size_bytes: 0,
            line_count: 0,
            record_count: 0,
            processing_time_ms: 0,
            file_count: 0,
            failed_count: 0,
            avg_time_per_operation_ms: 0.0,
            collected_at: chrono::Utc::now(),
        }
    }
}

impl ConversionStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create statistics for a single conversion
    pub fn for_conversion(metadata: &ConversionMetadata) -> Self {
        Self {
            input_size_bytes: metadata.input_size,
            output_size_bytes: metadata.output_size,
            line_count: metadata.line_count,
            record_count: metadata.record_count.unwrap_or(0),
            processing_time_ms: metadata.processing_time_ms,
            file_count: 1,
            failed_count: 0,
            avg_time_per_operation_ms: metadata.processing_time_ms as f32,
            collected_at: chrono::Utc::now(),
        }
    }

    /// Combine statistics from multiple operations
    pub fn combine(&mut self, other: &Self) {
        self.input_size_bytes += other.input_size_bytes;
        self.output_size_bytes += other.output_size_bytes;
        self.line_count += other.line_count;
        self.record_count += other.record_count;
        self.file_count += other.file_count;
        self.failed_count += other.failed_count;
        self.processing_time_ms += other.processing_time_ms;

        self.avg_time_per_operation_ms = if self.file_count > 0 {
            self.processing_time_ms as f32 / self.file_count as f32
        } else {
            0.0
        };

        self.collected_at = chrono::Utc::now();
    }

    /// Count one failed source
    pub fn record_failure(&mut self) {
        self.failed_count += 1;
        self.collected_at = chrono::Utc::now();
    }

    /// Get a formatted summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Converted {} file(s) in {}ms - {} bytes in, {} bytes out, {} lines",
            self.file_count,
            self.processing_time_ms,
            self.input_size_bytes,
            self.output_size_bytes,
            self.line_count
        );
        if self.record_count > 0 {
            summary.push_str(&format!(", {} records", self.record_count));
        }
        if self.failed_count > 0 {
            summary.push_str(&format!(", {} failed", self.failed_count));
        }
        summary
    }

    /// Export to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

use crate::conversion::engine::{ConversionEngine, ConvertedData};
use crate::conversion::stats::ConversionStatistics;
use crate::conversion::{ConversionConfig, ConversionResult};
use crate::error::ConversionError;
use crate::parser::JsonSource;

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<(JsonSource, ConvertedData)>,
    pub failed: Vec<(JsonSource, ConversionError)>,
    pub statistics: ConversionStatistics,
}

/// Batch convert multiple JsonSource inputs.
///
/// Stops at the first failure unless `continue_on_error` is set, in which
/// case failures are collected in the report.
pub fn convert_batch_sources(
    sources: Vec<JsonSource>,
    config: &ConversionConfig,
    continue_on_error: bool,
) -> ConversionResult<BatchReport> {
    let engine = ConversionEngine::new(config.clone())?;
    let mut report = BatchReport::default();

    for src in sources {
        match engine.convert_from_source(&src) {
            Ok(data) => {
                report
                    .statistics
                    .combine(&ConversionStatistics::for_conversion(&data.metadata));
                report.converted.push((src, data));
            }
            Err(e) if continue_on_error => {
                report.statistics.record_failure();
                report.failed.push((src, e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

//! Command-line interface module

use clap::{Parser, ValueEnum};
use console::style;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::conversion::batch::BatchReport;
use crate::conversion::config::{DelimiterType, OutputFormat};
use crate::conversion::stats::ConversionStatistics;
use crate::conversion::{ConversionConfig, ConversionEngine, ConversionResult, ConvertedData};
use crate::error::{ConversionError, ConversionErrorKind};
use crate::parser::directory::find_json_files;
use crate::parser::JsonSource;

pub mod path_mapping;

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "jsonconv")]
#[command(about = "Convert JSON to CSV or XML")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Input JSON source (string, file, or directory)
    #[arg()]
    pub input: Option<String>,

    /// Output file path, or output directory for directory input (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read JSON from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// XML root element name (default: root)
    #[arg(long)]
    pub root: Option<String>,

    /// Spaces per XML indentation level (0-8, default: 2)
    #[arg(long)]
    pub indent: Option<u8>,

    /// CSV delimiter: comma, tab, or pipe (default: comma)
    #[arg(long)]
    pub delimiter: Option<Delimiter>,

    /// Quote CSV strings containing line breaks (RFC 4180 style)
    #[arg(long)]
    pub strict_csv: bool,

    /// Maximum nesting depth (default: 1000)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum input size (e.g., 100MB, default: 100MB)
    #[arg(long)]
    pub memory_limit: Option<String>,

    /// Use SIMD-optimized JSON parser
    #[arg(long)]
    pub simd: bool,

    /// Recursively process directories
    #[arg(long)]
    pub recursive: bool,

    /// Only validate JSON, don't convert
    #[arg(long)]
    pub validate_only: bool,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,

    /// Continue converting other files when one file fails
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Xml,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Xml => OutputFormat::Xml,
        }
    }
}

/// Delimiter types for CLI
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Delimiter {
    #[value(name = "comma", alias = ",")]
    Comma,
    #[value(name = "tab", alias = "\t")]
    Tab,
    #[value(name = "pipe", alias = "|")]
    Pipe,
}

impl From<Delimiter> for DelimiterType {
    fn from(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Comma => DelimiterType::Comma,
            Delimiter::Tab => DelimiterType::Tab,
            Delimiter::Pipe => DelimiterType::Pipe,
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub conversion_config: ConversionConfig,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConversionResult<Self> {
        let conversion_config = Self::create_conversion_config(&args)?;

        Ok(Self {
            args,
            conversion_config,
        })
    }

    /// Create conversion configuration from CLI arguments
    fn create_conversion_config(args: &Args) -> ConversionResult<ConversionConfig> {
        let defaults = ConversionConfig::default();

        let config = ConversionConfig {
            format: args.format.into(),
            root_name: args.root.clone().unwrap_or(defaults.root_name),
            indent_size: args.indent.unwrap_or(defaults.indent_size),
            delimiter: args.delimiter.map(Into::into).unwrap_or_default(),
            strict_csv: args.strict_csv,
            memory_limit: parse_memory_limit(&args.memory_limit)?,
            max_depth: args.max_depth.or(defaults.max_depth),
            enable_simd: args.simd,
        };

        // Validate configuration
        config
            .validate()
            .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))?;

        Ok(config)
    }

    /// Check if we should continue on error
    pub fn continue_on_error(&self) -> bool {
        self.args.continue_on_error
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.args.verbose && !self.args.quiet
    }

    /// Get input source description
    pub fn input_description(&self) -> String {
        if self.args.stdin {
            "standard input".to_string()
        } else if let Some(input) = &self.args.input {
            format!("'{}'", input)
        } else {
            "no input specified".to_string()
        }
    }

    /// Get output destination description
    pub fn output_description(&self) -> String {
        if let Some(output) = &self.args.output {
            format!("'{}'", output.display())
        } else {
            "standard output".to_string()
        }
    }

    /// Resolve the input arguments into a source
    pub fn source(&self) -> ConversionResult<JsonSource> {
        if self.args.stdin {
            return Ok(JsonSource::Stdin);
        }

        let input = self.args.input.as_ref().ok_or_else(|| {
            ConversionError::conversion(ConversionErrorKind::configuration(
                "No input provided. Use --stdin or provide an input path".to_string(),
            ))
        })?;

        // Inline JSON looks like an object or array literal
        let trimmed = input.trim();
        if (trimmed.starts_with('{') && trimmed.ends_with('}'))
            || (trimmed.starts_with('[') && trimmed.ends_with(']'))
        {
            return Ok(JsonSource::String(input.clone()));
        }

        let path = PathBuf::from(input);
        if path.is_file() {
            Ok(JsonSource::File(path))
        } else if path.is_dir() {
            Ok(JsonSource::Directory(path))
        } else {
            Err(ConversionError::conversion(ConversionErrorKind::io(
                "Input path does not exist".to_string(),
                Some(path),
            )))
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(args: Args) -> ConversionResult<()> {
    let cli = CliConfig::from_args(args)?;

    if cli.is_verbose() {
        CliUtils::show_note(&format!(
            "Converting {} to {} ({})",
            cli.input_description(),
            cli.conversion_config.format,
            cli.output_description()
        ));
    }

    let source = cli.source()?;
    let engine = ConversionEngine::new(cli.conversion_config.clone())?;

    if cli.args.validate_only {
        return match &source {
            JsonSource::Directory(dir) => validate_directory(&cli, &engine, dir),
            other => validate_source(&cli, &engine, other),
        };
    }

    match &source {
        JsonSource::Directory(dir) => {
            let report = convert_directory(&cli, &engine, dir)?;
            if cli.args.stats {
                output_statistics(&report.statistics, cli.is_quiet());
            }
            if !report.failed.is_empty() {
                return Err(ConversionError::conversion(
                    ConversionErrorKind::ConversionFailed {
                        message: format!("{} file(s) failed to convert", report.failed.len()),
                    },
                ));
            }
            Ok(())
        }
        other => {
            let data = engine.convert_from_source(other)?;
            write_output(&cli, &data)?;
            if cli.args.stats {
                output_statistics(
                    &ConversionStatistics::for_conversion(&data.metadata),
                    cli.is_quiet(),
                );
            }
            Ok(())
        }
    }
}

fn write_output(cli: &CliConfig, data: &ConvertedData) -> ConversionResult<()> {
    match &cli.args.output {
        Some(output_path) => {
            write_file(output_path, &data.content)?;
            CliUtils::show_success(
                &format!("Converted to: {}", output_path.display()),
                cli.is_quiet(),
            );
        }
        None => println!("{}", data.content),
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> ConversionResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConversionError::io(e, Some(parent.to_path_buf())))?;
    }
    std::fs::write(path, content).map_err(|e| ConversionError::io(e, Some(path.to_path_buf())))
}

/// Convert every JSON file under `input_dir`, mirroring the tree into the
/// output directory
fn convert_directory(
    cli: &CliConfig,
    engine: &ConversionEngine,
    input_dir: &Path,
) -> ConversionResult<BatchReport> {
    let output_dir = cli.args.output.as_ref().ok_or_else(|| {
        ConversionError::conversion(ConversionErrorKind::configuration(
            "Output directory required for directory conversion".to_string(),
        ))
    })?;

    let json_files = find_json_files(input_dir, cli.args.recursive)
        .map_err(|e| ConversionError::io(e, Some(input_dir.to_path_buf())))?;

    let mut report = BatchReport::default();
    if json_files.is_empty() {
        CliUtils::show_warning(
            &format!("No JSON files found in {}", input_dir.display()),
            cli.is_quiet(),
        );
        return Ok(report);
    }

    std::fs::create_dir_all(output_dir)
        .map_err(|e| ConversionError::io(e, Some(output_dir.clone())))?;

    if !cli.is_quiet() {
        println!("Found {} JSON files", json_files.len());
    }

    let progress = if cli.is_quiet() {
        indicatif::ProgressBar::hidden()
    } else {
        CliUtils::create_progress_bar(json_files.len() as u64)
    };

    let extension = cli.conversion_config.format.extension();
    for json_file in json_files {
        let relative = json_file
            .strip_prefix(input_dir)
            .unwrap_or(&json_file)
            .to_path_buf();
        let output_file =
            path_mapping::map_input_to_output(input_dir, &json_file, output_dir, extension);
        let source = JsonSource::File(json_file);

        let result = engine
            .convert_from_source(&source)
            .and_then(|data| write_file(&output_file, &data.content).map(|_| data));

        match result {
            Ok(data) => {
                progress.suspend(|| {
                    CliUtils::show_success(
                        &format!("{} -> {}", relative.display(), output_file.display()),
                        cli.is_quiet(),
                    )
                });
                report
                    .statistics
                    .combine(&ConversionStatistics::for_conversion(&data.metadata));
                report.converted.push((source, data));
            }
            Err(e) => {
                progress.suspend(|| {
                    CliUtils::show_error(&format!(
                        "Error converting {}: {}",
                        relative.display(),
                        e.user_message()
                    ))
                });
                if !cli.continue_on_error() {
                    progress.finish_and_clear();
                    return Err(e);
                }
                report.statistics.record_failure();
                report.failed.push((source, e));
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}

fn validate_source(
    cli: &CliConfig,
    engine: &ConversionEngine,
    source: &JsonSource,
) -> ConversionResult<()> {
    let value = source.parse_with(
        cli.conversion_config.enable_simd,
        cli.conversion_config.max_depth,
    )?;
    // Running the transcoder also checks shape and depth
    engine.convert(&value)?;
    CliUtils::show_success(
        &format!("Valid JSON for {}", cli.conversion_config.format),
        cli.is_quiet(),
    );
    Ok(())
}

fn validate_directory(
    cli: &CliConfig,
    engine: &ConversionEngine,
    dir: &Path,
) -> ConversionResult<()> {
    let json_files = find_json_files(dir, cli.args.recursive)
        .map_err(|e| ConversionError::io(e, Some(dir.to_path_buf())))?;

    let mut invalid = 0;
    for json_file in json_files {
        let relative = json_file.strip_prefix(dir).unwrap_or(&json_file).to_path_buf();
        let result = engine.convert_from_source(&JsonSource::File(json_file));
        match result {
            Ok(_) => CliUtils::show_success(&relative.display().to_string(), cli.is_quiet()),
            Err(e) => {
                invalid += 1;
                CliUtils::show_error(&format!("{}: {}", relative.display(), e.user_message()));
            }
        }
    }

    if invalid > 0 {
        return Err(ConversionError::conversion(
            ConversionErrorKind::ConversionFailed {
                message: format!("{} invalid file(s)", invalid),
            },
        ));
    }
    Ok(())
}

fn output_statistics(stats: &ConversionStatistics, quiet: bool) {
    if quiet {
        return;
    }

    eprintln!("\nConversion Statistics:");
    eprintln!("Files: {}", stats.file_count);
    eprintln!(
        "Input size: {}",
        CliUtils::format_file_size(stats.input_size_bytes)
    );
    eprintln!(
        "Output size: {}",
        CliUtils::format_file_size(stats.output_size_bytes)
    );
    eprintln!("Lines: {}", stats.line_count);
    if stats.record_count > 0 {
        eprintln!("Records: {}", stats.record_count);
    }
    if stats.failed_count > 0 {
        eprintln!("Failed: {}", stats.failed_count);
    }
    eprintln!(
        "Processing time: {}",
        CliUtils::format_duration(Duration::from_millis(stats.processing_time_ms))
    );
}

/// Parse memory limit string (e.g., "100MB", "1GB", "500KB")
fn parse_memory_limit(limit: &Option<String>) -> ConversionResult<usize> {
    let invalid = |limit_str: &str| {
        ConversionError::conversion(ConversionErrorKind::Configuration {
            message: format!("Invalid memory limit: {}", limit_str),
        })
    };

    match limit {
        None => Ok(100 * 1024 * 1024), // 100MB default
        Some(limit_str) => {
            let limit_str = limit_str.trim().to_uppercase();

            let (number, multiplier) = if let Some(size) = limit_str.strip_suffix("GB") {
                (size, 1024.0 * 1024.0 * 1024.0)
            } else if let Some(size) = limit_str.strip_suffix("MB") {
                (size, 1024.0 * 1024.0)
            } else if let Some(size) = limit_str.strip_suffix("KB") {
                (size, 1024.0)
            } else if let Some(size) = limit_str.strip_suffix('B') {
                (size, 1.0)
            } else {
                // Assume bytes
                (limit_str.as_str(), 1.0)
            };

            let value = number
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(&limit_str))?;
            if value < 0.0 {
                return Err(invalid(&limit_str));
            }
            Ok((value * multiplier) as usize)
        }
    }
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Show a verbose note
    pub fn show_note(message: &str) {
        eprintln!("{} {}", style("·").dim(), message);
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    CliUtils::show_error(&error.user_message());

    // Provide helpful suggestions
    match error {
        ConversionError::ParseError(err) => {
            if let Some(preview) = &err.input_preview {
                eprintln!("\n{}", preview);
            }
            eprintln!("\nTip: Use --validate-only to check JSON syntax before conversion");
        }
        ConversionError::Conversion {
            kind: ConversionErrorKind::JsonTooLarge { .. },
            ..
        } => {
            eprintln!("\nTip: Use --memory-limit to increase the input size allowance");
        }
        ConversionError::FormatError(crate::error::FormatError::UnsupportedShape { .. }) => {
            eprintln!("\nTip: Use --format xml for values that are not records");
        }
        _ => {}
    }
}

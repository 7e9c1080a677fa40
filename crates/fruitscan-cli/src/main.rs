//! fruitscan: assess a fruit photo from the command line.
//!
//! Decodes a JPEG, PNG or WebP photo, runs the analysis pipeline and
//! prints the fruit and freshness verdicts. Useful for:
//!
//! - Checking how a photo is classified without the web front end
//! - Producing the flat record a history store would persist
//! - Measuring per-stage durations across repeated runs
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin fruitscan -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod logger;

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use fruitscan_pipeline::diagnostics::{AnalysisDiagnostics, Clock, duration_ms};
use fruitscan_pipeline::{
    AnalysisConfig, AnalysisError, AnalysisRecord, AnalysisResult, DownsampleFilter, FruitInfo,
    PixelBuffer,
};
use serde::Serialize;
use tracing::{debug, error, info};

/// Fruit type and freshness assessment from a photo.
///
/// Classifies the fruit from its average colors and scores freshness
/// from brightness, uniformity, dark spots and saturation.
#[derive(Parser)]
#[command(name = "fruitscan", version)]
struct Cli {
    /// Path to the input image (JPEG, PNG, WebP).
    image_path: PathBuf,

    /// Working resolution the image is scaled to before analysis (1 to 4096).
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_WORKING_RESOLUTION, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..=u64::from(AnalysisConfig::MAX_WORKING_RESOLUTION)))]
    working_resolution: u32,

    /// Resampling filter (nearest, triangle, catmull-rom, gaussian, lanczos3).
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    downsample_filter: Filter,

    /// Full analysis config as a JSON string.
    ///
    /// When provided, `--working-resolution` and `--downsample-filter`
    /// are ignored. Missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Output as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Include the flat record a history store would persist.
    #[arg(long)]
    record: bool,

    /// Include reference information about the detected fruit.
    #[arg(long)]
    info: bool,

    /// Include per-stage timing diagnostics.
    #[arg(long)]
    diagnostics: bool,

    /// Number of runs for averaging stage durations.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Downsample resampling filter selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

/// Maps a [`DownsampleFilter`] to the local CLI [`Filter`] enum.
const fn filter_from_pipeline(f: DownsampleFilter) -> Filter {
    match f {
        DownsampleFilter::Nearest => Filter::Nearest,
        DownsampleFilter::Triangle => Filter::Triangle,
        DownsampleFilter::CatmullRom => Filter::CatmullRom,
        DownsampleFilter::Gaussian => Filter::Gaussian,
        DownsampleFilter::Lanczos3 => Filter::Lanczos3,
    }
}

/// Maps the local CLI [`Filter`] enum to a [`DownsampleFilter`].
const fn filter_to_pipeline(f: Filter) -> DownsampleFilter {
    match f {
        Filter::Nearest => DownsampleFilter::Nearest,
        Filter::Triangle => DownsampleFilter::Triangle,
        Filter::CatmullRom => DownsampleFilter::CatmullRom,
        Filter::Gaussian => DownsampleFilter::Gaussian,
        Filter::Lanczos3 => DownsampleFilter::Lanczos3,
    }
}

/// The CLI default filter, derived from
/// [`AnalysisConfig::DEFAULT_DOWNSAMPLE_FILTER`] so the two cannot
/// silently diverge.
const CLI_DEFAULT_FILTER: Filter = filter_from_pipeline(AnalysisConfig::DEFAULT_DOWNSAMPLE_FILTER);

/// Build an [`AnalysisConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<AnalysisConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        AnalysisConfig {
            working_resolution: cli.working_resolution,
            downsample_filter: filter_to_pipeline(cli.downsample_filter),
        }
    };
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;
    Ok(config)
}

/// Everything printed for one image in `--json` mode.
#[derive(Serialize)]
struct Output<'a> {
    result: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<AnalysisRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<&'static FruitInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a AnalysisDiagnostics>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        path = %cli.image_path.display(),
        bytes = image_bytes.len(),
        "loaded image",
    );
    debug!(?config, runs = cli.runs, "analysis settings");

    let buffer = match fruitscan_pipeline::decode::decode_rgba(&image_bytes) {
        Ok(buffer) => buffer,
        Err(e) => return report_failure(&e),
    };

    match run(&cli, &config, &buffer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Analysis(e)) => report_failure(&e),
        Err(RunError::Output(msg)) => {
            error!(cause = %msg, "could not produce output");
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

/// Why [`run`] could not finish.
#[derive(Debug)]
enum RunError {
    Analysis(AnalysisError),
    Output(String),
}

impl From<AnalysisError> for RunError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

/// Log the detailed cause and print the single user-facing message.
fn report_failure(e: &AnalysisError) -> ExitCode {
    error!(cause = %e, "analysis failed");
    eprintln!("{}", e.user_message());
    ExitCode::FAILURE
}

/// Analyze `buffer` `cli.runs` times and print the outcome of the first
/// run, plus a duration summary when there were several.
fn run(cli: &Cli, config: &AnalysisConfig, buffer: &PixelBuffer) -> Result<(), RunError> {
    let mut all_diagnostics = Vec::with_capacity(cli.runs);
    let mut first_result = None;

    for run in 0..cli.runs {
        let (result, diagnostics) =
            fruitscan_pipeline::diagnostics::analyze_with_diagnostics(buffer, config, &StdClock)?;
        debug!(
            run = run + 1,
            total_ms = duration_ms(diagnostics.total_duration),
            "run complete",
        );
        if first_result.is_none() {
            first_result = Some(result);
        }
        all_diagnostics.push(diagnostics);
    }

    let (Some(result), Some(diagnostics)) = (first_result, all_diagnostics.first()) else {
        return Ok(());
    };
    info!(fruit = %result.fruit.fruit, freshness = %result.freshness.category, "analysis complete");

    let output = Output {
        result: &result,
        record: cli.record.then(|| AnalysisRecord::from(&result)),
        info: cli.info.then(|| result.fruit.fruit.info()),
        diagnostics: cli.diagnostics.then_some(diagnostics),
    };

    let rendered = render_all(&output, cli.json, &all_diagnostics).map_err(RunError::Output)?;
    println!("{}", rendered.stdout);
    if let Some(side) = rendered.stderr {
        eprintln!("{side}");
    }

    Ok(())
}

/// Text for each output stream.
///
/// In JSON mode stdout carries exactly one JSON document; anything else
/// goes to stderr.
struct Rendered {
    stdout: String,
    stderr: Option<String>,
}

/// Render the report and, after several runs, the duration summary.
fn render_all(
    output: &Output<'_>,
    json: bool,
    all_diagnostics: &[AnalysisDiagnostics],
) -> Result<Rendered, String> {
    let summary = (all_diagnostics.len() > 1).then(|| multi_run_summary(all_diagnostics));
    if json {
        return Ok(Rendered {
            stdout: to_json(output)?,
            stderr: summary,
        });
    }

    let mut stdout = render(output);
    if let Some(summary) = summary {
        stdout.push_str("\n\n");
        stdout.push_str(&summary);
    }
    Ok(Rendered {
        stdout,
        stderr: None,
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Error serializing output: {e}"))
}

/// Format the output as a human-readable report.
fn render(output: &Output<'_>) -> String {
    let result = output.result;
    let mut text = String::new();

    let _ = writeln!(
        text,
        "Fruit:      {} ({}% confidence)",
        result.fruit.fruit.info().name,
        result.fruit.confidence,
    );
    let _ = writeln!(
        text,
        "Freshness:  {} (score {}/100, {}% confidence)",
        result.freshness.category, result.freshness.score, result.freshness.confidence,
    );
    let _ = write!(text, "            {}", result.freshness.explanation);

    if let Some(record) = output.record {
        let _ = write!(
            text,
            "\n\nRecord: fruit={} confidence={} freshnessScore={} freshnessConfidence={}",
            record.fruit, record.confidence, record.freshness_score, record.freshness_confidence,
        );
    }

    if let Some(info) = output.info {
        let _ = write!(
            text,
            "\n\n{}\n{}\n\nVarieties: {}\nTaste: {}\nStorage: {}\nRipeness: {}",
            info.name,
            info.description,
            info.varieties,
            info.taste,
            info.storage,
            info.ripeness_indicators,
        );
    }

    if let Some(diagnostics) = output.diagnostics {
        let _ = write!(text, "\n\n{}", diagnostics.report());
    }

    text
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&AnalysisDiagnostics) -> Duration;

/// Aggregated duration statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn multi_run_summary(all_diagnostics: &[AnalysisDiagnostics]) -> String {
    if all_diagnostics.is_empty() {
        return "Warning: no diagnostics to summarize".to_string();
    }

    let mut text = String::new();
    let _ = writeln!(
        text,
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| duration_ms(d.total_duration))
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    let _ = writeln!(
        text,
        "Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms\n",
    );
    let _ = writeln!(text, "{:<24} {:>12}", "Stage", "Mean (ms)");
    let _ = write!(text, "{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Downsample", |d| d.downsample.duration),
        ("Feature Extraction", |d| d.feature_extraction.duration),
        ("Classification", |d| d.classification.duration),
        ("Freshness", |d| d.freshness.duration),
    ];

    for (name, extractor) in stage_extractors {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| duration_ms(extractor(d)))
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        let _ = write!(text, "\n{name:<24} {stage_mean:>10.3}ms");
    }

    text
}

//! Default command: scan log files and print a report

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use acclog_core::config::AcclogConfig;
use acclog_core::pipeline::WriterSink;
use acclog_core::types::Field;
use acclog_log_pipeline::report::{self, format::rfc3339};
use acclog_log_pipeline::{
    ErrorPolicy, FileSource, LogPipelineError, PipelineConfig, PipelineConfigBuilder, Recognizer,
    ReportKind, ReportOptions, ReportTimeZone, ScanPipeline, ScanPipelineBuilder, ScanStats,
};

use crate::cli::{FilterArgs, ReportArgs};
use crate::error::CliError;
use crate::window;

/// What a finished report run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub stats: ScanStats,
    pub ticks: usize,
    pub lines: usize,
}

/// Execute the default report command.
///
/// Scanning and report generation are synchronous; they run on the blocking
/// pool and write straight to stdout.
pub async fn execute(args: ReportArgs, config: &AcclogConfig) -> Result<(), CliError> {
    let pipeline_config = effective_config(&args, config)?;
    let recognizer = build_recognizer(&args.filters)?;
    let (start, stop) = window::resolve(
        args.start.as_deref(),
        args.stop.as_deref(),
        pipeline_config.time_zone,
        Utc::now(),
    )?;

    info!(
        report = %args.report,
        category = %args.category,
        start = %rfc3339(start),
        stop = %rfc3339(stop),
        files = args.files.len(),
        "starting scan"
    );

    let sources = collect_sources(&args.files, pipeline_config.on_io_error)?;
    let scanner = ScanPipelineBuilder::new()
        .config(&pipeline_config)
        .recognizer(recognizer)
        .report_kind(args.report)
        .category(args.category)
        .window(start, stop)
        .keep_outside(args.keep_outside)
        .build()?;
    let options = report_options(&args, &pipeline_config, start, stop);
    let kind = args.report;

    let outcome = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let out = BufWriter::new(stdout.lock());
        run_report(scanner, &sources, kind, options, out)
    })
    .await
    .map_err(|e| CliError::Command(format!("report task failed: {e}")))??;

    info!(
        files = outcome.stats.files_scanned,
        failed = outcome.stats.files_failed,
        lines = outcome.stats.lines_scanned,
        matched = outcome.stats.lines_matched,
        parse_errors = outcome.stats.parse_errors,
        output_lines = outcome.lines,
        "report complete"
    );
    Ok(())
}

/// Scan every source and write the report to `out`.
pub fn run_report<W: Write>(
    mut scanner: ScanPipeline,
    sources: &[FileSource],
    kind: ReportKind,
    options: ReportOptions,
    out: W,
) -> Result<ReportOutcome, CliError> {
    let ticks = scanner.scan_files(sources)?;

    let mut sink = WriterSink::new(out);
    let lines = report::run(kind, options, &ticks, &mut sink)?;
    sink.into_inner()?;

    Ok(ReportOutcome {
        stats: scanner.stats(),
        ticks: ticks.len(),
        lines,
    })
}

/// Merge command-line overrides into the configured pipeline settings.
///
/// `--slot` sets the downtime slot width for downtime reports and the
/// summary slot width otherwise.
pub fn effective_config(
    args: &ReportArgs,
    config: &AcclogConfig,
) -> Result<PipelineConfig, CliError> {
    let mut builder = PipelineConfigBuilder::from_config(PipelineConfig::from_core(config)?);

    if args.skip_invalid {
        builder = builder.on_parse_error(ErrorPolicy::Skip);
    }
    if args.skip_unreadable {
        builder = builder.on_io_error(ErrorPolicy::Skip);
    }
    if let Some(secs) = args.slot {
        builder = match args.report {
            ReportKind::Downtime => builder.downtime_slot_secs(secs),
            _ => builder.slot_width_secs(secs),
        };
    }
    if let Some(limit) = args.limit {
        builder = builder.limit(limit);
    }
    if let Some(order) = args.order {
        builder = builder.order(order);
    }
    if let Some(sep) = &args.sep {
        builder = builder.field_sep(sep.clone());
    }
    if args.utc {
        builder = builder.time_zone(ReportTimeZone::Utc);
    }

    Ok(builder.build()?)
}

fn report_options(
    args: &ReportArgs,
    config: &PipelineConfig,
    start: i64,
    stop: i64,
) -> ReportOptions {
    ReportOptions {
        start,
        stop,
        terse: args.terse,
        keep_outside: args.keep_outside,
        ..config.report_options(args.report, args.category)
    }
}

/// Translate filter flags into recognizer conditions.
pub fn build_recognizer(filters: &FilterArgs) -> Result<Recognizer, CliError> {
    let mut recognizer = Recognizer::new();

    for ip in &filters.ips {
        recognizer.add_ip(ip);
    }
    for host in &filters.hosts {
        recognizer.add_value(Field::Host, host);
    }
    for method in &filters.methods {
        recognizer.add_value_nc(Field::Method, method);
    }
    for code in &filters.codes {
        recognizer.add_value(Field::Status, code);
    }
    for user in &filters.users {
        recognizer.add_value(Field::User, user);
    }
    for protocol in &filters.protocols {
        recognizer.add_value_nc(Field::Protocol, protocol);
    }

    let patterns = [
        (Field::Uri, &filters.uri_patterns),
        (Field::Agent, &filters.agent_patterns),
        (Field::Referer, &filters.referer_patterns),
    ];
    for (field, values) in patterns {
        for pattern in values {
            recognizer
                .add_pattern(field, pattern)
                .map_err(LogPipelineError::from)?;
        }
    }

    Ok(recognizer)
}

/// Detect compression and domain label for each file.
///
/// Files that cannot be opened are skipped with a warning under the skip
/// policy and abort the run otherwise.
pub fn collect_sources(
    files: &[PathBuf],
    policy: ErrorPolicy,
) -> Result<Vec<FileSource>, CliError> {
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        match FileSource::detect(path) {
            Ok(source) => sources.push(source),
            Err(e) if policy == ErrorPolicy::Skip => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(sources)
}

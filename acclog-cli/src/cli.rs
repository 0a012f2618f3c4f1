//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use acclog_log_pipeline::{Category, ReportKind, SortOrder};

/// acclog -- summarize Apache access logs by time slot.
///
/// Scans the given log files (plain or gzip), filters entries and prints a
/// summary, deny list, downtime or raw request report to stdout.
#[derive(Parser, Debug)]
#[command(
    name = "acclog",
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Path to the acclog.toml configuration file.
    #[arg(short, long, global = true, default_value = "acclog.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format for the `config` subcommands.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- report (default command) ----

/// Report options, time window and entry filters.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Log files to scan. Gzip files are detected automatically.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Report type (summary, deny, downtime, request).
    #[arg(short, long, default_value = "summary")]
    pub report: ReportKind,

    /// Category to aggregate on (ips, groups, sources, agents, uris, codes,
    /// referers, domains, methods, requests, protocols, users).
    #[arg(long, default_value = "ips")]
    pub category: Category,

    /// Maximum number of items per slot in verbose output.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Item order (title, count, bandwidth, peak, peak-bandwidth).
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Slot width in seconds (0 = one slot for the whole window).
    #[arg(long)]
    pub slot: Option<u64>,

    /// Machine-readable delimited output.
    #[arg(short, long)]
    pub terse: bool,

    /// Field separator for terse output.
    #[arg(long)]
    pub sep: Option<String>,

    /// Keep entries outside the window and report them as before/after totals.
    #[arg(long)]
    pub keep_outside: bool,

    /// Print and interpret times in UTC instead of local time.
    #[arg(long)]
    pub utc: bool,

    /// Window start (RFC 3339 or `YYYY-MM-DD[ HH:MM[:SS]]`). Default: 24h before stop.
    #[arg(long)]
    pub start: Option<String>,

    /// Window stop (RFC 3339 or `YYYY-MM-DD[ HH:MM[:SS]]`). Default: now.
    #[arg(long)]
    pub stop: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Skip lines that are not valid access log entries.
    #[arg(long)]
    pub skip_invalid: bool,

    /// Skip files that cannot be opened or read.
    #[arg(long)]
    pub skip_unreadable: bool,
}

/// Entry filters. Repeating a flag ORs its values; different flags are ANDed.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Client address or CIDR network (e.g. 174.202.255.0/24).
    #[arg(long = "ip", value_name = "CIDR|ADDR")]
    pub ips: Vec<String>,

    /// Exact client host name as logged.
    #[arg(long = "host")]
    pub hosts: Vec<String>,

    /// Request method, case-insensitive.
    #[arg(long = "method")]
    pub methods: Vec<String>,

    /// Response status code.
    #[arg(long = "code")]
    pub codes: Vec<String>,

    /// Authenticated user name.
    #[arg(long = "user")]
    pub users: Vec<String>,

    /// Request protocol, case-insensitive.
    #[arg(long = "protocol")]
    pub protocols: Vec<String>,

    /// Regular expression searched in the request URI.
    #[arg(long = "uri-pattern", value_name = "REGEX")]
    pub uri_patterns: Vec<String>,

    /// Regular expression searched in the user agent.
    #[arg(long = "agent-pattern", value_name = "REGEX")]
    pub agent_patterns: Vec<String>,

    /// Regular expression searched in the referer.
    #[arg(long = "referer-pattern", value_name = "REGEX")]
    pub referer_patterns: Vec<String>,
}

// ---- config ----

/// Manage acclog configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, report, scan).
        #[arg(long)]
        section: Option<String>,
    },
}

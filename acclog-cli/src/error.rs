//! CLI-specific error types and exit code mapping

use acclog_core::error::AccessLogError;
use acclog_log_pipeline::LogPipelineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Invalid command-line value (time window, filter pattern).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from acclog-core.
    #[error("{0}")]
    Core(#[from] AccessLogError),

    /// Scan or report failure from the log pipeline.
    #[error("{0}")]
    Pipeline(#[from] LogPipelineError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | General / command error               |
    /// | 2    | Configuration or argument error       |
    /// | 3    | Log line could not be parsed          |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Argument(_) => 2,
            Self::Io(_) => 10,
            Self::Core(e) => core_exit_code(e),
            Self::Pipeline(e) => match e {
                LogPipelineError::Parse { .. } => 3,
                LogPipelineError::Collector { .. } | LogPipelineError::Io(_) => 10,
                LogPipelineError::Config { .. } | LogPipelineError::Recognizer(_) => 2,
                LogPipelineError::Report(inner) => core_exit_code(inner),
                LogPipelineError::Range(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

fn core_exit_code(err: &AccessLogError) -> i32 {
    match err {
        AccessLogError::Config(_) | AccessLogError::Recognizer(_) => 2,
        AccessLogError::Parse(_) => 3,
        AccessLogError::Io(_) => 10,
        AccessLogError::Range(_) => 1,
    }
}

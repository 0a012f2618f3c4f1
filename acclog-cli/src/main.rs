use anyhow::Result;
use clap::Parser;

use acclog_cli::cli::{Cli, Commands};
use acclog_cli::commands;
use acclog_cli::error::CliError;
use acclog_cli::logging;
use acclog_cli::output::OutputWriter;
use acclog_core::config::AcclogConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 설정 파일이 없으면 기본값, 형식 오류는 report 실행 시점에 보고
    let loaded = AcclogConfig::load_or_default(&cli.config).await;
    let general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, cli.log_level.as_deref())?;

    tracing::debug!(config = %cli.config.display(), "acclog starting");

    let writer = OutputWriter::new(cli.output);
    let result = match cli.command {
        Some(Commands::Config(args)) => {
            commands::config::execute(args, &cli.config, &writer).await
        }
        None => match loaded {
            Ok(config) => commands::report::execute(cli.report, &config).await,
            Err(e) => Err(CliError::from(e)),
        },
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }

    Ok(())
}

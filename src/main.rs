use clap::Parser;

use howard_exporter::cli::Cli;
use howard_exporter::config::{StaticConfig, get_config, init_config};
use howard_exporter::errors::ExporterError;
use howard_exporter::runtime::run_server;
use howard_exporter::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    let config = cli.resolve_config().inspect_err(report_startup_error)?;
    init_config(config);
    let config = get_config();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config.logging).inspect_err(report_startup_error)?;

    run_server(config).await.inspect_err(|e| {
        tracing::error!("Exporter exited with error: {:#}", e);
    })
}

fn report_startup_error(err: &ExporterError) {
    eprintln!("{}", err.format_colored());
}

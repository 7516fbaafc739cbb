use clap::Parser;
use esbench::cli::Cli;
use esbench_report::viewer;
use std::process::ExitCode;
use tracing_subscriber::fmt::writer::MakeWriterExt;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        // The full-screen chart shares the terminal with stderr.
        .with_writer(std::io::stderr.with_filter(|_: &tracing::Metadata<'_>| !viewer::is_active()))
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: cannot start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(esbench::commands::execute(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {} failed: {err}", err.stage());
            ExitCode::from(err.exit_code())
        }
    }
}

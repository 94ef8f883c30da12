use clap::Parser;

use vellum_cms::config::{Args, Config};
use vellum_cms::process;
use vellum_cms::{http_server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args)?;

    // Guards must stay alive for the duration of the program.
    let _log_guards = process::init_logging(&config);
    process::register_panic_logger();
    process::report_build_info();

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("error creating server state: {}", e);
            std::process::exit(3);
        }
    };

    let (shutdown_handle, _shutdown_tx, shutdown_rx) = process::graceful_shutdown_blocker();

    http_server::run(&config, state, shutdown_rx).await?;

    shutdown_handle.abort();
    Ok(())
}

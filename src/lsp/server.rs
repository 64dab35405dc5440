//! LSP server initialization and lifecycle

use tower_lsp::{LspService, Server};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::checker::css::CssChecker;
use crate::config::{LOG_FILE_NAME, data_dir};
use crate::lsp::backend::Backend;

/// Run the language server over stdio until the client disconnects
pub async fn run_server(settings_section: String) -> anyhow::Result<()> {
    let _guard = init_logging();

    info!(
        "Starting {} v{} (settings section: {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        settings_section
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(|client| Backend::build(client, CssChecker::new(), &settings_section));
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}

/// Install the tracing subscriber.
///
/// Logs go to `<data_dir>/csslint-lsp.log` since stdout carries the protocol.
/// Falls back to stderr when the data directory cannot be created.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let data_dir = data_dir();

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        warn!("Failed to create data directory {:?}: {}", data_dir, e);
        return None;
    }

    let appender = tracing_appender::rolling::never(&data_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Some(guard)
}

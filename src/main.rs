use clap::Parser;

use csslint_lsp::config::DEFAULT_SETTINGS_SECTION;

#[derive(Parser)]
#[command(name = "csslint-lsp")]
#[command(version, about = "Language Server that reports CSS lint findings as diagnostics")]
struct Cli {
    /// Configuration section read from workspace/didChangeConfiguration
    #[arg(long, default_value = DEFAULT_SETTINGS_SECTION)]
    settings_section: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(csslint_lsp::lsp::server::run_server(cli.settings_section))
}

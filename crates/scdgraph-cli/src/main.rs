//! scdgraph CLI - Render single-case design graphs to PNG and SVG

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is set up by the app once the flags are known
    let mut app = cli::ScdgraphApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

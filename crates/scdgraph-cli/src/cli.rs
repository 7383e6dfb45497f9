//! Command-line interface for the scdgraph utility
//!
//! Renders JSON graph documents to PNG and SVG files, writes the static A-B
//! example, validates documents and prints a starter template.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use scdgraph::core::logging::init_logging;
use scdgraph::graph::example::{render_example_svg, write_example, EXAMPLE_FILE_NAME};
use scdgraph::graph::{export_with, ExportArtifact, Pipeline};
use scdgraph::{ExportFormat, ExportOptions, Graph, GraphDocument};

/// scdgraph - Single-case design graphs as PNG and SVG
#[derive(Parser)]
#[command(name = "scdgraph")]
#[command(about = "Render A-B and multiple-baseline single-case design graphs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error) [env: SCDGRAPH_LOG_LEVEL, RUST_LOG; default: info]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json) [env: SCDGRAPH_LOG_FORMAT; default: compact]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a graph document to image files
    Render {
        /// Graph document in JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the files are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Which image formats to write
        #[arg(long, value_enum, default_value_t = FormatChoice::Both)]
        format: FormatChoice,

        /// Skip the standalone legend files
        #[arg(long)]
        no_legend_files: bool,
    },

    /// Write the static A-B example graph as SVG
    Example {
        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a graph document without writing any files
    Validate {
        /// Graph document in JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print a starter graph document
    Template {
        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Image formats to export
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    Png,
    Svg,
    #[default]
    Both,
}

impl FormatChoice {
    pub fn formats(&self) -> Vec<ExportFormat> {
        match self {
            FormatChoice::Png => vec![ExportFormat::Png],
            FormatChoice::Svg => vec![ExportFormat::Svg],
            FormatChoice::Both => ExportFormat::ALL.to_vec(),
        }
    }
}

/// Main CLI application
pub struct ScdgraphApp {
    pipeline: Pipeline,
}

impl ScdgraphApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Flags win; without them the library falls back to the environment
        let log_level = cli.log_level.map(|level| level.as_str());
        let log_format = cli.log_format.map(|format| format.as_str());
        if let Err(e) = init_logging(log_level, log_format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("scdgraph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                out_dir,
                format,
                no_legend_files,
            } => {
                let options = ExportOptions {
                    formats: format.formats(),
                    legend_files: !no_legend_files,
                };
                self.render_command(input, &out_dir, &options, cli.verbose)
                    .map(|_| ())
            }
            Commands::Example { output } => self.example_command(output, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Template { output } => self.template_command(output),
        }
    }

    /// Handle the render command; returns the written paths
    pub fn render_command(
        &self,
        input: Option<PathBuf>,
        out_dir: &Path,
        options: &ExportOptions,
        verbose: bool,
    ) -> Result<Vec<PathBuf>> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let graph = Self::load_graph(&content)?;
        report_diagnostics(&graph);

        let artifacts = export_with(&self.pipeline, &graph, options)?;
        let written = write_artifacts(out_dir, &artifacts)?;
        for path in &written {
            println!("{}", path.display());
        }
        info!(files = written.len(), out_dir = %out_dir.display(), "Render finished");
        Ok(written)
    }

    /// Handle the example command
    fn example_command(&self, output: Option<PathBuf>, verbose: bool) -> Result<()> {
        if output.as_deref() == Some(Path::new("-")) {
            let svg = render_example_svg()?;
            return self.write_output(None, &svg);
        }

        let path = output.unwrap_or_else(|| PathBuf::from(EXAMPLE_FILE_NAME));
        write_example(&path)
            .with_context(|| format!("Failed to write example '{}'", path.display()))?;
        if verbose {
            eprintln!("Saved: {}", path.display());
        }
        println!("{}", path.display());
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let graph = match Self::load_graph(&content) {
            Ok(graph) => graph,
            Err(e) => {
                println!("✗ Invalid graph document: {}", e);
                return Err(e);
            }
        };

        let rendered = self.pipeline.run(&graph)?;
        for (phase, placement) in graph.phases().iter().zip(&rendered.layout.phases) {
            if placement.is_empty() {
                println!("  {}: no data", phase.title);
            } else {
                println!(
                    "  {}: sessions {}-{}",
                    phase.title,
                    placement.start_x,
                    placement.start_x + placement.length - 1
                );
            }
        }
        for boundary in &rendered.layout.boundaries {
            println!("  phase change at x = {}", boundary.x);
        }

        if graph.diagnostics().is_empty() {
            println!("✓ Valid graph document");
            Ok(())
        } else {
            for diagnostic in graph.diagnostics() {
                println!("✗ {}", diagnostic);
            }
            Err(anyhow!(
                "{} series entr{} rejected",
                graph.diagnostics().len(),
                if graph.diagnostics().len() == 1 { "y" } else { "ies" }
            ))
        }
    }

    /// Handle the template command
    fn template_command(&self, output: Option<PathBuf>) -> Result<()> {
        let json = GraphDocument::template().to_json_pretty()?;
        self.write_output(output, &json)
    }

    fn load_graph(content: &str) -> Result<Graph> {
        let document = GraphDocument::from_json(content)?;
        Ok(document.into_graph()?)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ScdgraphApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Print series problems; the graph is still rendered without those series
fn report_diagnostics(graph: &Graph) {
    for diagnostic in graph.diagnostics() {
        warn!(field = %diagnostic.field, "{}", diagnostic.message);
        eprintln!("Warning: {}", diagnostic);
    }
}

/// Write every artifact into `out_dir`, creating it if needed
pub fn write_artifacts(out_dir: &Path, artifacts: &[ExportArtifact]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", out_dir.display()))?;
    artifacts
        .iter()
        .map(|artifact| {
            let path = out_dir.join(&artifact.file_name);
            fs::write(&path, &artifact.bytes)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            Ok(path)
        })
        .collect()
}

//! Gateway fallback configuration tool.
//!
//! # Architecture Overview
//!
//! ```text
//!   last good doc ──┐
//!                   ├─▶ graph::builder ─▶ ConfigGraph ─┐
//!   current doc ────┘                                  │
//!                                                      ▼
//!   rejected entities ──────────────────▶ fallback::reconstructor
//!                                                      │
//!                                                      ▼
//!                              graph::flatten ─▶ corrected document
//!                                     │
//!                                     └─▶ graph::dot (diagnostics)
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use gateway_fallback::config::{load_or_default, FallbackConfig};
use gateway_fallback::declarative::loader::{
    load_document, render_document, write_document, DocumentFormat,
};
use gateway_fallback::fallback::{load_rejections, FallbackGenerator, FlatEntityError};
use gateway_fallback::graph::{build_config_graph, connected_components, render_graph_dot};
use gateway_fallback::observability::init_logging;

#[derive(Parser)]
#[command(name = "gateway-fallback")]
#[command(about = "Build fallback gateway configurations from rejected entities", long_about = None)]
struct Cli {
    /// Tool configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Excise rejected entities and recover them from the last known good document
    Generate {
        #[arg(long)]
        last_good: PathBuf,

        #[arg(long)]
        current: PathBuf,

        /// JSON array of {"type": ..., "name": ...}
        #[arg(long)]
        rejected: Option<PathBuf>,

        /// Rejected entity as type:name, may be repeated
        #[arg(long = "reject")]
        reject: Vec<FlatEntityError>,

        /// Write the corrected document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only remove rejected subgraphs
        #[arg(long)]
        no_recover: bool,
    },
    /// Print the connected components of a document
    Components {
        #[arg(long)]
        document: PathBuf,
    },
    /// Render a document's graph as Graphviz DOT
    Render {
        #[arg(long)]
        document: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: FallbackConfig = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability)?;

    tracing::debug!(
        enabled = config.fallback.enabled,
        recover = config.fallback.recover_from_last_good,
        dump_graphs = config.diagnostics.dump_graphs,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Generate {
            last_good,
            current,
            rejected,
            reject,
            output,
            no_recover,
        } => {
            let mut rejections = match rejected {
                Some(path) => load_rejections(&path)?,
                None => Vec::new(),
            };
            rejections.extend(reject);

            let mut settings = config.fallback.clone();
            if no_recover {
                settings.recover_from_last_good = false;
            }

            let generator = FallbackGenerator::new(settings, config.diagnostics.clone());
            let outcome = generator.generate(
                &load_document(&last_good)?,
                &load_document(&current)?,
                &rejections,
            )?;

            if let Some(path) = &outcome.summary.dump_path {
                tracing::info!(path = %path.display(), "Fallback graph written");
            }
            emit(&outcome.document, output.as_deref())?;
        }
        Commands::Components { document } => {
            let graph = build_config_graph(&load_document(&document)?)?;
            for (i, component) in connected_components(&graph)?.iter().enumerate() {
                let keys: Vec<String> = component.keys().map(|k| k.to_string()).collect();
                println!("{}: {}", i, keys.join(", "));
            }
        }
        Commands::Render { document, output } => {
            let graph = build_config_graph(&load_document(&document)?)?;
            let path = render_graph_dot(&graph, output.as_deref())?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn emit(
    document: &gateway_fallback::declarative::Content,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            write_document(path, document)?;
            tracing::info!(path = %path.display(), "Fallback document written");
        }
        None => println!("{}", render_document(document, DocumentFormat::Json)?),
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use pf_fluids::FluidContext;
use pf_network::{
    Boundary, HydraulicModels, Network, NetworkError, Node, Segment, propagate_pressure,
    recalculate_segment, validate_network,
};

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PipeFlow CLI - steady-state piping network hydraulics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate network file syntax and structure
    Validate {
        /// Path to the network YAML file
        network_path: PathBuf,
    },
    /// Recalculate one segment and print its derived results
    Segment {
        /// Path to the network YAML file
        network_path: PathBuf,
        /// Segment ID to recalculate
        segment_id: String,
    },
    /// Propagate pressure from a source node through the network
    Propagate {
        /// Path to the network YAML file
        network_path: PathBuf,
        /// Node ID to start from
        start_node: String,
        /// Write the updated network YAML here (defaults to stdout summary only)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("{0}")]
    NotFound(String),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Segment {
            network_path,
            segment_id,
        } => cmd_segment(&network_path, &segment_id),
        Commands::Propagate {
            network_path,
            start_node,
            output,
        } => cmd_propagate(&network_path, &start_node, output.as_deref()),
    }
}

fn load_network(path: &Path) -> CliResult<Network> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

fn cmd_validate(network_path: &Path) -> CliResult<()> {
    println!("Validating network: {}", network_path.display());
    let network = load_network(network_path)?;
    validate_network(&network)?;
    println!(
        "✓ Network is valid ({} nodes, {} segments)",
        network.nodes.len(),
        network.segments.len()
    );
    Ok(())
}

fn cmd_segment(network_path: &Path, segment_id: &str) -> CliResult<()> {
    let network = load_network(network_path)?;
    validate_network(&network)?;

    let segment = network
        .segment(segment_id)
        .ok_or_else(|| CliError::NotFound(format!("segment '{segment_id}' not found")))?;
    let inlet = network
        .node(segment.inlet_node())
        .ok_or_else(|| CliError::NotFound(format!("node '{}' not found", segment.inlet_node())))?;

    let recalculated = recalculate_segment(
        &with_inlet_boundary(segment, inlet),
        fluid_context(inlet, segment).as_ref(),
        &HydraulicModels::default(),
    );

    match &recalculated.results {
        Some(results) => {
            println!("Segment '{segment_id}':");
            print!("{}", serde_yaml::to_string(results)?);
            if let Some(summary) = &recalculated.summary {
                println!("summary:");
                print!("{}", serde_yaml::to_string(summary)?);
            }
        }
        None => println!("Segment '{segment_id}': insufficient data, no results"),
    }
    Ok(())
}

fn cmd_propagate(network_path: &Path, start_node: &str, output: Option<&Path>) -> CliResult<()> {
    let network = load_network(network_path)?;
    validate_network(&network)?;

    println!("Propagating from node: {start_node}");
    let outcome = propagate_pressure(&network, start_node, &HydraulicModels::default())?;

    for warning in &outcome.warnings {
        println!("  warning: {warning}");
    }

    println!("Node pressures:");
    for node in &outcome.nodes {
        match node.pressure {
            Some(p) => println!("  {:<20} {:>14.1} Pa", node.display_name(), p.si()),
            None => println!("  {:<20} {:>14}", node.display_name(), "undefined"),
        }
    }

    if let Some(path) = output {
        let updated = Network {
            nodes: outcome.nodes,
            segments: outcome.segments,
        };
        std::fs::write(path, serde_yaml::to_string(&updated)?)?;
        println!("✓ Updated network written to {}", path.display());
    }
    Ok(())
}

/// Seed the segment boundary with the inlet node's state, as the
/// propagation engine would before recalculating.
fn with_inlet_boundary(segment: &Segment, inlet: &Node) -> Segment {
    let mut seg = segment.clone();
    seg.boundary = Boundary {
        pressure: inlet.pressure,
        temperature: inlet.temperature,
    };
    seg
}

fn fluid_context(inlet: &Node, segment: &Segment) -> Option<FluidContext> {
    match (inlet.fluid, segment.mass_flow) {
        (Some(fluid), Some(mdot)) => Some(FluidContext::new(fluid, mdot)),
        _ => None,
    }
}

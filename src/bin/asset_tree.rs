//! Asset Tree Command Line Interface
//!
//! Builds and filters the asset hierarchy from locally stored feed payloads.
//!
//! # Usage
//!
//! ```bash
//! # Print the full tree
//! asset_tree tree --locations locations.json --assets assets.json
//!
//! # Only critical energy sensors matching "motor", as JSON
//! asset_tree tree -l locations.json -a assets.json \
//!     --search motor --sensor energy --critical --format json
//!
//! # Build diagnostics (roots, cycles, duplicate ids)
//! asset_tree report -l locations.json -a assets.json
//!
//! # API endpoints for a company
//! asset_tree endpoints company-001
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use asset_tree::tree::{NodeDescription, Tone};
use asset_tree::{
    apply_tree_filters, describe_node, load_snapshot, AppConfig, Asset, AssetFilterState,
    Location, SensorType, TreeBuilder, TreeNode,
};

#[derive(Parser)]
#[command(name = "asset_tree")]
#[command(version = "0.1.0")]
#[command(about = "Build and filter location/asset/sensor hierarchies")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(clap::Args)]
struct FeedArgs {
    /// Locations payload (JSON array)
    #[arg(short, long)]
    locations: PathBuf,

    /// Assets payload (JSON array)
    #[arg(short, long)]
    assets: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the tree and print it, optionally filtered
    Tree {
        #[command(flatten)]
        feeds: FeedArgs,

        /// Case- and accent-insensitive search over names and sensor metadata
        #[arg(short, long)]
        search: Option<String>,

        /// Keep only components of this sensor type: energy, vibration (repeatable)
        #[arg(long, value_parser = parse_sensor_type)]
        sensor: Vec<SensorType>,

        /// Keep only components in alert
        #[arg(long)]
        critical: bool,
    },

    /// Print build diagnostics
    Report {
        #[command(flatten)]
        feeds: FeedArgs,
    },

    /// Print the API endpoints for a company
    Endpoints {
        /// Company id
        company_id: String,
    },
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tree {
            feeds,
            search,
            sensor,
            critical,
        } => cmd_tree(&feeds, search, sensor, critical, cli.format),
        Commands::Report { feeds } => cmd_report(&feeds, cli.format),
        Commands::Endpoints { company_id } => cmd_endpoints(&company_id, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_tree(
    feeds: &FeedArgs,
    search: Option<String>,
    sensors: Vec<SensorType>,
    critical: bool,
    format: OutputFormat,
) -> Result<()> {
    let (locations, assets) = read_feeds(feeds)?;
    let forest = TreeBuilder::new().build(&locations, &assets);

    let mut filters =
        AssetFilterState::search(search.unwrap_or_default()).with_critical_only(critical);
    for sensor in sensors {
        filters = filters.with_sensor_type(sensor);
    }
    let visible = apply_tree_filters(&forest, &filters);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&*visible)?);
        }
        OutputFormat::Pretty => {
            if visible.is_empty() {
                println!("{}", "No matching nodes".dimmed());
            }
            for root in visible.iter() {
                print_node(root, 0);
            }
        }
    }

    Ok(())
}

fn cmd_report(feeds: &FeedArgs, format: OutputFormat) -> Result<()> {
    let (locations, assets) = read_feeds(feeds)?;
    let (forest, report) = TreeBuilder::new().build_with_report(&locations, &assets);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "roots": forest.len(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            println!("{}", "Build report".bold());
            println!("  Locations:        {}", report.location_count);
            println!("  Assets:           {}", report.asset_count);
            println!("  Components:       {}", report.component_count);
            println!("  Roots:            {}", forest.len());
            println!("  Location roots:   {}", report.location_roots);
            println!("  Absorbed roots:   {}", report.absorbed_roots);

            if report.is_clean() {
                println!("  {}", "clean".green());
            }
            if !report.broken_cycles.is_empty() {
                println!(
                    "  {} {}",
                    "Broken cycles:".yellow(),
                    report.broken_cycles.join(", ")
                );
            }
            if !report.duplicate_ids.is_empty() {
                println!(
                    "  {} {}",
                    "Duplicate ids:".yellow(),
                    report.duplicate_ids.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn cmd_endpoints(company_id: &str, format: OutputFormat) -> Result<()> {
    let config = AppConfig::from_env().context("Failed to read configuration")?;
    let locations = config.locations_url(company_id)?;
    let assets = config.assets_url(company_id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "companies": config.companies_url().as_str(),
                "locations": locations.as_str(),
                "assets": assets.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            println!("{} {}", "companies".cyan(), config.companies_url());
            println!("{} {}", "locations".cyan(), locations);
            println!("{} {}", "assets   ".cyan(), assets);
        }
    }

    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn read_feeds(feeds: &FeedArgs) -> Result<(Vec<Location>, Vec<Asset>)> {
    load_snapshot(&feeds.locations, &feeds.assets).with_context(|| {
        format!(
            "Loading feeds {} and {}",
            feeds.locations.display(),
            feeds.assets.display()
        )
    })
}

fn parse_sensor_type(value: &str) -> std::result::Result<SensorType, String> {
    SensorType::parse(value).ok_or_else(|| {
        let known: Vec<&str> = SensorType::ALL.iter().map(SensorType::as_str).collect();
        format!("unknown sensor type '{}' (expected one of: {})", value, known.join(", "))
    })
}

fn print_node(node: &TreeNode, depth: usize) {
    let description = describe_node(node);
    println!(
        "{}{} {}{}",
        "  ".repeat(depth),
        node.name.bold(),
        format!("[{}]", description.kind_label).dimmed(),
        render_tags(&description)
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn render_tags(description: &NodeDescription) -> String {
    let mut out = String::new();
    for tag in description.tags.iter().chain(description.status.iter()) {
        let label = match tag.tone {
            Tone::Critical => tag.label.red().bold(),
            Tone::Warning => tag.label.yellow(),
            Tone::Positive => tag.label.green(),
            Tone::Info => tag.label.cyan(),
            Tone::Neutral => tag.label.normal(),
        };
        out.push_str(&format!(" {}", label));
    }
    out
}

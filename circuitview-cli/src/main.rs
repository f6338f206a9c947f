//! CircuitView CLI - inspect, format and export analog netlist graphs from the command line.

use anyhow::{bail, Context, Result};
use circuitview::{
    format_param, CircuitView, Config, DetailPolicy, HttpBackend, NetlistBackend, NodeDetail,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "circuitview")]
#[command(about = "Analog circuit netlist graph viewer and exporter", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file and environment)
    #[arg(long, global = true, value_name = "URL")]
    backend_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a saved payload and print its graph
    Show {
        /// Path to a payload .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the detail view of one node
    Node {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Node id
        #[arg(value_name = "ID")]
        id: String,

        /// Show rows hidden by the display policy
        #[arg(long)]
        show_all: bool,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Format a single parameter value
    Format {
        /// Parameter key, e.g. r, c, l, nfin
        key: String,
        /// Raw value, e.g. 1500, 2.5e-12, 45n
        value: String,
    },

    /// Write the verbatim JSON export of a saved payload
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory to write into
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Upload a .scs netlist to the backend
    Upload {
        /// Path to a .scs netlist
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file with performance specs sent alongside the netlist
        #[arg(long, value_name = "FILE")]
        perf_specs: Option<PathBuf>,

        /// Save the returned payload's export into this directory
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Check that the backend is reachable
    Health,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show { ref file, ref format } => handle_show(file, format),
        Commands::Node {
            ref file,
            ref id,
            show_all,
            ref format,
        } => {
            let policy = if show_all {
                DetailPolicy::show_all()
            } else {
                load_config(&cli)?.detail_policy()
            };
            handle_node(file, id, &policy, format)
        }
        Commands::Format { ref key, ref value } => {
            println!("{}", format_param(key, value.as_str()));
            Ok(())
        }
        Commands::Export { ref file, ref out_dir } => handle_export(file, out_dir),
        Commands::Upload {
            ref file,
            ref perf_specs,
            ref out_dir,
            ref format,
        } => {
            let config = load_config(&cli)?;
            handle_upload(&config, file, perf_specs.as_deref(), out_dir.as_deref(), format)
        }
        Commands::Health => handle_health(&load_config(&cli)?),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    Ok(match &cli.backend_url {
        Some(url) => config.with_backend_url(url.clone()),
        None => config,
    })
}

fn open(file: &Path) -> Result<CircuitView> {
    CircuitView::open(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn handle_show(file: &Path, format: &OutputFormat) -> Result<()> {
    let view = open(file)?;
    match format {
        OutputFormat::Human => output_view_human(&view, &file.display().to_string()),
        OutputFormat::Json => print_json(&view_json(&view, &file.display().to_string()))?,
    }
    Ok(())
}

fn handle_node(file: &Path, id: &str, policy: &DetailPolicy, format: &OutputFormat) -> Result<()> {
    let view = open(file)?;
    let Some(detail) = view.detail(id, policy) else {
        bail!("No node `{}` in {}", id, file.display());
    };
    match format {
        OutputFormat::Human => output_detail_human(&detail),
        OutputFormat::Json => print_json(&serde_json::to_value(&detail)?)?,
    }
    Ok(())
}

fn handle_export(file: &Path, out_dir: &Path) -> Result<()> {
    let view = open(file)?;
    let path = view
        .export_to(out_dir)
        .with_context(|| format!("Failed to export into {}", out_dir.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn handle_upload(
    config: &Config,
    file: &Path,
    perf_specs: Option<&Path>,
    out_dir: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let specs: Option<Value> = match perf_specs {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid perf specs JSON in {}", path.display()))?,
            )
        }
        None => None,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let view = runtime
        .block_on(circuitview::upload_netlist(config, file, specs))
        .with_context(|| format!("Upload of {} failed", file.display()))?;

    let source = file.display().to_string();
    match format {
        OutputFormat::Human => output_view_human(&view, &source),
        OutputFormat::Json => print_json(&view_json(&view, &source))?,
    }

    if let Some(dir) = out_dir {
        let path = view
            .export_to(dir)
            .with_context(|| format!("Failed to export into {}", dir.display()))?;
        eprintln!("Saved {}", path.display());
    }
    Ok(())
}

fn handle_health(config: &Config) -> Result<()> {
    let backend = HttpBackend::new(config)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let healthy = runtime
        .block_on(backend.health())
        .with_context(|| format!("Backend at {} is unreachable", backend.base_url()))?;

    if !healthy {
        bail!("Backend at {} reported unhealthy", backend.base_url());
    }
    println!("Backend at {} is healthy", backend.base_url());
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn view_json(view: &CircuitView, source: &str) -> Value {
    serde_json::json!({
        "file": source,
        "shape": view.payload.shape().as_str(),
        "graph": view.graph,
        "styles": view.styles.iter().map(|(id, style)| {
            serde_json::json!({ "id": id, "style": style })
        }).collect::<Vec<_>>(),
        "stats": view.stats,
        "summary": view.summary,
    })
}

fn output_view_human(view: &CircuitView, source: &str) {
    println!("\nFile: {}", source);
    println!("Shape: {}", view.payload.shape());
    println!("{}", "─".repeat(60));

    println!("\n  Nodes:");
    for (node, (_, style)) in view.graph.nodes().iter().zip(&view.styles) {
        println!(
            "    {:<12} {:<9} {:<12} {}",
            node.id,
            node.group,
            node.node_type.as_deref().unwrap_or("-"),
            style.color
        );
    }

    println!("\n  Links:");
    for link in view.graph.links() {
        match &link.label {
            Some(pin) => println!("    {} -> {} ({})", link.source, link.target, pin),
            None => println!("    {} -> {}", link.source, link.target),
        }
    }

    let summary = &view.summary;
    if !summary.is_empty() {
        println!("\n  Specs:");
        if let Some(name) = &summary.filename {
            println!("    Netlist:     {}", name);
        }
        if let Some(t) = summary.temperature_c {
            println!("    Temperature: {} °C", t);
        }
        if let Some(n) = summary.fet_count {
            println!("    FETs:        {}", n);
        }
        for row in &summary.perf_specs {
            println!("    {:<12} {}", format!("{}:", row.key), row.display);
        }
    }

    println!("\n  Summary:");
    println!("    Components: {}", view.stats.component_count);
    println!("    Nets:       {}", view.stats.net_count);
    println!("    Links:      {}", view.stats.link_count);
    println!("    Islands:    {}", view.stats.island_count);
    if !view.stats.isolated_nodes.is_empty() {
        println!("    Isolated:   {}", view.stats.isolated_nodes.join(", "));
    }
}

fn output_detail_human(detail: &NodeDetail) {
    println!(
        "{} ({}{})",
        detail.label,
        detail.group,
        detail.node_type.as_deref().map(|t| format!(", {}", t)).unwrap_or_default()
    );

    if !detail.parameters.is_empty() {
        println!("\n  Parameters:");
        for row in &detail.parameters {
            println!("    {:<8} {}", row.key, row.display);
        }
    }

    if !detail.connections.is_empty() {
        println!("\n  Connections:");
        for c in &detail.connections {
            let pin = match (&c.pin, c.pin_role) {
                (Some(pin), Some(role)) => format!(" via {} ({})", pin, role),
                (Some(pin), None) => format!(" via {}", pin),
                _ => String::new(),
            };
            println!("    {}{}", c.peer, pin);
        }
    }

    if !detail.listed_components.is_empty() {
        println!("\n  Listed components: {}", detail.listed_components.join(", "));
    }
}

//! Inspect example: load a saved payload and print every node with its style and parameters.

use circuitview::prelude::*;
use std::path::Path;

fn main() -> Result<(), CircuitViewError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/flat_circuit.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example inspect_payload [path/to/payload.json]");
        std::process::exit(1);
    }

    let view = circuitview::load_payload(path)?;
    let policy = DetailPolicy::default();

    println!("{} payload: {}", view.payload.shape(), path.display());
    println!(
        "{} components, {} nets, {} links, {} island(s)",
        view.stats.component_count, view.stats.net_count, view.stats.link_count, view.stats.island_count
    );
    println!();

    for (id, style) in &view.styles {
        let Some(detail) = view.detail(id, &policy) else {
            continue;
        };
        println!(
            "{} [{}{}] {} r={}",
            detail.id,
            detail.group,
            detail.node_type.as_deref().map(|t| format!(" {}", t)).unwrap_or_default(),
            style.color,
            style.radius
        );
        for row in &detail.parameters {
            println!("    {:<8} {}", row.key, row.display);
        }
    }

    if !view.summary.perf_specs.is_empty() {
        println!();
        println!("Performance:");
        for row in &view.summary.perf_specs {
            println!("    {:<8} {}", row.key, row.display);
        }
    }

    Ok(())
}

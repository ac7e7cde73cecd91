//! Demo that prints a split table for a request file, or for the built-in two-room sample.
//!
//! Usage: `split_demo [request.json]`

use std::path::PathBuf;

use anyhow::Context;
use fair_rent_splitter::room::sample_rooms;
use fair_rent_splitter::{rebalance, SplitRequest, WeightField, WeightVector};

fn load_request(path: Option<PathBuf>) -> anyhow::Result<SplitRequest> {
    match path {
        Some(p) => {
            let data = std::fs::read_to_string(&p)
                .with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&data).with_context(|| format!("parsing {}", p.display()))
        }
        None => Ok(SplitRequest::new(1000.0, sample_rooms(), WeightVector::default())),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let req = load_request(std::env::args().nth(1).map(PathBuf::from))?;
    let summary = req.calculate()?;
    println!(
        "Weights: size {}%, features {}%, comfort {}%",
        req.weights.size, req.weights.features, req.weights.comfort
    );
    print!("{}", summary.format_table());

    // Show how the split moves when size is made the only thing that matters.
    let size_only = rebalance(req.weights, WeightField::Size, 100);
    let alt = SplitRequest {
        weights: size_only,
        ..req
    }
    .calculate()?;
    println!("\nSize only:");
    print!("{}", alt.format_table());

    Ok(())
}

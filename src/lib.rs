// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod allocation;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rebalance;
pub mod room;
pub mod share;
pub mod stats;
pub mod suggest;
pub mod weights;

// ---- Re-exports for stable public API ----
pub use crate::allocation::{allocate, allocate_checked, CalculationResult, SplitRequest, SplitSummary};
pub use crate::api::router;
pub use crate::error::SplitError;
pub use crate::rebalance::rebalance;
pub use crate::room::{Amenities, CustomFeature, Room};
pub use crate::weights::{WeightField, WeightVector};

use tracing::info;

/// Build the full in-process app: API routes plus `/metrics`.
///
/// Config comes from `$RENT_SPLIT_CONFIG_PATH`, `config/app.toml`, or defaults.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = config::AppConfig::load_default()?;
    let state = api::AppState::from_config(cfg)?;
    let metrics = metrics::Metrics::init()?;
    info!(target: "api", provider = state.suggester.provider_name(), "router built");
    Ok(api::router(state).merge(metrics.router()))
}

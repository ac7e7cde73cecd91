// src/allocation/mod.rs
//! # Allocation Engine
//! Pure logic that maps `(total rent, rooms, weights)` → one `CalculationResult` per
//! room, same order as the input. No I/O.
//!
//! Each room's combined score (see [`scoring`]) is normalized against the sum over
//! all rooms; rent and percentage are that ratio applied to the total and to 100.
//! A zero score total falls back to an equal split. That happens with all-zero
//! weights, and also when every nonzero weight lands on a dimension where all rooms
//! score 0 (e.g. features-only weights over rooms without any features).

pub mod scoring;
pub mod summary;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SplitError;
use crate::room::Room;
use crate::weights::WeightVector;

pub use scoring::{score_rooms, ScoreBreakdown};
pub use summary::{currency_symbol, SplitSummary};

/// One room's share of the rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub room_name: String,
    pub rent: f64,
    /// Share of the total in `[0, 100]`.
    pub percentage: f64,
    /// Combined weighted score before normalization; 0 on the equal-split fallback.
    pub raw_score: f64,
}

/// Everything the client holds for one calculation. Also the share-link payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    pub total_rent: f64,
    /// Display label only; no conversion is ever applied.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub weights: WeightVector,
}

pub(crate) fn default_currency() -> String {
    "USD".to_string()
}

impl SplitRequest {
    pub fn new(total_rent: f64, rooms: Vec<Room>, weights: WeightVector) -> Self {
        Self {
            total_rent,
            currency: default_currency(),
            rooms,
            weights,
        }
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    /// Validate, allocate and wrap the results with totals for display.
    pub fn calculate(&self) -> Result<SplitSummary, SplitError> {
        if self.rooms.is_empty() {
            return Err(SplitError::NoRooms);
        }
        let results = allocate_checked(self.total_rent, &self.rooms, &self.weights)?;
        Ok(SplitSummary::new(self.total_rent, &self.currency, results))
    }
}

/// Split `total_rent` across `rooms`. Assumes validated input; see [`allocate_checked`].
pub fn allocate(total_rent: f64, rooms: &[Room], weights: &WeightVector) -> Vec<CalculationResult> {
    if rooms.is_empty() {
        return Vec::new();
    }

    let scores = score_rooms(rooms, weights);
    let total_score: f64 = scores.iter().map(|s| s.combined).sum();

    if total_score == 0.0 {
        debug!(target: "allocation", rooms = rooms.len(), "score total is zero; equal split");
        let count = rooms.len() as f64;
        return rooms
            .iter()
            .map(|room| CalculationResult {
                room_name: room.name.clone(),
                rent: total_rent / count,
                percentage: 100.0 / count,
                raw_score: 0.0,
            })
            .collect();
    }

    rooms
        .iter()
        .zip(scores)
        .map(|(room, s)| {
            let ratio = s.combined / total_score;
            CalculationResult {
                room_name: room.name.clone(),
                rent: total_rent * ratio,
                percentage: 100.0 * ratio,
                raw_score: s.combined,
            }
        })
        .collect()
}

/// [`allocate`] behind input validation: rent, every room, and the weight vector.
pub fn allocate_checked(
    total_rent: f64,
    rooms: &[Room],
    weights: &WeightVector,
) -> Result<Vec<CalculationResult>, SplitError> {
    if !total_rent.is_finite() || total_rent < 0.0 {
        return Err(SplitError::InvalidRent(format!(
            "total rent must be a non-negative number, got {total_rent}"
        )));
    }
    for (i, room) in rooms.iter().enumerate() {
        room.validate(i)?;
    }
    weights.validate()?;
    Ok(allocate(total_rent, rooms, weights))
}

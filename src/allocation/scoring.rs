//! Per-room sub-scores.
//!
//! - `size_score`    : share of total floor area (uniform when total area is 0)
//! - `feature_score` : feature points relative to the best-equipped room in the batch
//! - `comfort_score` : (inverted noise + light) / 10
//!
//! Combined score = size*w.size + features*w.features + comfort*w.comfort.

use serde::Serialize;

use crate::room::{Room, SCALE_MAX};
use crate::weights::WeightVector;

/// Fixed maximum of inverted noise (5) plus natural light (5).
const COMFORT_MAX: f64 = 10.0;

/// Sub-scores and combined score of a single room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub size_score: f64,
    pub feature_score: f64,
    pub comfort_score: f64,
    pub combined: f64,
}

/// Amenity count plus `importance / 5` for every custom feature.
pub fn feature_points(room: &Room) -> f64 {
    let custom: f64 = room
        .custom_features
        .iter()
        .map(|f| f64::from(f.importance) / f64::from(SCALE_MAX))
        .sum();
    room.amenities.count() as f64 + custom
}

/// Quietness and brightness on a 0.2..=1.0 scale. Noise is flipped so higher is better.
pub fn comfort_score(room: &Room) -> f64 {
    let inverted_noise = 6.0 - f64::from(room.noise_level);
    (inverted_noise + f64::from(room.natural_light)) / COMFORT_MAX
}

/// Score every room against the batch it belongs to. Output order follows input.
pub fn score_rooms(rooms: &[Room], weights: &WeightVector) -> Vec<ScoreBreakdown> {
    if rooms.is_empty() {
        return Vec::new();
    }

    let count = rooms.len() as f64;
    let total_size: f64 = rooms.iter().map(|r| r.size).sum();
    let points: Vec<f64> = rooms.iter().map(feature_points).collect();
    // Floor of 1 keeps the ratio defined when nobody has any feature.
    let max_points = points.iter().copied().fold(1.0_f64, f64::max);

    if total_size <= 0.0 {
        tracing::debug!(target: "allocation", rooms = rooms.len(), "total size is zero; uniform size score");
    }

    rooms
        .iter()
        .zip(points)
        .map(|(room, pts)| {
            let size_score = if total_size > 0.0 {
                room.size / total_size
            } else {
                1.0 / count
            };
            let feature_score = pts / max_points;
            let comfort_score = comfort_score(room);
            let combined = size_score * f64::from(weights.size)
                + feature_score * f64::from(weights.features)
                + comfort_score * f64::from(weights.comfort);
            ScoreBreakdown {
                size_score,
                feature_score,
                comfort_score,
                combined,
            }
        })
        .collect()
}

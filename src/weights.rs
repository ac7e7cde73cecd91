//! Weight vector: three integer percentages (size / features / comfort).
//!
//! JSON shape:
//! {
//!   "size": 40,
//!   "features": 30,
//!   "comfort": 30
//! }
//!
//! Anything handed to the allocation engine must sum to exactly 100.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SplitError;

pub const WEIGHT_TOTAL: u32 = 100;

/// One of the three scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightField {
    Size,
    Features,
    Comfort,
}

impl WeightField {
    /// Canonical order; also the tie-break order of the rebalancer.
    pub const ALL: [WeightField; 3] = [WeightField::Size, WeightField::Features, WeightField::Comfort];

    /// The two fields that are not `self`, in canonical order.
    pub fn others(self) -> [WeightField; 2] {
        match self {
            WeightField::Size => [WeightField::Features, WeightField::Comfort],
            WeightField::Features => [WeightField::Size, WeightField::Comfort],
            WeightField::Comfort => [WeightField::Size, WeightField::Features],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightField::Size => "size",
            WeightField::Features => "features",
            WeightField::Comfort => "comfort",
        }
    }
}

impl fmt::Display for WeightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightVector {
    pub size: u32,
    pub features: u32,
    pub comfort: u32,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            size: 40,
            features: 30,
            comfort: 30,
        }
    }
}

impl WeightVector {
    pub const fn new(size: u32, features: u32, comfort: u32) -> Self {
        Self {
            size,
            features,
            comfort,
        }
    }

    pub fn get(&self, field: WeightField) -> u32 {
        match field {
            WeightField::Size => self.size,
            WeightField::Features => self.features,
            WeightField::Comfort => self.comfort,
        }
    }

    pub fn set(&mut self, field: WeightField, value: u32) {
        match field {
            WeightField::Size => self.size = value,
            WeightField::Features => self.features = value,
            WeightField::Comfort => self.comfort = value,
        }
    }

    pub fn total(&self) -> u32 {
        self.size + self.features + self.comfort
    }

    /// Every component within 0..=100 and the three summing to 100.
    pub fn validate(&self) -> Result<(), SplitError> {
        for field in WeightField::ALL {
            let v = self.get(field);
            if v > WEIGHT_TOTAL {
                return Err(SplitError::InvalidWeights(format!(
                    "{field} weight must be 0-100, got {v}"
                )));
            }
        }
        let total = self.total();
        if total != WEIGHT_TOTAL {
            return Err(SplitError::InvalidWeights(format!(
                "weights must sum to 100, got {total}"
            )));
        }
        Ok(())
    }

    /// Build from signed parts (AI output, config), rejecting negatives and bad sums.
    pub fn try_from_parts(size: i64, features: i64, comfort: i64) -> Result<Self, SplitError> {
        let conv = |field: WeightField, v: i64| {
            u32::try_from(v).map_err(|_| {
                SplitError::InvalidWeights(format!("{field} weight must be 0-100, got {v}"))
            })
        };
        let w = Self::new(
            conv(WeightField::Size, size)?,
            conv(WeightField::Features, features)?,
            conv(WeightField::Comfort, comfort)?,
        );
        w.validate()?;
        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let w = WeightVector::default();
        assert_eq!(w.total(), 100);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn others_excludes_self_in_canonical_order() {
        assert_eq!(
            WeightField::Features.others(),
            [WeightField::Size, WeightField::Comfort]
        );
        for f in WeightField::ALL {
            assert!(!f.others().contains(&f));
        }
    }

    #[test]
    fn validate_rejects_bad_sums_and_ranges() {
        assert!(WeightVector::new(50, 50, 1).validate().is_err());
        assert!(WeightVector::new(0, 0, 0).validate().is_err());
        assert!(WeightVector::new(101, 0, 0).validate().is_err());
        assert!(WeightVector::new(0, 0, 100).validate().is_ok());
    }

    #[test]
    fn try_from_parts_rejects_negatives() {
        assert!(WeightVector::try_from_parts(-10, 60, 50).is_err());
        assert_eq!(
            WeightVector::try_from_parts(50, 30, 20).unwrap(),
            WeightVector::new(50, 30, 20)
        );
    }

    #[test]
    fn field_serializes_lowercase() {
        let s = serde_json::to_string(&WeightField::Comfort).unwrap();
        assert_eq!(s, "\"comfort\"");
    }
}

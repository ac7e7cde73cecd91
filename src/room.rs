//! room.rs: the room model the client form owns and the engine only reads.
//!
//! JSON shape follows the browser form: camelCase keys, amenities flattened
//! into `hasPrivateBathroom`, `hasCloset`, `hasBalcony`, `hasAirConditioning`.

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// Lowest/highest value on the 1–5 scales (noise, light, feature importance).
pub const SCALE_MIN: u8 = 1;
pub const SCALE_MAX: u8 = 5;

/// Boolean amenities counted as one feature point each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    #[serde(default)]
    pub has_private_bathroom: bool,
    #[serde(default)]
    pub has_closet: bool,
    #[serde(default)]
    pub has_balcony: bool,
    #[serde(default)]
    pub has_air_conditioning: bool,
}

impl Amenities {
    /// Number of amenities present (0..=4).
    pub fn count(&self) -> usize {
        [
            self.has_private_bathroom,
            self.has_closet,
            self.has_balcony,
            self.has_air_conditioning,
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }
}

/// A user-defined feature such as "walk-in wardrobe", weighted 1–5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub importance: u8,
}

impl CustomFeature {
    pub fn new(name: impl Into<String>, importance: u8) -> Self {
        Self {
            id: None,
            name: name.into(),
            importance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    /// Floor area; unit is whatever the group uses, only ratios matter.
    pub size: f64,
    #[serde(flatten)]
    pub amenities: Amenities,
    /// 1 = quiet, 5 = noisy.
    pub noise_level: u8,
    /// 1 = dark, 5 = bright.
    pub natural_light: u8,
    #[serde(default)]
    pub custom_features: Vec<CustomFeature>,
}

impl Room {
    /// New room with the form defaults: size 100, no amenities, mid noise and light.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            size: 100.0,
            amenities: Amenities::default(),
            noise_level: 3,
            natural_light: 3,
            custom_features: Vec::new(),
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn amenities(mut self, amenities: Amenities) -> Self {
        self.amenities = amenities;
        self
    }

    pub fn private_bathroom(mut self, yes: bool) -> Self {
        self.amenities.has_private_bathroom = yes;
        self
    }

    pub fn noise(mut self, level: u8) -> Self {
        self.noise_level = level;
        self
    }

    pub fn light(mut self, level: u8) -> Self {
        self.natural_light = level;
        self
    }

    pub fn with_feature(mut self, feature: CustomFeature) -> Self {
        self.custom_features.push(feature);
        self
    }

    /// Check the ranges the scoring formulas assume. `index` is only used for the error.
    pub fn validate(&self, index: usize) -> Result<(), SplitError> {
        if self.name.trim().is_empty() {
            return Err(SplitError::room(index, "room name is required"));
        }
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(SplitError::room(
                index,
                format!("size must be a non-negative number, got {}", self.size),
            ));
        }
        if !in_scale(self.noise_level) {
            return Err(SplitError::room(
                index,
                format!("noise level must be 1-5, got {}", self.noise_level),
            ));
        }
        if !in_scale(self.natural_light) {
            return Err(SplitError::room(
                index,
                format!("natural light must be 1-5, got {}", self.natural_light),
            ));
        }
        for f in &self.custom_features {
            if f.name.trim().is_empty() {
                return Err(SplitError::room(index, "feature name is required"));
            }
            if !in_scale(f.importance) {
                return Err(SplitError::room(
                    index,
                    format!(
                        "importance of '{}' must be 1-5, got {}",
                        f.name, f.importance
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn in_scale(v: u8) -> bool {
    (SCALE_MIN..=SCALE_MAX).contains(&v)
}

/// The two-room sample the form starts with.
pub fn sample_rooms() -> Vec<Room> {
    vec![
        Room::new("Master Bedroom")
            .size(150.0)
            .amenities(Amenities {
                has_private_bathroom: true,
                has_closet: true,
                has_balcony: false,
                has_air_conditioning: true,
            })
            .noise(2)
            .light(5),
        Room::new("Small Bedroom")
            .size(100.0)
            .amenities(Amenities {
                has_private_bathroom: false,
                has_closet: true,
                has_balcony: false,
                has_air_conditioning: true,
            })
            .noise(3)
            .light(3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_room_uses_form_defaults() {
        let r = Room::new("Room 3");
        assert_eq!(r.size, 100.0);
        assert_eq!(r.noise_level, 3);
        assert_eq!(r.natural_light, 3);
        assert_eq!(r.amenities.count(), 0);
        assert!(!r.id.is_empty());
        assert!(r.validate(0).is_ok());
    }

    #[test]
    fn json_shape_matches_client_form() {
        let r = Room::new("A").private_bathroom(true);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["hasPrivateBathroom"], json!(true));
        assert_eq!(v["hasCloset"], json!(false));
        assert_eq!(v["noiseLevel"], json!(3));
        assert_eq!(v["naturalLight"], json!(3));
        assert!(v["customFeatures"].is_array());
        assert!(v.get("amenities").is_none(), "amenities must be flattened");
    }

    #[test]
    fn missing_amenity_keys_default_to_false() {
        let v = json!({
            "id": "x", "name": "Den", "size": 80,
            "noiseLevel": 2, "naturalLight": 4
        });
        let r: Room = serde_json::from_value(v).unwrap();
        assert_eq!(r.amenities, Amenities::default());
        assert!(r.custom_features.is_empty());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad_size = Room::new("A").size(-1.0);
        assert!(matches!(
            bad_size.validate(4),
            Err(SplitError::InvalidRoom { index: 4, .. })
        ));
        assert!(Room::new("A").size(f64::NAN).validate(0).is_err());
        assert!(Room::new("A").noise(0).validate(0).is_err());
        assert!(Room::new("A").light(6).validate(0).is_err());
        assert!(Room::new("  ").validate(0).is_err());
        assert!(Room::new("A")
            .with_feature(CustomFeature::new("desk", 9))
            .validate(0)
            .is_err());
        assert!(Room::new("A")
            .with_feature(CustomFeature::new("", 3))
            .validate(0)
            .is_err());
    }

    #[test]
    fn amenity_count() {
        let a = Amenities {
            has_private_bathroom: true,
            has_closet: false,
            has_balcony: true,
            has_air_conditioning: true,
        };
        assert_eq!(a.count(), 3);
    }
}

//! Domain errors for the splitter.
//!
//! The pure core (`allocate`, `rebalance`) never fails; these errors come from the
//! checked entry points that validate caller input before handing it to the core,
//! and from the share-link codec.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// A room failed validation. `index` is its position in the input list.
    #[error("invalid room #{index}: {reason}")]
    InvalidRoom { index: usize, reason: String },

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("invalid rent: {0}")]
    InvalidRent(String),

    #[error("at least one room is required")]
    NoRooms,

    #[error("malformed share link: {0}")]
    MalformedShareLink(String),
}

impl SplitError {
    /// Stable machine-readable kind, used as the `error` field of API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            SplitError::InvalidRoom { .. } => "invalid_room",
            SplitError::InvalidWeights(_) => "invalid_weights",
            SplitError::InvalidRent(_) => "invalid_rent",
            SplitError::NoRooms => "no_rooms",
            SplitError::MalformedShareLink(_) => "malformed_share_link",
        }
    }

    pub(crate) fn room(index: usize, reason: impl Into<String>) -> Self {
        SplitError::InvalidRoom {
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_room_index() {
        let e = SplitError::room(2, "size must be non-negative");
        assert_eq!(e.to_string(), "invalid room #2: size must be non-negative");
        assert_eq!(e.kind(), "invalid_room");
    }
}

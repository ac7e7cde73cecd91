//! Share links: a whole `SplitRequest` packed into one URL-safe token.
//!
//! Nothing is stored server-side; the token *is* the state. Encoding is JSON then
//! base64 (URL-safe alphabet, no padding). Decoding also accepts the standard
//! alphabet with padding, which is what browser `btoa` produces.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

use crate::allocation::SplitRequest;
use crate::error::SplitError;

/// Default cap on accepted token length (bytes).
pub const DEFAULT_MAX_TOKEN_LEN: usize = 64 * 1024;

/// Contract: `decode(encode(x)) == x`, or an error. Never a partial structure.
pub trait ShareCodec: Send + Sync {
    fn encode(&self, request: &SplitRequest) -> Result<String, SplitError>;
    fn decode(&self, token: &str) -> Result<SplitRequest, SplitError>;
}

#[derive(Debug, Clone)]
pub struct Base64JsonCodec {
    max_token_len: usize,
}

impl Default for Base64JsonCodec {
    fn default() -> Self {
        Self {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl Base64JsonCodec {
    pub fn with_max_len(max_token_len: usize) -> Self {
        Self { max_token_len }
    }
}

impl ShareCodec for Base64JsonCodec {
    fn encode(&self, request: &SplitRequest) -> Result<String, SplitError> {
        if !has_rent(request) {
            return Err(SplitError::InvalidRent(format!(
                "total rent must be positive to share, got {}",
                request.total_rent
            )));
        }
        if request.rooms.is_empty() {
            return Err(SplitError::NoRooms);
        }
        // JSON has no encoding for NaN or infinity.
        if let Some(i) = request.rooms.iter().position(|r| !r.size.is_finite()) {
            return Err(SplitError::room(i, "size must be a finite number"));
        }
        let json = serde_json::to_vec(request)
            .map_err(|e| SplitError::MalformedShareLink(format!("serialize: {e}")))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(&self, token: &str) -> Result<SplitRequest, SplitError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SplitError::MalformedShareLink("empty token".into()));
        }
        if token.len() > self.max_token_len {
            return Err(SplitError::MalformedShareLink(format!(
                "token too long ({} > {} bytes)",
                token.len(),
                self.max_token_len
            )));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .or_else(|_| STANDARD.decode(token))
            .map_err(|e| SplitError::MalformedShareLink(format!("not base64: {e}")))?;
        let request: SplitRequest = serde_json::from_slice(&bytes)
            .map_err(|e| SplitError::MalformedShareLink(format!("bad payload: {e}")))?;

        // Same presence checks the browser does before loading shared data.
        if !has_rent(&request) {
            return Err(SplitError::MalformedShareLink("missing total rent".into()));
        }
        if request.rooms.is_empty() {
            return Err(SplitError::MalformedShareLink("no rooms".into()));
        }
        Ok(request)
    }
}

/// A token is only loadable with a positive rent; `encode` refuses what `decode` would.
fn has_rent(request: &SplitRequest) -> bool {
    request.total_rent.is_finite() && request.total_rent > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::sample_rooms;
    use crate::weights::WeightVector;

    fn sample() -> SplitRequest {
        SplitRequest::new(1000.0, sample_rooms(), WeightVector::new(50, 25, 25)).currency("EUR")
    }

    #[test]
    fn round_trips_non_round_floats_bit_for_bit() {
        let codec = Base64JsonCodec::default();
        let mut req = sample();
        req.total_rent = 1167.4535862028517;
        req.rooms[0].size = 0.1 + 0.2;
        let back = codec.decode(&codec.encode(&req).unwrap()).unwrap();
        assert_eq!(back.total_rent.to_bits(), req.total_rent.to_bits());
        assert_eq!(back.rooms[0].size.to_bits(), req.rooms[0].size.to_bits());
    }

    #[test]
    fn round_trips_exactly() {
        let codec = Base64JsonCodec::default();
        let req = sample();
        let token = codec.encode(&req).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(codec.decode(&token).unwrap(), req);
    }

    #[test]
    fn accepts_standard_alphabet_tokens() {
        let codec = Base64JsonCodec::default();
        let req = sample();
        let token = STANDARD.encode(serde_json::to_vec(&req).unwrap());
        assert_eq!(codec.decode(&token).unwrap(), req);
    }

    #[test]
    fn rejects_garbage_and_oversized() {
        let codec = Base64JsonCodec::with_max_len(16);
        assert!(codec.decode("").is_err());
        assert!(codec.decode("!!!not-base64!!!").is_err());
        let long = "a".repeat(17);
        assert!(matches!(
            codec.decode(&long),
            Err(SplitError::MalformedShareLink(_))
        ));
    }

    #[test]
    fn refuses_to_encode_what_it_cannot_decode() {
        let codec = Base64JsonCodec::default();
        let no_rooms = SplitRequest::new(900.0, Vec::new(), WeightVector::default());
        assert_eq!(codec.encode(&no_rooms), Err(SplitError::NoRooms));

        let zero_rent = SplitRequest::new(0.0, sample_rooms(), WeightVector::default());
        assert!(matches!(
            codec.encode(&zero_rent),
            Err(SplitError::InvalidRent(_))
        ));
    }

    #[test]
    fn rejects_payload_without_rent_or_rooms() {
        let codec = Base64JsonCodec::default();
        let no_rooms = SplitRequest::new(900.0, Vec::new(), WeightVector::default());
        let token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&no_rooms).unwrap());
        assert!(codec.decode(&token).is_err());

        let zero_rent = SplitRequest::new(0.0, sample_rooms(), WeightVector::default());
        let token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&zero_rent).unwrap());
        assert!(codec.decode(&token).is_err());

        let not_a_request = URL_SAFE_NO_PAD.encode(br#"{"hello":"world"}"#);
        assert!(codec.decode(&not_a_request).is_err());
    }
}

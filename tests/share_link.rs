// tests/share_link.rs
use fair_rent_splitter::room::sample_rooms;
use fair_rent_splitter::share::{Base64JsonCodec, ShareCodec};
use fair_rent_splitter::{CustomFeature, SplitError, SplitRequest, WeightVector};

#[test]
fn token_round_trips_custom_features_and_currency() {
    let mut rooms = sample_rooms();
    rooms[1] = rooms[1].clone().with_feature(CustomFeature::new("bay window", 4));
    let req = SplitRequest::new(2450.0, rooms, WeightVector::new(20, 45, 35)).currency("CHF");

    let codec = Base64JsonCodec::default();
    let token = codec.encode(&req).expect("encode");
    let back = codec.decode(&token).expect("decode");
    assert_eq!(back, req);

    // The decoded request is immediately usable.
    let summary = back.calculate().expect("calculate");
    assert_eq!(summary.currency_symbol, "Fr");
    assert!((summary.allocated - 2450.0).abs() < 1e-6);
}

#[test]
fn browser_style_token_loads() {
    use base64::Engine as _;
    let raw = serde_json::json!({
        "totalRent": 800,
        "currency": "USD",
        "rooms": [{
            "id": "x1", "name": "Attic", "size": 90,
            "hasPrivateBathroom": false, "hasCloset": true,
            "hasBalcony": false, "hasAirConditioning": false,
            "noiseLevel": 1, "naturalLight": 2,
            "customFeatures": [{"id": "c1", "name": "skylight", "importance": 3}]
        }],
        "weights": {"size": 40, "features": 30, "comfort": 30}
    });
    let token = base64::engine::general_purpose::STANDARD.encode(raw.to_string());
    let req = Base64JsonCodec::default().decode(&token).expect("decode btoa token");
    assert_eq!(req.rooms[0].custom_features[0].id.as_deref(), Some("c1"));
    assert_eq!(req.total_rent, 800.0);
}

#[test]
fn truncated_token_is_rejected() {
    let codec = Base64JsonCodec::default();
    let req = SplitRequest::new(1000.0, sample_rooms(), WeightVector::default());
    let token = codec.encode(&req).unwrap();
    let cut = &token[..token.len() / 2];
    assert!(matches!(
        codec.decode(cut),
        Err(SplitError::MalformedShareLink(_))
    ));
}

mod float_fidelity {
    use super::*;
    use fair_rent_splitter::Room;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn arbitrary_rents_and_sizes_round_trip_exactly(
            rent in (f64::MIN_POSITIVE..1.0e9f64),
            sizes in proptest::collection::vec(0.0f64..1.0e6, 1..6),
        ) {
            let rooms: Vec<Room> = sizes
                .iter()
                .enumerate()
                .map(|(i, &s)| Room::new(format!("room {i}")).size(s))
                .collect();
            let req = SplitRequest::new(rent, rooms, WeightVector::default());

            let codec = Base64JsonCodec::default();
            let back = codec.decode(&codec.encode(&req).unwrap()).unwrap();

            prop_assert_eq!(back.total_rent.to_bits(), rent.to_bits());
            for (a, b) in back.rooms.iter().zip(&req.rooms) {
                prop_assert_eq!(a.size.to_bits(), b.size.to_bits());
            }
            prop_assert_eq!(back, req);
        }
    }
}

#[test]
fn non_finite_room_size_cannot_be_shared() {
    let mut rooms = sample_rooms();
    rooms[1].size = f64::NAN;
    let req = SplitRequest::new(1000.0, rooms, WeightVector::default());
    assert!(matches!(
        Base64JsonCodec::default().encode(&req),
        Err(SplitError::InvalidRoom { index: 1, .. })
    ));
}

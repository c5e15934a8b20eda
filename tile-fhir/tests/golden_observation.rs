use std::fs;

use serde_json::Value;
use tile_core::{DisplayValue, TileConfig};
use tile_fhir::{render_bundle_str, render_observation_str};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn observation_tile_matches_golden() {
    let resource = fs::read_to_string(fixture_path("heart_rate_observation.json"))
        .expect("Không đọc được observation mẫu");

    let tile =
        render_observation_str(&resource, &TileConfig::default()).expect("Không dựng được tile");

    let actual = serde_json::to_value(tile).expect("Không serialize tile");

    let expected = fs::read_to_string(fixture_path("heart_rate_tile.json"))
        .expect("Không đọc được golden tile");
    let expected_value: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected_value);
}

#[test]
fn bundle_renders_observation_entries_in_order_skipping_unreadable_ones() {
    let bundle = fs::read_to_string(fixture_path("vitals_bundle.json"))
        .expect("Không đọc được bundle mẫu");

    let tiles = render_bundle_str(&bundle, &TileConfig::default()).expect("Không dựng được tile");

    let ids: Vec<_> = tiles.iter().map(|tile| tile.id.as_deref()).collect();
    assert_eq!(
        ids,
        vec![Some("heart-rate-1"), Some("smoking-1"), Some("note-1")]
    );

    assert_eq!(tiles[0].header.as_deref(), Some("Heart Rate: 72 (bpm)"));
    assert_eq!(
        tiles[1].header.as_deref(),
        Some("Tobacco smoking status: Former smoker")
    );
    assert_eq!(
        tiles[2].header.as_deref(),
        Some("Triage note: Patient alert and oriented")
    );

    let issue_date = tiles[1].row("Issue Date").expect("Thiếu dòng Issue Date");
    assert_eq!(issue_date.value, DisplayValue::from("unknown"));

    for tile in &tiles {
        assert_eq!(tile.attributes.len(), 7);
    }
}

use serde_json::json;
use tile_core::{header_text, DisplayValue, ObservationTile, TileConfig};

#[test]
fn display_renders_each_variant() {
    assert_eq!(DisplayValue::Absent.to_string(), "");
    assert_eq!(DisplayValue::from("final").to_string(), "final");
    assert_eq!(DisplayValue::Number(72.0).to_string(), "72");
    assert_eq!(DisplayValue::Number(36.6).to_string(), "36.6");
    assert_eq!(DisplayValue::Raw(json!("free text")).to_string(), "free text");
    assert_eq!(DisplayValue::Raw(json!(true)).to_string(), "true");
    assert_eq!(
        DisplayValue::Raw(json!({ "start": "2020-01-01" })).to_string(),
        r#"{"start":"2020-01-01"}"#
    );
}

#[test]
fn blank_values() {
    assert!(DisplayValue::Absent.is_blank());
    assert!(DisplayValue::from("").is_blank());
    assert!(DisplayValue::Raw(json!(null)).is_blank());
    assert!(DisplayValue::Raw(json!("")).is_blank());
    assert!(DisplayValue::Number(0.0).is_blank());
    assert!(DisplayValue::Raw(json!(0)).is_blank());
    assert!(DisplayValue::Raw(json!(false)).is_blank());

    assert!(!DisplayValue::Number(0.5).is_blank());
    assert!(!DisplayValue::Raw(json!(true)).is_blank());
    assert!(!DisplayValue::Raw(json!([])).is_blank());
    assert!(!DisplayValue::from("Heart Rate").is_blank());
}

#[test]
fn header_requires_both_parts() {
    let code = DisplayValue::from("Heart Rate");
    let value = DisplayValue::from("72 (bpm)");

    assert_eq!(
        header_text(&code, &value).as_deref(),
        Some("Heart Rate: 72 (bpm)")
    );
    assert_eq!(header_text(&DisplayValue::from(""), &value), None);
    assert_eq!(header_text(&code, &DisplayValue::Absent), None);
    assert_eq!(header_text(&code, &DisplayValue::Number(0.0)), None);
    assert_eq!(
        header_text(&code, &DisplayValue::Number(80.0)).as_deref(),
        Some("Heart Rate: 80")
    );
}

#[test]
fn display_value_serializes_untagged() {
    let tile = ObservationTile {
        id: None,
        header: None,
        attributes: vec![
            tile_core::AttributeRow::new("Status", DisplayValue::Absent),
            tile_core::AttributeRow::new("Value", DisplayValue::Number(72.5)),
            tile_core::AttributeRow::new("Code", DisplayValue::from("Heart Rate")),
        ],
    };

    let value = serde_json::to_value(&tile).expect("Không serialize tile");
    assert_eq!(
        value,
        json!({
            "id": null,
            "header": null,
            "attributes": [
                { "label": "Status", "value": null },
                { "label": "Value", "value": 72.5 },
                { "label": "Code", "value": "Heart Rate" }
            ]
        })
    );

    let back: ObservationTile = serde_json::from_value(value).expect("Không đọc lại được tile");
    assert_eq!(back, tile);
}

#[test]
fn config_fills_missing_fields_from_default() {
    let config: TileConfig =
        serde_json::from_value(json!({ "display_offset_minutes": 60 })).expect("Config lỗi");

    assert_eq!(config.display_offset_minutes, 60);
    assert_eq!(config.unknown_issued_label, "unknown");
}

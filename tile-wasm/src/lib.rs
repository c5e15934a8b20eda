//! Bridge WASM <-> JavaScript trung lập framework.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use tile_core::{TileConfig, TileError};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsTileConfig {
    #[serde(default)]
    display_offset_minutes: Option<i32>,
    #[serde(default)]
    unknown_issued_label: Option<String>,
}

impl From<JsTileConfig> for TileConfig {
    fn from(cfg: JsTileConfig) -> Self {
        let mut base = TileConfig::default();
        if let Some(minutes) = cfg.display_offset_minutes {
            base.display_offset_minutes = minutes;
        }
        if let Some(label) = cfg.unknown_issued_label {
            base.unknown_issued_label = label;
        }
        base
    }
}

/// Dựng tile cho một Observation FHIR (object JS đã parse).
#[wasm_bindgen]
pub fn render_observation(
    resource: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let resource_value = from_value::<serde_json::Value>(resource)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON Observation: {err}")))?;
    let cfg = read_config(config)?;

    let tile = tile_fhir::render_observation_value(&resource_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_tile_error(err)))?;

    to_plain_js(&tile)
}

/// Dựng tile cho mọi Observation trong một Bundle FHIR.
#[wasm_bindgen]
pub fn render_bundle(bundle: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let bundle_value = from_value::<serde_json::Value>(bundle)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON bundle: {err}")))?;
    let cfg = read_config(config)?;

    let tiles = tile_fhir::render_bundle_value(&bundle_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_tile_error(err)))?;

    to_plain_js(&tiles)
}

fn read_config(config: Option<JsValue>) -> Result<TileConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsTileConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(TileConfig::from(cfg))
        }
        _ => Ok(TileConfig::default()),
    }
}

// Object JSON gốc (performer, value[x]) phải thành object JS thường, không phải `Map`.
fn to_plain_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Không serialize tile: {err}")))
}

fn format_tile_error(err: TileError) -> String {
    format!("Tile error: {err}")
}

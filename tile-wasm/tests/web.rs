#![cfg(target_arch = "wasm32")]

use serde::Serialize;
use serde_json::json;
use serde_wasm_bindgen::Serializer;
use tile_wasm::{render_bundle, render_observation};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::wasm_bindgen_test;

fn js_object(value: &serde_json::Value) -> JsValue {
    value
        .serialize(&Serializer::json_compatible())
        .expect("Không tạo được object JS")
}

fn stringify(value: &JsValue) -> String {
    js_sys::JSON::stringify(value)
        .expect("Không stringify được")
        .as_string()
        .unwrap_or_default()
}

#[wasm_bindgen_test]
fn raw_objects_reach_js_as_plain_objects() {
    let resource = js_object(&json!({
        "resourceType": "Observation",
        "code": { "text": "Shift" },
        "performer": [{ "reference": "Practitioner/1", "display": "Dr. Adam Careful" }],
        "valuePeriod": { "start": "2020-01-01", "end": "2020-01-02" }
    }));

    let tile = render_observation(resource, None).expect("Không dựng được tile");
    let text = stringify(&tile);

    assert!(text.contains(r#""reference":"Practitioner/1""#), "{text}");
    assert!(text.contains(r#""start":"2020-01-01""#), "{text}");

    let attributes = js_sys::Reflect::get(&tile, &JsValue::from_str("attributes"))
        .expect("Thiếu attributes");
    let performer_row = js_sys::Reflect::get(&attributes, &JsValue::from_f64(4.0))
        .expect("Thiếu dòng Performer");
    let performer = js_sys::Reflect::get(&performer_row, &JsValue::from_str("value"))
        .expect("Thiếu giá trị Performer");
    let first = js_sys::Reflect::get(&performer, &JsValue::from_f64(0.0))
        .expect("Thiếu phần tử performer");
    assert!(!first.is_instance_of::<js_sys::Map>());
}

#[wasm_bindgen_test]
fn bundle_output_is_plain_data() {
    let bundle = js_object(&json!({
        "resourceType": "Bundle",
        "entry": [{
            "resource": {
                "resourceType": "Observation",
                "id": "note-1",
                "valueCodeableConcept": { "text": "Positive" },
                "performer": [{ "display": "Lab" }]
            }
        }]
    }));

    let tiles = render_bundle(bundle, None).expect("Không dựng được tile");
    let text = stringify(&tiles);

    assert!(text.contains(r#""id":"note-1""#), "{text}");
    assert!(text.contains(r#""display":"Lab""#), "{text}");
}

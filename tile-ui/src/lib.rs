//! Thành phần giao diện tile Observation cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use serde_wasm_bindgen::from_value;
    use tile_core::{AttributeRow, ObservationTile};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Window};
    use yew::prelude::*;

    #[derive(Properties, PartialEq)]
    pub struct ObservationTileProps {
        pub tile: ObservationTile,
    }

    #[function_component(ObservationTileView)]
    fn observation_tile_view(props: &ObservationTileProps) -> Html {
        let tile = &props.tile;

        html! {
            <div class="tile observation">
                { tile.header.as_deref().map(render_header).unwrap_or_default() }
                { render_attributes(&tile.attributes) }
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct ObservationTileListProps {
        pub tiles: Vec<ObservationTile>,
    }

    #[function_component(ObservationTileList)]
    fn observation_tile_list(props: &ObservationTileListProps) -> Html {
        html! {
            <div class="tile-list">
                {
                    for props.tiles.iter().cloned().map(|tile| html! {
                        <ObservationTileView {tile} />
                    })
                }
            </div>
        }
    }

    fn render_header(text: &str) -> Html {
        html! { <h2>{ text.to_string() }</h2> }
    }

    // Bảng luôn được hiển thị, kể cả khi mọi giá trị đều trống.
    fn render_attributes(rows: &[AttributeRow]) -> Html {
        html! {
            <table>
                <tbody>
                    { for rows.iter().map(render_row) }
                </tbody>
            </table>
        }
    }

    fn render_row(row: &AttributeRow) -> Html {
        html! {
            <tr key={row.label.clone()}>
                <td class="field-name">{ row.label.clone() }</td>
                <td class="field-val">{ row.value.to_string() }</td>
            </tr>
        }
    }

    fn find_target(selector: &str) -> Result<Element, JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))
    }

    #[wasm_bindgen]
    pub fn mount_observation_tile(selector: &str, tile: JsValue) -> Result<(), JsValue> {
        let target = find_target(selector)?;
        let tile: ObservationTile = from_value(tile)?;

        yew::Renderer::<ObservationTileView>::with_root_and_props(
            target,
            ObservationTileProps { tile },
        )
        .render();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn mount_observation_tiles(selector: &str, tiles: JsValue) -> Result<(), JsValue> {
        let target = find_target(selector)?;
        let tiles: Vec<ObservationTile> = from_value(tiles)?;

        yew::Renderer::<ObservationTileList>::with_root_and_props(
            target,
            ObservationTileListProps { tiles },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_observation_tile, mount_observation_tiles};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_observation_tile(
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(unsupported_target())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_observation_tiles(
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(unsupported_target())
}

#[cfg(not(target_arch = "wasm32"))]
fn unsupported_target() -> wasm_bindgen::JsValue {
    wasm_bindgen::JsValue::from_str("tile-ui chỉ hỗ trợ biên dịch target wasm32")
}

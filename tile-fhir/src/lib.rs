//! FHIR Observation to `ObservationTile` converter.

mod model;

pub use model::{CodeableConcept, Coding, Observation, ObservationValue, Quantity, Reference};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Deserialize;
use serde_json::Value;
use tile_core::{header_text, AttributeRow, DisplayValue, ObservationTile, TileConfig, TileError};
use tracing::{debug, warn};

/// Render a tile from an Observation JSON string.
pub fn render_observation_str(
    resource_json: &str,
    config: &TileConfig,
) -> Result<ObservationTile, TileError> {
    let value: Value =
        serde_json::from_str(resource_json).map_err(|err| TileError::Parse(err.to_string()))?;
    render_observation_value(&value, config)
}

/// Render a tile from an Observation held as a `serde_json::Value`.
pub fn render_observation_value(
    resource: &Value,
    config: &TileConfig,
) -> Result<ObservationTile, TileError> {
    let observation = parse_observation(resource)?;
    Ok(render_observation(&observation, config))
}

/// Convert a JSON resource into the typed [`Observation`].
pub fn parse_observation(resource: &Value) -> Result<Observation, TileError> {
    if !resource.is_object() {
        return Err(TileError::MissingData);
    }
    Observation::deserialize(resource).map_err(|err| TileError::Parse(err.to_string()))
}

/// Build the header and attribute table for one Observation.
pub fn render_observation(observation: &Observation, config: &TileConfig) -> ObservationTile {
    let code_display = DisplayValue::from(codeable_concept_summary(observation.code.as_ref()));
    let value_display = observation_value_display(observation);

    ObservationTile {
        id: observation.id.clone(),
        header: header_text(&code_display, &value_display),
        attributes: attribute_rows(Some(observation), config),
    }
}

/// Render a tile for every Observation entry of a Bundle JSON string.
pub fn render_bundle_str(
    bundle_json: &str,
    config: &TileConfig,
) -> Result<Vec<ObservationTile>, TileError> {
    let value: Value =
        serde_json::from_str(bundle_json).map_err(|err| TileError::Parse(err.to_string()))?;
    render_bundle_value(&value, config)
}

/// Render a tile for every Observation entry of a Bundle, in entry order.
///
/// Entries that fail to parse are logged and skipped.
pub fn render_bundle_value(
    bundle: &Value,
    config: &TileConfig,
) -> Result<Vec<ObservationTile>, TileError> {
    let bundle_type = bundle
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or(TileError::MissingData)?;

    if bundle_type != "Bundle" {
        return Err(TileError::Parse(format!(
            "Expected resourceType Bundle, received {bundle_type}"
        )));
    }

    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .ok_or(TileError::MissingData)?;

    let mut tiles = Vec::new();
    for entry in entries {
        let Some(resource) = entry.get("resource") else {
            continue;
        };

        match resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
        {
            "Observation" => match render_observation_value(resource, config) {
                Ok(tile) => tiles.push(tile),
                Err(err) => warn!(
                    id = resource.get("id").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
                    error = %err,
                    "skipping unreadable Observation entry"
                ),
            },
            other => debug!(resource_type = other, "skipping bundle entry"),
        }
    }

    Ok(tiles)
}

/// Best display text for a CodeableConcept.
///
/// A coding the user selected directly wins over `text`. An absent concept
/// yields an empty string, while missing `display`/`text` stay `None`.
pub fn codeable_concept_summary(concept: Option<&CodeableConcept>) -> Option<String> {
    let Some(concept) = concept else {
        return Some(String::new());
    };

    match concept.user_selected_coding() {
        Some(coding) => coding.display.clone(),
        None => concept.text.clone(),
    }
}

/// `"<value> (<unit>)"` when a unit is present, the bare number otherwise.
pub fn quantity_summary(quantity: &Quantity) -> DisplayValue {
    match quantity.unit.as_deref() {
        Some(unit) if !unit.is_empty() => {
            DisplayValue::Text(format!("{} ({unit})", quantity.value))
        }
        _ => DisplayValue::Number(quantity.value),
    }
}

/// Display value for the Observation's `value[x]` slot.
pub fn observation_value_display(observation: &Observation) -> DisplayValue {
    match &observation.value {
        None => DisplayValue::Absent,
        Some(ObservationValue::CodeableConcept(concept)) => {
            codeable_concept_summary(Some(concept)).into()
        }
        Some(ObservationValue::Quantity(quantity)) => quantity_summary(quantity),
        Some(ObservationValue::Other { field, value }) => {
            debug!(field = %field, "no summary for value type, passing it through");
            DisplayValue::Raw(value.clone())
        }
    }
}

/// One named row extractor of the attribute table.
#[derive(Clone, Copy)]
pub struct AttributeRule {
    pub label: &'static str,
    pub extract: fn(&Observation, &TileConfig) -> DisplayValue,
}

/// Attribute table rows, in display order.
pub const ATTRIBUTE_RULES: [AttributeRule; 7] = [
    AttributeRule {
        label: "Issue Date",
        extract: issue_date,
    },
    AttributeRule {
        label: "Status",
        extract: status,
    },
    AttributeRule {
        label: "Category",
        extract: category,
    },
    AttributeRule {
        label: "Subject",
        extract: subject,
    },
    AttributeRule {
        label: "Performer",
        extract: performer,
    },
    AttributeRule {
        label: "Code",
        extract: code,
    },
    AttributeRule {
        label: "Context",
        extract: context,
    },
];

/// Apply every rule of [`ATTRIBUTE_RULES`]. A missing record counts as empty.
///
/// Rows are kept even when their value is blank.
pub fn attribute_rows(
    observation: Option<&Observation>,
    config: &TileConfig,
) -> Vec<AttributeRow> {
    let empty = Observation::default();
    let observation = observation.unwrap_or(&empty);

    ATTRIBUTE_RULES
        .iter()
        .map(|rule| AttributeRow::new(rule.label, (rule.extract)(observation, config)))
        .collect()
}

fn issue_date(observation: &Observation, config: &TileConfig) -> DisplayValue {
    let Some(issued) = observation.issued.as_deref().filter(|s| !s.is_empty()) else {
        return DisplayValue::Text(config.unknown_issued_label.clone());
    };

    match format_issued(issued, config.display_offset_minutes) {
        Some(formatted) => DisplayValue::Text(formatted),
        None => {
            warn!(issued, "issued is not an RFC 3339 instant, showing it as received");
            DisplayValue::Text(issued.to_string())
        }
    }
}

fn format_issued(issued: &str, offset_minutes: i32) -> Option<String> {
    let offset = offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());

    DateTime::parse_from_rfc3339(issued)
        .map(|dt| {
            dt.with_timezone(&offset)
                .format("%Y-%m-%dT%H:%M:%S%:z")
                .to_string()
        })
        .ok()
}

fn status(observation: &Observation, _config: &TileConfig) -> DisplayValue {
    observation.status.clone().into()
}

fn category(observation: &Observation, _config: &TileConfig) -> DisplayValue {
    codeable_concept_summary(observation.category.as_ref()).into()
}

fn subject(observation: &Observation, _config: &TileConfig) -> DisplayValue {
    reference_display(observation.subject.as_ref())
}

fn performer(observation: &Observation, _config: &TileConfig) -> DisplayValue {
    observation
        .performer
        .clone()
        .map(DisplayValue::Raw)
        .unwrap_or_default()
}

fn code(observation: &Observation, _config: &TileConfig) -> DisplayValue {
    codeable_concept_summary(observation.code.as_ref()).into()
}

fn context(observation: &Observation, _config: &TileConfig) -> DisplayValue {
    reference_display(observation.context.as_ref())
}

// The reference itself is never followed.
fn reference_display(reference: Option<&Reference>) -> DisplayValue {
    reference
        .and_then(|reference| reference.display.clone())
        .into()
}

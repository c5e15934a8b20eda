//! Typed subset of the FHIR Observation resource needed to build a tile.
//!
//! Only the fields the tile displays are modelled. Everything else on the
//! resource is ignored, except the polymorphic `value[x]` slot which is
//! resolved into [`ObservationValue`] while deserializing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const VALUE_PREFIX: &str = "value";

/// Value variants that are picked first when a resource carries several
/// `value[x]` fields. Remaining `value*` keys follow in lexicographic order.
const VALUE_PRIORITY: [&str; 2] = ["valueQuantity", "valueCodeableConcept"];

/// [Coding](<https://hl7.org/fhir/datatypes.html#Coding>)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,
}

/// [CodeableConcept](<https://hl7.org/fhir/datatypes.html#CodeableConcept>)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,
}

impl CodeableConcept {
    /// First coding the user picked directly, if any.
    pub fn user_selected_coding(&self) -> Option<&Coding> {
        self.coding
            .iter()
            .flatten()
            .find(|coding| coding.user_selected == Some(true))
    }
}

/// [Quantity](<https://hl7.org/fhir/datatypes.html#Quantity>)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// [Reference](<https://hl7.org/fhir/references.html#Reference>)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// The `value[x]` slot of an Observation.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationValue {
    CodeableConcept(CodeableConcept),
    Quantity(Quantity),
    /// Any other data type, kept as received.
    Other { field: String, value: Value },
}

impl ObservationValue {
    /// Builds the variant matching a `value*` key.
    pub fn from_field(field: &str, value: Value) -> Result<Self, serde_json::Error> {
        match field {
            "valueQuantity" => serde_json::from_value(value).map(ObservationValue::Quantity),
            "valueCodeableConcept" => {
                serde_json::from_value(value).map(ObservationValue::CodeableConcept)
            }
            _ => Ok(ObservationValue::Other {
                field: field.to_string(),
                value,
            }),
        }
    }
}

/// [Observation](<https://hl7.org/fhir/observation.html>)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "ObservationWire")]
pub struct Observation {
    pub resource_type: Option<String>,
    pub id: Option<String>,
    pub code: Option<CodeableConcept>,
    pub status: Option<String>,
    pub category: Option<CodeableConcept>,
    pub subject: Option<Reference>,
    pub performer: Option<Value>,
    pub context: Option<Reference>,
    pub issued: Option<String>,
    pub value: Option<ObservationValue>,
}

/// `category` is a single concept in older FHIR releases and a list since STU3.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryField {
    Many(Vec<CodeableConcept>),
    One(CodeableConcept),
}

impl CategoryField {
    fn into_first(self) -> Option<CodeableConcept> {
        match self {
            CategoryField::Many(concepts) => concepts.into_iter().next(),
            CategoryField::One(concept) => Some(concept),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObservationWire {
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    code: Option<CodeableConcept>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<CategoryField>,
    #[serde(default)]
    subject: Option<Reference>,
    #[serde(default)]
    performer: Option<Value>,
    #[serde(default)]
    context: Option<Reference>,
    // R4 name of `context`.
    #[serde(default)]
    encounter: Option<Reference>,
    #[serde(default)]
    issued: Option<String>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl TryFrom<ObservationWire> for Observation {
    type Error = String;

    fn try_from(wire: ObservationWire) -> Result<Self, Self::Error> {
        if let Some(resource_type) = wire.resource_type.as_deref() {
            if resource_type != "Observation" {
                return Err(format!(
                    "Expected resourceType Observation, received {resource_type}"
                ));
            }
        }

        let value = take_value_field(wire.rest)
            .map(|(field, value)| ObservationValue::from_field(&field, value))
            .transpose()
            .map_err(|err| format!("Invalid Observation value: {err}"))?;

        Ok(Observation {
            resource_type: wire.resource_type,
            id: wire.id,
            code: wire.code,
            status: wire.status,
            category: wire.category.and_then(CategoryField::into_first),
            subject: wire.subject,
            performer: wire.performer,
            context: wire.context.or(wire.encounter),
            issued: wire.issued,
            value,
        })
    }
}

/// Picks the single `value[x]` entry to honor. Extra ones are only logged.
fn take_value_field(mut rest: BTreeMap<String, Value>) -> Option<(String, Value)> {
    let keys: Vec<String> = rest
        .keys()
        .filter(|key| key.starts_with(VALUE_PREFIX))
        .cloned()
        .collect();

    let selected = VALUE_PRIORITY
        .iter()
        .find(|preferred| rest.contains_key(**preferred))
        .map(|preferred| preferred.to_string())
        .or_else(|| keys.first().cloned())?;

    if keys.len() > 1 {
        let ignored: Vec<&String> = keys.iter().filter(|key| **key != selected).collect();
        debug!(
            selected = %selected,
            ignored = ?ignored,
            "observation carries several value[x] fields"
        );
    }

    rest.remove_entry(&selected)
}

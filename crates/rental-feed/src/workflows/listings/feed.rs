//! Wire shape of the listing feed. Fields the flattening reads by key are
//! required; lists the flattening treats as optional default to empty.
//!
//! Scalars are copied as text whatever their JSON type, so `"1000.00"`,
//! `1000` and `null` all pass through. Only an absent key or a wrongly
//! shaped container fails the feed.

use super::model::Identifier;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingDocument {
    #[serde(deserialize_with = "identifier")]
    pub(crate) property_id: Identifier,
    pub(crate) address: PropertyAddress,
    #[serde(default)]
    pub(crate) units: Vec<UnitDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyAddress {
    #[serde(deserialize_with = "text")]
    pub(crate) full_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitDocument {
    #[serde(deserialize_with = "identifier")]
    pub(crate) id: Identifier,
    #[serde(deserialize_with = "text")]
    pub(crate) occupancy_type: Option<String>,
    pub(crate) address: UnitAddress,
    pub(crate) applicant: PersonRef,
    #[serde(default)]
    pub(crate) co_applicants: Vec<PersonRef>,
    pub(crate) pricing: PricingDocument,
    #[serde(default)]
    pub(crate) fees: Vec<FeeDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitAddress {
    #[serde(deserialize_with = "text")]
    pub(crate) room_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonRef {
    #[serde(deserialize_with = "identifier")]
    pub(crate) id: Identifier,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricingDocument {
    pub(crate) monthly_pricing: Vec<PricingTier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricingTier {
    #[serde(deserialize_with = "name")]
    pub(crate) name: String,
    #[serde(deserialize_with = "text")]
    pub(crate) amount: Option<String>,
    #[serde(deserialize_with = "text")]
    pub(crate) months: Option<String>,
    // Only read on the last tier of a unit.
    #[serde(default, deserialize_with = "names")]
    pub(crate) concessions_applied: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeeDocument {
    #[serde(deserialize_with = "name")]
    pub(crate) name: String,
    #[serde(deserialize_with = "text")]
    pub(crate) description: Option<String>,
    #[serde(deserialize_with = "text")]
    pub(crate) amount: Option<String>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

/// The key must be present; `null` and `""` both become `None`.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_text)
}

fn name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    text(deserializer).map(Option::unwrap_or_default)
}

fn identifier<'de, D>(deserializer: D) -> Result<Identifier, D::Error>
where
    D: Deserializer<'de>,
{
    name(deserializer).map(Identifier::from)
}

// A `null` list is treated like a missing one.
fn names<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .map(|value| scalar_text(value).unwrap_or_default())
            .collect()
    }))
}

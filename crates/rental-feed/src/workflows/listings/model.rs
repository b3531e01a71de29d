use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream identifier, held as the exact text that is written to the
/// tables. Reading a table back never reinterprets it, so `007` stays `007`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ties a record type to its output file and header row.
pub trait TableRecord: Serialize {
    const FILE_NAME: &'static str;
    const HEADER: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub property_id: Identifier,
    pub address: Option<String>,
}

impl TableRecord for PropertyRecord {
    const FILE_NAME: &'static str = "properties.csv";
    const HEADER: &'static [&'static str] = &["propertyId", "address"];
}

/// A rentable room or apartment. `property_id` and `address` are copied from
/// the parent listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub unit_id: Identifier,
    pub occupancy_type: Option<String>,
    pub property_id: Identifier,
    pub address: Option<String>,
    pub room_number: Option<String>,
}

impl TableRecord for UnitRecord {
    const FILE_NAME: &'static str = "units.csv";
    const HEADER: &'static [&'static str] = &[
        "unitId",
        "occupancyType",
        "propertyId",
        "address",
        "roomNumber",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRecord {
    pub applicant_id: Identifier,
    pub unit_id: Identifier,
}

impl TableRecord for ApplicantRecord {
    const FILE_NAME: &'static str = "applicants.csv";
    const HEADER: &'static [&'static str] = &["applicantId", "unitId"];
}

/// Keyed to the primary applicant, not to the unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoApplicantRecord {
    pub co_applicant_id: Identifier,
    pub applicant_id: Identifier,
}

impl TableRecord for CoApplicantRecord {
    const FILE_NAME: &'static str = "co_applicants.csv";
    const HEADER: &'static [&'static str] = &["coApplicantId", "applicantId"];
}

/// `price_id` is the tier's display name and is only unique within a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub price_id: String,
    pub unit_id: Identifier,
    pub amount: Option<String>,
    pub duration: Option<String>,
}

impl TableRecord for PriceRecord {
    const FILE_NAME: &'static str = "prices.csv";
    const HEADER: &'static [&'static str] = &["priceId", "unitId", "amount", "duration"];
}

/// The feed carries no concession amounts, so `amount` is always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcessionRecord {
    pub concession_id: String,
    pub unit_id: Identifier,
    pub amount: Option<String>,
}

impl TableRecord for ConcessionRecord {
    const FILE_NAME: &'static str = "concessions.csv";
    const HEADER: &'static [&'static str] = &["concessionId", "unitId", "amount"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub fee_id: String,
    pub unit_id: Identifier,
    pub fee_type: Option<String>,
    pub amount: Option<String>,
}

impl TableRecord for FeeRecord {
    const FILE_NAME: &'static str = "fees.csv";
    const HEADER: &'static [&'static str] = &["feeId", "unitId", "feeType", "amount"];
}

/// The seven flattened collections, in insertion order. Every cell holds the
/// feed value as text; `None` is written as an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingTables {
    pub properties: Vec<PropertyRecord>,
    pub units: Vec<UnitRecord>,
    pub applicants: Vec<ApplicantRecord>,
    pub co_applicants: Vec<CoApplicantRecord>,
    pub prices: Vec<PriceRecord>,
    pub concessions: Vec<ConcessionRecord>,
    pub fees: Vec<FeeRecord>,
}

impl ListingTables {
    pub fn counts(&self) -> TableCounts {
        TableCounts {
            properties: self.properties.len(),
            units: self.units.len(),
            applicants: self.applicants.len(),
            co_applicants: self.co_applicants.len(),
            prices: self.prices.len(),
            concessions: self.concessions.len(),
            fees: self.fees.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub properties: usize,
    pub units: usize,
    pub applicants: usize,
    pub co_applicants: usize,
    pub prices: usize,
    pub concessions: usize,
    pub fees: usize,
}

impl fmt::Display for TableCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} properties, {} units, {} applicants, {} co-applicants, {} prices, {} concessions, {} fees",
            self.properties,
            self.units,
            self.applicants,
            self.co_applicants,
            self.prices,
            self.concessions,
            self.fees
        )
    }
}

use super::feed::{ListingDocument, UnitDocument};
use super::model::{
    ApplicantRecord, CoApplicantRecord, ConcessionRecord, FeeRecord, Identifier, ListingTables,
    PriceRecord, PropertyRecord, UnitRecord,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("listing feed has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("unit {unit_id} of property {property_id} has no monthly pricing")]
    EmptyPricing {
        property_id: Identifier,
        unit_id: Identifier,
    },
    #[error("last pricing tier of unit {unit_id} (property {property_id}) has no concessionsApplied")]
    MissingConcessions {
        property_id: Identifier,
        unit_id: Identifier,
    },
}

/// Flattens the raw feed payload into the seven tables.
///
/// Any shape problem fails the whole feed; no listing is skipped.
pub fn transform(feed: &Value) -> Result<ListingTables, TransformError> {
    let listings = Vec::<ListingDocument>::deserialize(feed)?;
    let tables = flatten(&listings)?;
    info!(counts = %tables.counts(), "listing feed flattened");
    Ok(tables)
}

pub(crate) fn flatten(listings: &[ListingDocument]) -> Result<ListingTables, TransformError> {
    let mut tables = ListingTables::default();

    for listing in listings {
        let address = listing.address.full_address.clone();
        tables.properties.push(PropertyRecord {
            property_id: listing.property_id.clone(),
            address: address.clone(),
        });

        debug!(
            property_id = %listing.property_id,
            units = listing.units.len(),
            "flattening listing"
        );

        for unit in &listing.units {
            flatten_unit(&listing.property_id, address.as_deref(), unit, &mut tables)?;
        }
    }

    Ok(tables)
}

fn flatten_unit(
    property_id: &Identifier,
    address: Option<&str>,
    unit: &UnitDocument,
    tables: &mut ListingTables,
) -> Result<(), TransformError> {
    let unit_id = &unit.id;

    tables.units.push(UnitRecord {
        unit_id: unit_id.clone(),
        occupancy_type: unit.occupancy_type.clone(),
        property_id: property_id.clone(),
        address: address.map(str::to_string),
        room_number: unit.address.room_number.clone(),
    });

    let applicant_id = &unit.applicant.id;
    tables.applicants.push(ApplicantRecord {
        applicant_id: applicant_id.clone(),
        unit_id: unit_id.clone(),
    });

    for co_applicant in &unit.co_applicants {
        tables.co_applicants.push(CoApplicantRecord {
            co_applicant_id: co_applicant.id.clone(),
            applicant_id: applicant_id.clone(),
        });
    }

    for tier in &unit.pricing.monthly_pricing {
        tables.prices.push(PriceRecord {
            price_id: tier.name.clone(),
            unit_id: unit_id.clone(),
            amount: tier.amount.clone(),
            duration: tier.months.clone(),
        });
    }

    // Concessions come from the last tier only; earlier tiers' lists are
    // never read.
    let last_tier = unit.pricing.monthly_pricing.last().ok_or_else(|| {
        TransformError::EmptyPricing {
            property_id: property_id.clone(),
            unit_id: unit_id.clone(),
        }
    })?;
    let concessions = last_tier.concessions_applied.as_ref().ok_or_else(|| {
        TransformError::MissingConcessions {
            property_id: property_id.clone(),
            unit_id: unit_id.clone(),
        }
    })?;
    for name in concessions {
        tables.concessions.push(ConcessionRecord {
            concession_id: name.clone(),
            unit_id: unit_id.clone(),
            amount: None,
        });
    }

    for fee in &unit.fees {
        tables.fees.push(FeeRecord {
            fee_id: fee.name.clone(),
            unit_id: unit_id.clone(),
            fee_type: fee.description.clone(),
            amount: fee.amount.clone(),
        });
    }

    Ok(())
}

use rental_feed::workflows::listings::{
    read_table, ApplicantRecord, CoApplicantRecord, ConcessionRecord, ExportOutcome, FeeRecord,
    ListingExport, ListingExportError, ListingTables, PriceRecord, StaticListingSource,
    TableRecord, TableWriter, TransformError, UnitRecord,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::path::Path;

fn two_unit_listing() -> Value {
    json!([{
        "propertyId": "prop-berlin-1",
        "address": { "fullAddress": "Torstrasse 1, 10119 Berlin" },
        "units": [
            {
                "id": "unit-1",
                "occupancyType": "private-room",
                "address": { "roomNumber": "1A" },
                "applicant": { "id": "app-1" },
                "coApplicants": [{ "id": "co-1" }],
                "pricing": {
                    "monthlyPricing": [
                        { "name": "12 months", "amount": 850, "months": 12, "concessionsApplied": [] },
                        { "name": "6 months", "amount": 920, "months": 6, "concessionsApplied": ["welcome-discount"] }
                    ]
                },
                "fees": [{ "name": "booking", "description": "Booking fee", "amount": 199 }]
            },
            {
                "id": "unit-2",
                "occupancyType": "entire-apartment",
                "address": { "roomNumber": 2 },
                "applicant": { "id": "app-2" },
                "pricing": {
                    "monthlyPricing": [
                        { "name": "12 months", "amount": 1400, "months": 12, "concessionsApplied": [] },
                        { "name": "6 months", "amount": 1550, "months": 6, "concessionsApplied": ["welcome-discount"] }
                    ]
                }
            }
        ]
    }])
}

fn read_back<T: TableRecord + DeserializeOwned>(dir: &Path) -> Vec<T> {
    let file = File::open(dir.join(T::FILE_NAME)).expect("table file exists");
    read_table(file).expect("table parses")
}

fn header_of(dir: &Path, file_name: &str) -> String {
    fs::read_to_string(dir.join(file_name))
        .expect("table file exists")
        .lines()
        .next()
        .expect("header row")
        .to_string()
}

#[test]
fn export_writes_seven_tables_for_two_unit_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = TableWriter::new(dir.path());
    let source = StaticListingSource::new(two_unit_listing());

    let outcome = ListingExport::run(&source, &writer).expect("export succeeds");
    let counts = match outcome {
        ExportOutcome::Written(counts) => counts,
        other => panic!("expected written outcome, got {other:?}"),
    };

    assert_eq!(counts.properties, 1);
    assert_eq!(counts.units, 2);
    assert_eq!(counts.applicants, 2);
    assert_eq!(counts.co_applicants, 1);
    assert_eq!(counts.prices, 4);
    assert_eq!(counts.concessions, 2);
    assert_eq!(counts.fees, 1);

    let units: Vec<UnitRecord> = read_back(dir.path());
    assert!(units
        .iter()
        .all(|unit| unit.property_id.as_str() == "prop-berlin-1"));
    assert_eq!(
        units[0].address.as_deref(),
        Some("Torstrasse 1, 10119 Berlin")
    );
    assert_eq!(
        units[1].room_number.as_deref(),
        Some("2")
    );

    let applicants: Vec<ApplicantRecord> = read_back(dir.path());
    let pairs: Vec<(&str, &str)> = applicants
        .iter()
        .map(|a| (a.applicant_id.as_str(), a.unit_id.as_str()))
        .collect();
    assert_eq!(pairs, vec![("app-1", "unit-1"), ("app-2", "unit-2")]);

    let co_applicants: Vec<CoApplicantRecord> = read_back(dir.path());
    assert_eq!(co_applicants.len(), 1);
    assert_eq!(co_applicants[0].applicant_id.as_str(), "app-1");

    let concessions: Vec<ConcessionRecord> = read_back(dir.path());
    let concession_units: Vec<&str> = concessions.iter().map(|c| c.unit_id.as_str()).collect();
    assert_eq!(concession_units, vec!["unit-1", "unit-2"]);
    assert!(concessions
        .iter()
        .all(|c| c.concession_id == "welcome-discount" && c.amount.is_none()));

    let prices: Vec<PriceRecord> = read_back(dir.path());
    let price_ids: Vec<&str> = prices.iter().map(|p| p.price_id.as_str()).collect();
    assert_eq!(
        price_ids,
        vec!["12 months", "6 months", "12 months", "6 months"]
    );

    let fees: Vec<FeeRecord> = read_back(dir.path());
    assert_eq!(fees[0].fee_type.as_deref(), Some("Booking fee"));
}

#[test]
fn written_headers_match_the_record_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = TableWriter::new(dir.path());
    ListingExport::run(&StaticListingSource::new(two_unit_listing()), &writer)
        .expect("export succeeds");

    assert_eq!(header_of(dir.path(), "properties.csv"), "propertyId,address");
    assert_eq!(
        header_of(dir.path(), "units.csv"),
        "unitId,occupancyType,propertyId,address,roomNumber"
    );
    assert_eq!(header_of(dir.path(), "applicants.csv"), "applicantId,unitId");
    assert_eq!(
        header_of(dir.path(), "co_applicants.csv"),
        "coApplicantId,applicantId"
    );
    assert_eq!(
        header_of(dir.path(), "prices.csv"),
        "priceId,unitId,amount,duration"
    );
    assert_eq!(
        header_of(dir.path(), "concessions.csv"),
        "concessionId,unitId,amount"
    );
    assert_eq!(
        header_of(dir.path(), "fees.csv"),
        "feeId,unitId,feeType,amount"
    );
}

fn numeric_looking_listing() -> Value {
    json!([{
        "propertyId": "007",
        "address": { "fullAddress": "Main St 1, Apt 2, Berlin" },
        "units": [{
            "id": "0042",
            "occupancyType": "1.5",
            "address": { "roomNumber": "01" },
            "applicant": { "id": "000123" },
            "coApplicants": [{ "id": "1e3" }],
            "pricing": {
                "monthlyPricing": [
                    { "name": "12", "amount": "1000.00", "months": "06", "concessionsApplied": [] },
                    { "name": "Flex, monthly", "amount": 1250.5, "months": null, "concessionsApplied": ["0", "10% off, first month"] }
                ]
            },
            "fees": [{ "name": "01", "description": "Cleaning, final", "amount": "0049.90" }]
        }]
    }])
}

#[test]
fn written_tables_read_back_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = TableWriter::new(dir.path());
    let tables = rental_feed::workflows::listings::transform(&numeric_looking_listing())
        .expect("feed flattens");
    writer.write_all(&tables).expect("tables written");

    let read = ListingTables {
        properties: read_back(dir.path()),
        units: read_back(dir.path()),
        applicants: read_back(dir.path()),
        co_applicants: read_back(dir.path()),
        prices: read_back(dir.path()),
        concessions: read_back(dir.path()),
        fees: read_back(dir.path()),
    };
    assert_eq!(read, tables);

    assert_eq!(read.properties[0].property_id.as_str(), "007");
    assert_eq!(read.units[0].unit_id.as_str(), "0042");
    assert_eq!(read.units[0].room_number.as_deref(), Some("01"));
    assert_eq!(read.units[0].occupancy_type.as_deref(), Some("1.5"));
    assert_eq!(read.applicants[0].applicant_id.as_str(), "000123");
    assert_eq!(read.co_applicants[0].co_applicant_id.as_str(), "1e3");
    assert_eq!(read.prices[0].amount.as_deref(), Some("1000.00"));
    assert_eq!(read.prices[0].duration.as_deref(), Some("06"));
    assert_eq!(read.prices[1].amount.as_deref(), Some("1250.5"));
    assert!(read.prices[1].duration.is_none());
    assert_eq!(read.concessions[1].concession_id, "10% off, first month");
    assert_eq!(read.fees[0].amount.as_deref(), Some("0049.90"));
}

#[test]
fn rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = TableWriter::new(dir.path());
    fs::write(dir.path().join("fees.csv"), "stale contents\n").expect("seed stale file");

    ListingExport::run(&StaticListingSource::new(two_unit_listing()), &writer)
        .expect("export succeeds");

    let fees = fs::read_to_string(dir.path().join("fees.csv")).expect("fees written");
    assert!(!fees.contains("stale"));
}

#[test]
fn empty_pricing_list_fails_the_run() {
    let mut feed = two_unit_listing();
    feed[0]["units"][1]["pricing"]["monthlyPricing"] = json!([]);

    let dir = tempfile::tempdir().expect("tempdir");
    let writer = TableWriter::new(dir.path());
    let error = ListingExport::run(&StaticListingSource::new(feed), &writer)
        .expect_err("empty pricing is fatal");

    match error {
        ListingExportError::Transform(TransformError::EmptyPricing { unit_id, .. }) => {
            assert_eq!(unit_id.as_str(), "unit-2");
        }
        other => panic!("expected empty pricing error, got {other:?}"),
    }
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn missing_applicant_fails_the_run() {
    let mut feed = two_unit_listing();
    feed[0]["units"][0]
        .as_object_mut()
        .expect("unit object")
        .remove("applicant");

    let dir = tempfile::tempdir().expect("tempdir");
    let writer = TableWriter::new(dir.path());
    let error = ListingExport::run(&StaticListingSource::new(feed), &writer)
        .expect_err("applicant is required");

    assert!(matches!(
        error,
        ListingExportError::Transform(TransformError::Shape(_))
    ));
}

#[test]
fn unit_counts_follow_every_listing() {
    let mut feed = two_unit_listing();
    let mut second = feed[0].clone();
    second["propertyId"] = json!(42);
    let whole_apartment = second["units"][1].clone();
    second["units"] = json!([whole_apartment]);
    feed.as_array_mut().expect("array").push(second);

    let tables = rental_feed::workflows::listings::transform(&feed).expect("feed flattens");

    assert_eq!(tables.properties.len(), 2);
    assert_eq!(tables.units.len(), 3);
    assert_eq!(tables.units[2].property_id.as_str(), "42");
}

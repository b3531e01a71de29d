use clap::Parser;
use rental_feed::config::AppConfig;
use rental_feed::error::AppError;
use rental_feed::telemetry;
use rental_feed::workflows::listings::{ExportOutcome, HttpListingSource, ListingExport, TableWriter};
use tracing::info;

pub(crate) const SUCCESS_MESSAGE: &str = "Data serialized and saved as CSV files.";
pub(crate) const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data from the API.";

#[derive(Parser, Debug)]
#[command(
    name = "rental-feed-etl",
    about = "Fetch the rental listing feed and write it out as relational CSV tables",
    version
)]
struct Cli {}

pub(crate) fn run() -> Result<(), AppError> {
    let _cli = Cli::parse();

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = HttpListingSource::new(config.feed.endpoint.clone());
    let writer = TableWriter::new(config.feed.output_dir.clone());
    info!(
        endpoint = %source.endpoint(),
        output_dir = %writer.output_dir().display(),
        "starting listing export"
    );

    let outcome = ListingExport::run(&source, &writer)?;
    if let ExportOutcome::Written(counts) = &outcome {
        info!(%counts, "listing export finished");
    }
    println!("{}", status_message(&outcome));
    Ok(())
}

pub(crate) fn status_message(outcome: &ExportOutcome) -> &'static str {
    match outcome {
        ExportOutcome::Written(_) => SUCCESS_MESSAGE,
        ExportOutcome::FetchFailed(_) | ExportOutcome::NoData => FETCH_FAILED_MESSAGE,
    }
}

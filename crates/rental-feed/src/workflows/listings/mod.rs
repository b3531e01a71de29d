mod feed;
pub mod model;
mod source;
mod transform;
mod writer;

pub use model::{
    ApplicantRecord, CoApplicantRecord, ConcessionRecord, FeeRecord, Identifier, ListingTables,
    PriceRecord, PropertyRecord, TableCounts, TableRecord, UnitRecord,
};
pub use source::{FetchFailure, HttpListingSource, ListingSource, StaticListingSource};
pub use transform::{transform, TransformError};
pub use writer::{read_table, TableWriter, WriteError};

use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ListingExportError {
    Transform(TransformError),
    Write(WriteError),
}

impl std::fmt::Display for ListingExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingExportError::Transform(err) => {
                write!(f, "could not flatten listing feed: {}", err)
            }
            ListingExportError::Write(err) => write!(f, "could not write listing tables: {}", err),
        }
    }
}

impl std::error::Error for ListingExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingExportError::Transform(err) => Some(err),
            ListingExportError::Write(err) => Some(err),
        }
    }
}

impl From<TransformError> for ListingExportError {
    fn from(err: TransformError) -> Self {
        Self::Transform(err)
    }
}

impl From<WriteError> for ListingExportError {
    fn from(err: WriteError) -> Self {
        Self::Write(err)
    }
}

/// Result of a run that did not hit a transform or write error.
#[derive(Debug)]
pub enum ExportOutcome {
    Written(TableCounts),
    FetchFailed(FetchFailure),
    /// The feed answered but carried no listings.
    NoData,
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written(_))
    }
}

/// Fetch, flatten, write. Fetch problems end the run without touching the
/// output directory; transform and write errors are returned to the caller.
pub struct ListingExport;

impl ListingExport {
    pub fn run(
        source: &dyn ListingSource,
        writer: &TableWriter,
    ) -> Result<ExportOutcome, ListingExportError> {
        let feed = match source.fetch() {
            Ok(feed) => feed,
            Err(failure) => {
                warn!(error = %failure, "listing feed unavailable");
                return Ok(ExportOutcome::FetchFailed(failure));
            }
        };

        if is_empty_feed(&feed) {
            warn!("listing feed returned no listings");
            return Ok(ExportOutcome::NoData);
        }

        let tables = transform(&feed)?;
        let written = writer.write_all(&tables)?;
        info!(
            files = written.len(),
            output_dir = %writer.output_dir().display(),
            "listing tables written"
        );

        Ok(ExportOutcome::Written(tables.counts()))
    }
}

fn is_empty_feed(feed: &Value) -> bool {
    match feed {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

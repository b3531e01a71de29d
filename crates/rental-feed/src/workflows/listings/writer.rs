use super::model::{
    ApplicantRecord, CoApplicantRecord, ConcessionRecord, FeeRecord, ListingTables, PriceRecord,
    PropertyRecord, TableRecord, UnitRecord,
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to flush {}: {source}", path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes each table to its own CSV file inside `output_dir`.
///
/// Files are written one after another; an error leaves the files written
/// before it in place.
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
}

impl TableWriter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for<T: TableRecord>(&self) -> PathBuf {
        self.output_dir.join(T::FILE_NAME)
    }

    pub fn write_all(&self, tables: &ListingTables) -> Result<Vec<PathBuf>, WriteError> {
        Ok(vec![
            self.write_table::<PropertyRecord>(&tables.properties)?,
            self.write_table::<UnitRecord>(&tables.units)?,
            self.write_table::<ApplicantRecord>(&tables.applicants)?,
            self.write_table::<CoApplicantRecord>(&tables.co_applicants)?,
            self.write_table::<PriceRecord>(&tables.prices)?,
            self.write_table::<ConcessionRecord>(&tables.concessions)?,
            self.write_table::<FeeRecord>(&tables.fees)?,
        ])
    }

    pub fn write_table<T: TableRecord>(&self, rows: &[T]) -> Result<PathBuf, WriteError> {
        let path = self.path_for::<T>();
        let file = File::create(&path).map_err(|source| WriteError::Create {
            path: path.clone(),
            source,
        })?;

        // The header is written by hand so empty tables still get one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let csv_error = |source: csv::Error| WriteError::Csv {
            path: path.clone(),
            source,
        };

        writer.write_record(T::HEADER).map_err(csv_error)?;
        for row in rows {
            writer.serialize(row).map_err(csv_error)?;
        }
        writer.flush().map_err(|source| WriteError::Flush {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), rows = rows.len(), "table written");
        Ok(path)
    }
}

/// Reads a table written by [`TableWriter`] back into records.
pub fn read_table<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: TableRecord + DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);
    csv_reader.deserialize::<T>().collect()
}

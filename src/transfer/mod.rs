//! CSV import/export engine
//!
//! Moves full snapshots of both collections between the remote store and
//! BOM-prefixed UTF-8 CSV files. The file shapes are declared as schema
//! descriptors in [`schema`]; [`export`] renders collections to bytes
//! and [`import`] validates and merges uploaded files.

pub mod export;
pub mod import;
pub mod schema;

pub use export::{
    export_students, export_training, ExportFile, STUDENTS_FILE_NAME, TRAINING_FILE_NAME, UTF8_BOM,
};
pub use import::{ImportMode, ImportReport};
pub use schema::{detect_schema, CsvSchema, SchemaKind};

use crate::error::Result;
use crate::models::{Student, TrainingRecord};
use crate::store::{Collection, RemoteStoreClient};

/// Import/export engine over the remote store
pub struct TransferEngine {
    store: RemoteStoreClient,
}

impl TransferEngine {
    /// Create a new transfer engine
    pub fn new(store: RemoteStoreClient) -> Self {
        Self { store }
    }

    /// Export both collections as CSV files with fixed names
    pub async fn export(&self) -> Result<Vec<ExportFile>> {
        let students: Vec<Student> = self.store.list(Collection::Students).await?;
        let records: Vec<TrainingRecord> = self.store.list(Collection::TrainingRecords).await?;

        Ok(vec![
            export::export_students(&students)?,
            export::export_training(&records)?,
        ])
    }

    /// Import one CSV file, merging under the chosen mode
    ///
    /// The target collection is detected from the header row; an
    /// unrecognized header aborts before any row is processed.
    pub async fn import(&self, bytes: &[u8], mode: ImportMode) -> Result<ImportReport> {
        import::run(&self.store, bytes, mode).await
    }
}

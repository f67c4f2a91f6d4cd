//! File record repository for reconciliation reads.

use chrono::{DateTime, FixedOffset, Utc};
use lumora_core::reconciliation::{
    FileRecord, FileRecordSource, ReconciliationError, parse_size_bytes, parse_size_mb,
};
use sea_orm::{
    DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement,
};
use tracing::{debug, warn};

/// Sizes are cast to text so rows from legacy schemas that kept sizes as
/// free-form strings read the same way as typed columns.
const FILE_RECORDS_SQL: &str = r"
SELECT
    owner_id,
    session_id,
    filename,
    storage_key,
    CAST(file_size AS TEXT) AS file_size,
    CAST(file_size_mb AS TEXT) AS file_size_mb,
    folder,
    uploaded_at
FROM uploaded_files
ORDER BY uploaded_at DESC
";

/// Raw row before size normalization.
#[derive(Debug, Clone, FromQueryResult)]
pub struct FileRecordRow {
    /// Owning user.
    pub owner_id: String,
    /// Photo session.
    pub session_id: Option<String>,
    /// Original filename.
    pub filename: String,
    /// Object store key.
    pub storage_key: Option<String>,
    /// Byte size as text.
    pub file_size: Option<String>,
    /// Megabyte size as text.
    pub file_size_mb: Option<String>,
    /// Folder tag.
    pub folder: Option<String>,
    /// Upload time.
    pub uploaded_at: DateTime<FixedOffset>,
}

impl FileRecordRow {
    /// Normalize sizes. Unparseable sizes become zero and flag the record.
    #[must_use]
    pub fn into_file_record(self) -> FileRecord {
        let size = parse_size_bytes(self.file_size.as_deref());
        let size_mb = parse_size_mb(self.file_size_mb.as_deref());
        let has_malformed_size = size.is_malformed() || size_mb.is_malformed();

        if has_malformed_size {
            warn!(
                storage_key = self.storage_key.as_deref().unwrap_or(""),
                owner_id = %self.owner_id,
                file_size = self.file_size.as_deref().unwrap_or(""),
                file_size_mb = self.file_size_mb.as_deref().unwrap_or(""),
                "Malformed file size, counting as zero"
            );
        }

        FileRecord {
            owner_id: self.owner_id,
            session_id: self.session_id,
            filename: self.filename,
            storage_key: self.storage_key,
            size_bytes: size.value(),
            size_mb: size_mb.value(),
            folder: self.folder,
            uploaded_at: self.uploaded_at.with_timezone(&Utc),
            has_malformed_size,
        }
    }
}

/// Read-only access to `uploaded_files`.
#[derive(Debug, Clone)]
pub struct FileRecordRepository {
    db: DatabaseConnection,
}

impl FileRecordRepository {
    /// Creates a new file record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches raw rows, newest upload first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_rows(&self) -> Result<Vec<FileRecordRow>, DbErr> {
        let statement = Statement::from_string(DbBackend::Postgres, FILE_RECORDS_SQL);
        FileRecordRow::find_by_statement(statement)
            .all(&self.db)
            .await
    }
}

impl FileRecordSource for FileRecordRepository {
    async fn fetch_file_records(&self) -> Result<Vec<FileRecord>, ReconciliationError> {
        let rows = self.fetch_rows().await.map_err(map_db_err)?;
        let records: Vec<FileRecord> = rows
            .into_iter()
            .map(FileRecordRow::into_file_record)
            .collect();

        debug!(records = records.len(), "Fetched file records");
        Ok(records)
    }
}

/// Classify a database error for the reconciliation run.
#[must_use]
pub fn map_db_err(err: DbErr) -> ReconciliationError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            ReconciliationError::connection(err.to_string())
        }
        other => ReconciliationError::query(other.to_string()),
    }
}

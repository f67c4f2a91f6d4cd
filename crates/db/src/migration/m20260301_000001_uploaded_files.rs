//! Uploaded files migration.
//!
//! Creates the table that records every upload and where it lives in the
//! object store.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(UPLOADED_FILES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS uploaded_files CASCADE;")
            .await?;
        Ok(())
    }
}

const UPLOADED_FILES_SQL: &str = r"
CREATE TABLE uploaded_files (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id VARCHAR(255) NOT NULL,
    session_id VARCHAR(255),
    filename TEXT NOT NULL,
    storage_key TEXT,
    file_size BIGINT,
    file_size_mb NUMERIC(14, 4),
    folder VARCHAR(64),
    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Reconciliation reads everything newest first
CREATE INDEX idx_uploaded_files_uploaded_at ON uploaded_files(uploaded_at DESC);

-- Key lookups; not unique because legacy rows may share a key
CREATE INDEX idx_uploaded_files_storage_key ON uploaded_files(storage_key) WHERE storage_key IS NOT NULL;

CREATE INDEX idx_uploaded_files_owner ON uploaded_files(owner_id, uploaded_at DESC);
";

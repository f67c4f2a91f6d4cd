//! `SeaORM` Entity for uploaded_files table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "uploaded_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub session_id: Option<String>,
    pub filename: String,
    pub storage_key: Option<String>,
    pub file_size: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((14, 4)))", nullable)]
    pub file_size_mb: Option<Decimal>,
    pub folder: Option<String>,
    pub uploaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

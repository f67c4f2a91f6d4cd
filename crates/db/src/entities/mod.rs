//! `SeaORM` entity definitions.

pub mod uploaded_files;

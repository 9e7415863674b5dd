//! `SeaORM` entity definitions.

pub mod carriers;
pub mod trucking_records;

//! `SeaORM` Entity for trucking_records table.
//!
//! Container lines and attachment references are embedded JSONB documents,
//! owned exclusively by their row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trucking_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub carrier: String,
    pub customer: String,
    pub handler: String,
    pub booking: String,
    pub notes: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub containers: Json,
    pub cost: Decimal,
    pub extra_cost: Decimal,
    pub lifting_cost: Decimal,
    pub revenue: Decimal,
    pub payment_status: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub lifting_invoice: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub invoices: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Initial database migration.
//!
//! Creates the carriers and trucking_records tables. Container lines and
//! attachment references live inside their record row as JSONB documents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(CARRIERS_SQL).await?;
        db.execute_unprepared(TRUCKING_RECORDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CARRIERS_SQL: &str = r"
CREATE TABLE carriers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    tax_code TEXT NOT NULL,
    key TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- no two carriers may share the same (name, tax_code) pair
CREATE UNIQUE INDEX idx_carriers_name_tax_code ON carriers (name, tax_code);
";

const TRUCKING_RECORDS_SQL: &str = r"
CREATE TABLE trucking_records (
    id UUID PRIMARY KEY,
    carrier TEXT NOT NULL DEFAULT '',
    customer TEXT NOT NULL DEFAULT '',
    handler TEXT NOT NULL DEFAULT '',
    booking TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    containers JSONB NOT NULL DEFAULT '[]'::jsonb,
    cost NUMERIC(15, 2) NOT NULL DEFAULT 0,
    extra_cost NUMERIC(15, 2) NOT NULL DEFAULT 0,
    lifting_cost NUMERIC(15, 2) NOT NULL DEFAULT 0,
    revenue NUMERIC(15, 2) NOT NULL DEFAULT 0,
    payment_status TEXT NOT NULL DEFAULT 'unpaid',
    lifting_invoice JSONB,
    invoices JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- listings are newest-first
CREATE INDEX idx_trucking_records_created_at ON trucking_records (created_at DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS trucking_records;
DROP TABLE IF EXISTS carriers;
";

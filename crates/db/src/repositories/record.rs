//! Carrier and trucking-record repository for database operations.
//!
//! Implements the core persistence trait using SeaORM. Embedded
//! collections (container lines, attachment references) round-trip
//! through JSONB columns.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{carriers, trucking_records};
use haulbook_core::record::{
    Carrier, ContainerLine, CreateCarrierInput, CreateRecordInput, PaymentStatus, RecordError,
    RecordRepository as RecordRepositoryTrait, RecordUpdate, TruckingRecord,
};
use haulbook_core::storage::AttachmentRef;

/// Record repository implementation.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    db: DatabaseConnection,
}

impl RecordRepository {
    /// Create a new record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl RecordRepositoryTrait for RecordRepository {
    async fn list_carriers(&self) -> Result<Vec<Carrier>, RecordError> {
        let models = carriers::Entity::find()
            .order_by_asc(carriers::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        Ok(models.into_iter().map(carrier_to_domain).collect())
    }

    async fn create_carrier(&self, input: CreateCarrierInput) -> Result<Carrier, RecordError> {
        let duplicates = carriers::Entity::find()
            .filter(carriers::Column::Name.eq(&input.name))
            .filter(carriers::Column::TaxCode.eq(&input.tax_code))
            .count(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        if duplicates > 0 {
            return Err(RecordError::conflict(format!(
                "{} ({})",
                input.name, input.tax_code
            )));
        }

        let active_model = carriers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            tax_code: Set(input.tax_code),
            key: Set(input.key),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        Ok(carrier_to_domain(model))
    }

    async fn delete_carrier(&self, id: Uuid) -> Result<(), RecordError> {
        // an absent id deletes zero rows, which is fine
        carriers::Entity::delete_many()
            .filter(carriers::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<TruckingRecord>, RecordError> {
        let models = trucking_records::Entity::find()
            .order_by_desc(trucking_records::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        models.into_iter().map(record_to_domain).collect()
    }

    async fn get_record(&self, id: Uuid) -> Result<TruckingRecord, RecordError> {
        let model = trucking_records::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?
            .ok_or(RecordError::NotFound(id))?;

        record_to_domain(model)
    }

    async fn create_record(&self, input: CreateRecordInput) -> Result<TruckingRecord, RecordError> {
        let active_model = trucking_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            carrier: Set(input.carrier),
            customer: Set(input.customer),
            handler: Set(input.handler),
            booking: Set(input.booking),
            notes: Set(input.notes),
            containers: Set(to_json(&input.containers)?),
            cost: Set(input.cost),
            extra_cost: Set(input.extra_cost),
            lifting_cost: Set(input.lifting_cost),
            revenue: Set(input.revenue),
            payment_status: Set(input.payment_status.as_str().to_string()),
            lifting_invoice: Set(input.lifting_invoice.map(|r| to_json(&r)).transpose()?),
            invoices: Set(to_json(&input.invoices)?),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        record_to_domain(model)
    }

    async fn update_record(
        &self,
        id: Uuid,
        update: RecordUpdate,
    ) -> Result<TruckingRecord, RecordError> {
        let model = trucking_records::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?
            .ok_or(RecordError::NotFound(id))?;

        let mut active_model: trucking_records::ActiveModel = model.into();
        if let Some(v) = update.carrier {
            active_model.carrier = Set(v);
        }
        if let Some(v) = update.customer {
            active_model.customer = Set(v);
        }
        if let Some(v) = update.handler {
            active_model.handler = Set(v);
        }
        if let Some(v) = update.booking {
            active_model.booking = Set(v);
        }
        if let Some(v) = update.notes {
            active_model.notes = Set(v);
        }
        if let Some(v) = update.containers {
            active_model.containers = Set(to_json(&v)?);
        }
        if let Some(v) = update.cost {
            active_model.cost = Set(v);
        }
        if let Some(v) = update.extra_cost {
            active_model.extra_cost = Set(v);
        }
        if let Some(v) = update.lifting_cost {
            active_model.lifting_cost = Set(v);
        }
        if let Some(v) = update.revenue {
            active_model.revenue = Set(v);
        }
        if let Some(v) = update.payment_status {
            active_model.payment_status = Set(v.as_str().to_string());
        }
        if let Some(v) = update.invoices {
            active_model.invoices = Set(to_json(&v)?);
        }
        if let Some(v) = update.lifting_invoice {
            active_model.lifting_invoice = Set(v.map(|r| to_json(&r)).transpose()?);
        }

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        record_to_domain(model)
    }

    async fn delete_record(&self, id: Uuid) -> Result<Option<TruckingRecord>, RecordError> {
        let Some(model) = trucking_records::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?
        else {
            return Ok(None);
        };

        trucking_records::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RecordError::persistence(e.to_string()))?;

        record_to_domain(model).map(Some)
    }
}

/// Serialize an embedded document for a JSONB column.
fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RecordError> {
    serde_json::to_value(value).map_err(|e| RecordError::persistence(e.to_string()))
}

/// Convert database model to domain model.
fn carrier_to_domain(model: carriers::Model) -> Carrier {
    Carrier {
        id: model.id,
        name: model.name,
        tax_code: model.tax_code,
        key: model.key,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

/// Convert database model to domain model, decoding the embedded JSONB
/// documents.
fn record_to_domain(model: trucking_records::Model) -> Result<TruckingRecord, RecordError> {
    let containers: Vec<ContainerLine> = serde_json::from_value(model.containers)
        .map_err(|e| RecordError::persistence(e.to_string()))?;
    let invoices: Vec<AttachmentRef> = serde_json::from_value(model.invoices)
        .map_err(|e| RecordError::persistence(e.to_string()))?;
    let lifting_invoice: Option<AttachmentRef> = model
        .lifting_invoice
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| RecordError::persistence(e.to_string()))?;

    Ok(TruckingRecord {
        id: model.id,
        carrier: model.carrier,
        customer: model.customer,
        handler: model.handler,
        booking: model.booking,
        notes: model.notes,
        containers,
        cost: model.cost,
        extra_cost: model.extra_cost,
        lifting_cost: model.lifting_cost,
        revenue: model.revenue,
        payment_status: PaymentStatus::parse(&model.payment_status),
        lifting_invoice,
        invoices,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_model() -> trucking_records::Model {
        trucking_records::Model {
            id: Uuid::new_v4(),
            carrier: "ABC Logistics".to_string(),
            customer: "Northwind".to_string(),
            handler: "Lan".to_string(),
            booking: "BK-1042".to_string(),
            notes: String::new(),
            containers: json!([{
                "vehicle": "51C-123.45",
                "contNo": "MSKU1234567",
                "contType": "40HC",
                "operation": "import",
                "origin": "Cat Lai",
                "destination": "Binh Duong",
                "cost": "1500000",
                "extraCost": "0",
                "liftingCost": "200000",
                "emptyDepot": "Depot 3"
            }]),
            cost: dec!(1500000),
            extra_cost: dec!(0),
            lifting_cost: dec!(200000),
            revenue: dec!(2000000),
            payment_status: "paid".to_string(),
            lifting_invoice: Some(json!({
                "storageRef": "1700000000000-lift.pdf",
                "originalName": "lift.pdf"
            })),
            invoices: json!([
                {"storageRef": "1700000000001-inv.pdf", "originalName": "inv.pdf"}
            ]),
            created_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_record_to_domain_decodes_embedded_documents() {
        let record = record_to_domain(sample_model()).expect("decodes");

        assert_eq!(record.containers.len(), 1);
        assert_eq!(record.containers[0].cont_no, "MSKU1234567");
        assert_eq!(record.containers[0].cost, dec!(1500000));
        assert_eq!(record.payment_status, PaymentStatus::Paid);
        assert_eq!(record.invoices.len(), 1);
        assert_eq!(
            record.lifting_invoice.as_ref().map(|r| r.storage_ref.as_str()),
            Some("1700000000000-lift.pdf")
        );
    }

    #[test]
    fn test_record_to_domain_rejects_malformed_invoices() {
        let mut model = sample_model();
        model.invoices = json!({"not": "a list"});

        let err = record_to_domain(model).unwrap_err();
        assert!(matches!(err, RecordError::Persistence(_)));
    }

    #[test]
    fn test_unknown_payment_status_reads_unpaid() {
        let mut model = sample_model();
        model.payment_status = "overdue".to_string();

        let record = record_to_domain(model).expect("decodes");
        assert_eq!(record.payment_status, PaymentStatus::Unpaid);
    }
}

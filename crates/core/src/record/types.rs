//! Record types and data structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::AttachmentRef;

/// Payment status of a trucking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet paid.
    #[default]
    Unpaid,
    /// Settled.
    Paid,
}

impl PaymentStatus {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    /// Parse from a string value; anything unrecognized reads as unpaid.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "paid" => Self::Paid,
            _ => Self::Unpaid,
        }
    }
}

/// One container line on a booking, owned exclusively by its parent record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLine {
    /// Vehicle plate or fleet code.
    #[serde(default)]
    pub vehicle: String,
    /// Container number.
    #[serde(default)]
    pub cont_no: String,
    /// Container type (20', 40', reefer, ...).
    #[serde(default)]
    pub cont_type: String,
    /// Operation kind (import, export, reposition, ...).
    #[serde(default)]
    pub operation: String,
    /// Pickup location.
    #[serde(default)]
    pub origin: String,
    /// Drop-off location.
    #[serde(default)]
    pub destination: String,
    /// Base haulage cost.
    #[serde(default)]
    pub cost: Decimal,
    /// Extra cost for this line.
    #[serde(default)]
    pub extra_cost: Decimal,
    /// Lifting cost for this line.
    #[serde(default)]
    pub lifting_cost: Decimal,
    /// Empty-container return depot.
    #[serde(default)]
    pub empty_depot: String,
}

/// Carrier reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    /// Unique identifier.
    pub id: Uuid,
    /// Carrier company name.
    pub name: String,
    /// Tax registration code.
    pub tax_code: String,
    /// Internal lookup key.
    pub key: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A logistics booking with its embedded attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckingRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Carrier name.
    pub carrier: String,
    /// Customer name.
    pub customer: String,
    /// Staff member handling the booking.
    pub handler: String,
    /// Booking reference.
    pub booking: String,
    /// Free-form notes.
    pub notes: String,
    /// Container lines, ordered, owned by this record.
    pub containers: Vec<ContainerLine>,
    /// Base cost.
    pub cost: Decimal,
    /// Extra cost.
    pub extra_cost: Decimal,
    /// Lifting cost.
    pub lifting_cost: Decimal,
    /// Revenue.
    pub revenue: Decimal,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Single-slot lifting invoice attachment; replaced wholesale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifting_invoice: Option<AttachmentRef>,
    /// Ordered, append-only invoice attachments.
    pub invoices: Vec<AttachmentRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a carrier.
#[derive(Debug, Clone)]
pub struct CreateCarrierInput {
    /// Carrier company name.
    pub name: String,
    /// Tax registration code.
    pub tax_code: String,
    /// Internal lookup key.
    pub key: String,
}

/// Input for creating a trucking record.
///
/// The attachment collections are populated by the coordinator after the
/// uploaded bytes have been stored; callers at the boundary leave them
/// empty.
#[derive(Debug, Clone, Default)]
pub struct CreateRecordInput {
    /// Carrier name.
    pub carrier: String,
    /// Customer name.
    pub customer: String,
    /// Staff member handling the booking.
    pub handler: String,
    /// Booking reference.
    pub booking: String,
    /// Free-form notes.
    pub notes: String,
    /// Container lines.
    pub containers: Vec<ContainerLine>,
    /// Base cost.
    pub cost: Decimal,
    /// Extra cost.
    pub extra_cost: Decimal,
    /// Lifting cost.
    pub lifting_cost: Decimal,
    /// Revenue.
    pub revenue: Decimal,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Invoice attachments.
    pub invoices: Vec<AttachmentRef>,
    /// Lifting invoice attachment.
    pub lifting_invoice: Option<AttachmentRef>,
}

/// Partial update for a trucking record.
///
/// `None` leaves the stored value untouched; `Some` overwrites it. The
/// lifting-invoice slot is doubly optional so the coordinator can
/// distinguish "leave alone" from "clear the slot".
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    /// Carrier name.
    pub carrier: Option<String>,
    /// Customer name.
    pub customer: Option<String>,
    /// Staff member handling the booking.
    pub handler: Option<String>,
    /// Booking reference.
    pub booking: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Container lines (full replacement).
    pub containers: Option<Vec<ContainerLine>>,
    /// Base cost.
    pub cost: Option<Decimal>,
    /// Extra cost.
    pub extra_cost: Option<Decimal>,
    /// Lifting cost.
    pub lifting_cost: Option<Decimal>,
    /// Revenue.
    pub revenue: Option<Decimal>,
    /// Payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Invoice attachments (full replacement, set by the coordinator).
    pub invoices: Option<Vec<AttachmentRef>>,
    /// Lifting invoice slot (set by the coordinator).
    pub lifting_invoice: Option<Option<AttachmentRef>>,
}

/// One uploaded file as received at the boundary.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as uploaded.
    pub original_name: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [PaymentStatus::Unpaid, PaymentStatus::Paid] {
            assert_eq!(PaymentStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_payment_status_unknown_reads_unpaid() {
        assert_eq!(PaymentStatus::parse("overdue"), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::parse(""), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_container_line_wire_names() {
        let line = ContainerLine {
            cont_no: "MSKU1234567".to_string(),
            empty_depot: "Depot 3".to_string(),
            ..ContainerLine::default()
        };
        let json = serde_json::to_value(&line).expect("serializes");
        assert_eq!(json["contNo"], "MSKU1234567");
        assert_eq!(json["emptyDepot"], "Depot 3");
    }
}

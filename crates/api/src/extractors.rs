//! Multipart form decoding for record uploads.
//!
//! The record form arrives as multipart/form-data: scalar text fields, a
//! JSON-serialized `containersList`, up to [`MAX_INVOICE_FILES`] files
//! under `invoiceFiles`, and at most one `liftingInvoiceFile`. Unknown
//! fields are ignored; numeric fields read as zero when absent or
//! unparseable.

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use rust_decimal::Decimal;

use crate::error::ApiError;
use haulbook_core::record::{
    ContainerLine, CreateRecordInput, PaymentStatus, RecordUpdate, UploadedFile,
};

/// Upload cap for the multi-slot invoice list.
pub const MAX_INVOICE_FILES: usize = 10;

/// Decoded record form.
#[derive(Debug, Default)]
pub struct RecordForm {
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
    /// Payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Container lines decoded from `containersList`.
    pub containers: Option<Vec<ContainerLine>>,
    /// Base cost; zero when absent or unparseable.
    pub cost: Decimal,
    /// Extra cost; zero when absent or unparseable.
    pub extra_cost: Decimal,
    /// Lifting cost; zero when absent or unparseable.
    pub lifting_cost: Decimal,
    /// Revenue; zero when absent or unparseable.
    pub revenue: Decimal,
    /// Uploaded invoice files in upload order.
    pub invoice_files: Vec<UploadedFile>,
    /// Uploaded lifting invoice file.
    pub lifting_invoice_file: Option<UploadedFile>,
}

impl RecordForm {
    /// Split into creation input plus the uploaded files.
    #[must_use]
    pub fn into_create_parts(self) -> (CreateRecordInput, Vec<UploadedFile>, Option<UploadedFile>) {
        let input = CreateRecordInput {
            carrier: self.carrier.unwrap_or_default(),
            customer: self.customer.unwrap_or_default(),
            handler: self.handler.unwrap_or_default(),
            booking: self.booking.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            containers: self.containers.unwrap_or_default(),
            cost: self.cost,
            extra_cost: self.extra_cost,
            lifting_cost: self.lifting_cost,
            revenue: self.revenue,
            payment_status: self.payment_status.unwrap_or_default(),
            invoices: Vec::new(),
            lifting_invoice: None,
        };
        (input, self.invoice_files, self.lifting_invoice_file)
    }

    /// Split into a partial update plus the uploaded files.
    ///
    /// Text fields are overwritten only when supplied; numeric fields are
    /// always written, defaulting to zero when absent.
    #[must_use]
    pub fn into_update_parts(self) -> (RecordUpdate, Vec<UploadedFile>, Option<UploadedFile>) {
        let update = RecordUpdate {
            carrier: self.carrier,
            customer: self.customer,
            handler: self.handler,
            booking: self.booking,
            notes: self.notes,
            containers: self.containers,
            cost: Some(self.cost),
            extra_cost: Some(self.extra_cost),
            lifting_cost: Some(self.lifting_cost),
            revenue: Some(self.revenue),
            payment_status: self.payment_status,
            invoices: None,
            lifting_invoice: None,
        };
        (update, self.invoice_files, self.lifting_invoice_file)
    }
}

/// Drain a multipart stream into a [`RecordForm`].
///
/// # Errors
///
/// Returns a bad-request error when the stream is malformed, the file
/// limits are exceeded, or `containersList` is not valid JSON.
pub async fn read_record_form(multipart: &mut Multipart) -> Result<RecordForm, ApiError> {
    let mut form = RecordForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "invoiceFiles" => {
                if form.invoice_files.len() >= MAX_INVOICE_FILES {
                    return Err(ApiError::bad_request(format!(
                        "at most {MAX_INVOICE_FILES} invoice files per request"
                    )));
                }
                form.invoice_files.push(read_file(field).await?);
            }
            "liftingInvoiceFile" => {
                if form.lifting_invoice_file.is_some() {
                    return Err(ApiError::bad_request("at most one lifting invoice file"));
                }
                form.lifting_invoice_file = Some(read_file(field).await?);
            }
            "containersList" => {
                let text = read_text(field).await?;
                form.containers = Some(parse_containers(&text)?);
            }
            "carrier" => form.carrier = Some(read_text(field).await?),
            "customer" => form.customer = Some(read_text(field).await?),
            "handler" => form.handler = Some(read_text(field).await?),
            "booking" => form.booking = Some(read_text(field).await?),
            "notes" => form.notes = Some(read_text(field).await?),
            "paymentStatus" => {
                form.payment_status = Some(PaymentStatus::parse(&read_text(field).await?));
            }
            "cost" => form.cost = parse_decimal(&read_text(field).await?),
            "extraCost" => form.extra_cost = parse_decimal(&read_text(field).await?),
            "liftingCost" => form.lifting_cost = parse_decimal(&read_text(field).await?),
            "revenue" => form.revenue = parse_decimal(&read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

/// Parse the JSON-serialized container lines.
fn parse_containers(text: &str) -> Result<Vec<ContainerLine>, ApiError> {
    serde_json::from_str(text)
        .map_err(|e| ApiError::bad_request(format!("invalid containersList: {e}")))
}

/// Parse a form numeric field; absent or unparseable reads as zero.
fn parse_decimal(text: &str) -> Decimal {
    text.trim().parse().unwrap_or_default()
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let original_name = field
        .file_name()
        .map_or_else(|| "upload".to_string(), ToString::to_string);
    let content = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
        .to_vec();

    Ok(UploadedFile {
        original_name,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_defaults_to_zero() {
        assert_eq!(parse_decimal("1500000"), dec!(1500000));
        assert_eq!(parse_decimal(" 12.50 "), dec!(12.50));
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_containers() {
        let lines = parse_containers(
            r#"[{"vehicle":"51C-123.45","contNo":"MSKU1234567","cost":1500000}]"#,
        )
        .expect("parses");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].cont_no, "MSKU1234567");
        assert_eq!(lines[0].cost, dec!(1500000));

        assert!(parse_containers("not json").is_err());
    }

    #[test]
    fn test_into_create_parts_applies_defaults() {
        let form = RecordForm {
            carrier: Some("ABC Logistics".to_string()),
            ..RecordForm::default()
        };
        let (input, files, lifting) = form.into_create_parts();

        assert_eq!(input.carrier, "ABC Logistics");
        assert_eq!(input.customer, "");
        assert_eq!(input.cost, Decimal::ZERO);
        assert_eq!(input.payment_status, PaymentStatus::Unpaid);
        assert!(input.invoices.is_empty());
        assert!(files.is_empty());
        assert!(lifting.is_none());
    }

    #[test]
    fn test_into_update_parts_leaves_unsupplied_text_fields_alone() {
        let form = RecordForm {
            notes: Some("call the depot".to_string()),
            cost: dec!(250000),
            ..RecordForm::default()
        };
        let (update, _, _) = form.into_update_parts();

        assert_eq!(update.notes.as_deref(), Some("call the depot"));
        assert!(update.carrier.is_none());
        // numeric fields are always written, absent reads as zero
        assert_eq!(update.cost, Some(dec!(250000)));
        assert_eq!(update.revenue, Some(Decimal::ZERO));
        // attachment collections are the coordinator's concern
        assert!(update.invoices.is_none());
        assert!(update.lifting_invoice.is_none());
    }
}

//! Attachment lifecycle coordination.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::error::RecordError;
use super::types::{
    Carrier, CreateCarrierInput, CreateRecordInput, RecordUpdate, TruckingRecord, UploadedFile,
};
use crate::storage::{AttachmentRef, AttachmentStore};

/// Repository trait for carrier and trucking-record persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait RecordRepository: Send + Sync {
    /// List carriers sorted by name ascending.
    fn list_carriers(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Carrier>, RecordError>> + Send;

    /// Create a carrier; fails with [`RecordError::Conflict`] when the
    /// `(name, taxCode)` pair already exists.
    fn create_carrier(
        &self,
        input: CreateCarrierInput,
    ) -> impl std::future::Future<Output = Result<Carrier, RecordError>> + Send;

    /// Delete a carrier; an absent id is a silent no-op.
    fn delete_carrier(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), RecordError>> + Send;

    /// List trucking records sorted by creation time descending.
    fn list_records(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TruckingRecord>, RecordError>> + Send;

    /// Fetch one record or [`RecordError::NotFound`].
    fn get_record(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<TruckingRecord, RecordError>> + Send;

    /// Persist a new record.
    fn create_record(
        &self,
        input: CreateRecordInput,
    ) -> impl std::future::Future<Output = Result<TruckingRecord, RecordError>> + Send;

    /// Overwrite only the supplied fields of an existing record, or
    /// [`RecordError::NotFound`].
    fn update_record(
        &self,
        id: Uuid,
        update: RecordUpdate,
    ) -> impl std::future::Future<Output = Result<TruckingRecord, RecordError>> + Send;

    /// Remove a record, returning it so the caller can cascade-delete its
    /// attachments; `None` when it did not exist.
    fn delete_record(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<TruckingRecord>, RecordError>> + Send;
}

/// Coordinates the blob store and the record store so that no reference
/// points at a missing blob and no blob outlives the records that own it.
///
/// Ordering policy: operations that both delete a blob and mutate metadata
/// attempt the blob deletion first and commit the metadata change
/// regardless of the deletion outcome. Cascade delete is the deliberate
/// exception: the record row is removed first (it must vanish from
/// listings immediately) and blob cleanup follows best-effort.
pub struct RecordService<R: RecordRepository> {
    store: Arc<AttachmentStore>,
    repo: Arc<R>,
}

impl<R: RecordRepository> RecordService<R> {
    /// Create a new record service.
    #[must_use]
    pub fn new(store: Arc<AttachmentStore>, repo: Arc<R>) -> Self {
        Self { store, repo }
    }

    /// Create a record, storing any uploaded files first.
    ///
    /// Blobs written before a failed persist become orphans; they are
    /// logged, never silently hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if a blob write or the record persist fails.
    pub async fn create_record(
        &self,
        data: CreateRecordInput,
        invoice_files: Vec<UploadedFile>,
        lifting_file: Option<UploadedFile>,
    ) -> Result<TruckingRecord, RecordError> {
        let mut data = data;
        let mut stored: Vec<String> = Vec::new();

        for file in invoice_files {
            match self.store.store(file.content, &file.original_name).await {
                Ok(r) => {
                    stored.push(r.storage_ref.clone());
                    data.invoices.push(r);
                }
                Err(e) => {
                    log_orphans(&stored);
                    return Err(e.into());
                }
            }
        }

        if let Some(file) = lifting_file {
            match self.store.store(file.content, &file.original_name).await {
                Ok(r) => {
                    stored.push(r.storage_ref.clone());
                    data.lifting_invoice = Some(r);
                }
                Err(e) => {
                    log_orphans(&stored);
                    return Err(e.into());
                }
            }
        }

        match self.repo.create_record(data).await {
            Ok(record) => {
                info!(record_id = %record.id, attachments = stored.len(), "record created");
                Ok(record)
            }
            Err(e) => {
                log_orphans(&stored);
                Err(e)
            }
        }
    }

    /// Amend a record in one pass: overwrite the supplied scalar fields
    /// and containers, append any new invoice files, and replace the
    /// lifting invoice when a new file is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] when the record is absent, or an
    /// error if a blob write or the metadata commit fails.
    pub async fn amend_record(
        &self,
        id: Uuid,
        mut update: RecordUpdate,
        invoice_files: Vec<UploadedFile>,
        lifting_file: Option<UploadedFile>,
    ) -> Result<TruckingRecord, RecordError> {
        let current = self.repo.get_record(id).await?;

        if !invoice_files.is_empty() {
            // Append-only: existing entries keep their order, new refs go
            // at the tail in upload order.
            let mut invoices = current.invoices.clone();
            for file in invoice_files {
                invoices.push(self.store.store(file.content, &file.original_name).await?);
            }
            update.invoices = Some(invoices);
        }

        if let Some(file) = lifting_file {
            let replacement = self.store.store(file.content, &file.original_name).await?;
            if let Some(old) = &current.lifting_invoice {
                // The old blob goes before the metadata commit: a crash in
                // between leaves a detectable dangling reference rather
                // than a silent orphan.
                if let Err(e) = self.store.delete(&old.storage_ref).await {
                    warn!(
                        storage_ref = %old.storage_ref,
                        error = %e,
                        "failed to remove replaced lifting invoice blob"
                    );
                }
            }
            update.lifting_invoice = Some(Some(replacement));
        }

        let record = self.repo.update_record(id, update).await?;
        info!(record_id = %id, "record updated");
        Ok(record)
    }

    /// Append uploaded files to the record's invoice list.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] when the record is absent.
    pub async fn append_files(
        &self,
        id: Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<TruckingRecord, RecordError> {
        self.amend_record(id, RecordUpdate::default(), files, None)
            .await
    }

    /// Replace the single-slot lifting invoice, releasing the previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] when the record is absent.
    pub async fn replace_lifting_invoice(
        &self,
        id: Uuid,
        file: UploadedFile,
    ) -> Result<TruckingRecord, RecordError> {
        self.amend_record(id, RecordUpdate::default(), Vec::new(), Some(file))
            .await
    }

    /// Remove one attachment from a record by storage reference.
    ///
    /// The blob deletion is idempotent and the reference is dropped from
    /// whichever slot holds it. A reference matching neither slot persists
    /// the record unchanged - success, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] when the record is absent.
    pub async fn remove_file(
        &self,
        id: Uuid,
        storage_ref: &str,
    ) -> Result<TruckingRecord, RecordError> {
        let current = self.repo.get_record(id).await?;

        // Blob first; the metadata commit below happens regardless.
        if let Err(e) = self.store.delete(storage_ref).await {
            warn!(
                storage_ref,
                error = %e,
                "failed to remove blob; dropping the reference anyway"
            );
        }

        let invoices: Vec<AttachmentRef> = current
            .invoices
            .iter()
            .filter(|r| r.storage_ref != storage_ref)
            .cloned()
            .collect();
        let lifting_invoice = match &current.lifting_invoice {
            Some(r) if r.storage_ref == storage_ref => None,
            other => other.clone(),
        };

        let update = RecordUpdate {
            invoices: Some(invoices),
            lifting_invoice: Some(lifting_invoice),
            ..RecordUpdate::default()
        };
        let record = self.repo.update_record(id, update).await?;
        info!(record_id = %id, storage_ref, "attachment removed");
        Ok(record)
    }

    /// Delete a record and cascade-delete every blob it owned.
    ///
    /// The record row is removed first so it vanishes from listings
    /// immediately; blob cleanup follows best-effort, logging individual
    /// failures without aborting. Returns the removed record, or `None`
    /// when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only when the metadata delete itself fails.
    pub async fn delete_record(&self, id: Uuid) -> Result<Option<TruckingRecord>, RecordError> {
        let Some(record) = self.repo.delete_record(id).await? else {
            return Ok(None);
        };

        for r in record
            .invoices
            .iter()
            .chain(record.lifting_invoice.iter())
        {
            if let Err(e) = self.store.delete(&r.storage_ref).await {
                warn!(
                    storage_ref = %r.storage_ref,
                    error = %e,
                    "failed to remove blob during cascade delete"
                );
            }
        }

        info!(record_id = %id, "record deleted");
        Ok(Some(record))
    }
}

/// Log blobs stranded by a failed record commit.
fn log_orphans(stored: &[String]) {
    for storage_ref in stored {
        warn!(%storage_ref, "blob orphaned by failed record commit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PaymentStatus;
    use crate::storage::{StorageConfig, StorageProvider};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Mock repository for testing.
    struct MockRecordRepository {
        carriers: Mutex<Vec<Carrier>>,
        records: Mutex<HashMap<Uuid, TruckingRecord>>,
        fail_next_create: AtomicBool,
        fail_next_update: AtomicBool,
    }

    impl MockRecordRepository {
        fn new() -> Self {
            Self {
                carriers: Mutex::new(Vec::new()),
                records: Mutex::new(HashMap::new()),
                fail_next_create: AtomicBool::new(false),
                fail_next_update: AtomicBool::new(false),
            }
        }
    }

    impl RecordRepository for MockRecordRepository {
        async fn list_carriers(&self) -> Result<Vec<Carrier>, RecordError> {
            let mut carriers = self.carriers.lock().unwrap().clone();
            carriers.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(carriers)
        }

        async fn create_carrier(&self, input: CreateCarrierInput) -> Result<Carrier, RecordError> {
            let mut carriers = self.carriers.lock().unwrap();
            if carriers
                .iter()
                .any(|c| c.name == input.name && c.tax_code == input.tax_code)
            {
                return Err(RecordError::conflict(input.name));
            }
            let carrier = Carrier {
                id: Uuid::new_v4(),
                name: input.name,
                tax_code: input.tax_code,
                key: input.key,
                created_at: chrono::Utc::now(),
            };
            carriers.push(carrier.clone());
            Ok(carrier)
        }

        async fn delete_carrier(&self, id: Uuid) -> Result<(), RecordError> {
            self.carriers.lock().unwrap().retain(|c| c.id != id);
            Ok(())
        }

        async fn list_records(&self) -> Result<Vec<TruckingRecord>, RecordError> {
            let mut records: Vec<TruckingRecord> =
                self.records.lock().unwrap().values().cloned().collect();
            records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(records)
        }

        async fn get_record(&self, id: Uuid) -> Result<TruckingRecord, RecordError> {
            self.records
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(RecordError::NotFound(id))
        }

        async fn create_record(
            &self,
            input: CreateRecordInput,
        ) -> Result<TruckingRecord, RecordError> {
            if self.fail_next_create.swap(false, Ordering::SeqCst) {
                return Err(RecordError::persistence("injected create failure"));
            }
            let record = TruckingRecord {
                id: Uuid::new_v4(),
                carrier: input.carrier,
                customer: input.customer,
                handler: input.handler,
                booking: input.booking,
                notes: input.notes,
                containers: input.containers,
                cost: input.cost,
                extra_cost: input.extra_cost,
                lifting_cost: input.lifting_cost,
                revenue: input.revenue,
                payment_status: input.payment_status,
                lifting_invoice: input.lifting_invoice,
                invoices: input.invoices,
                created_at: chrono::Utc::now(),
            };
            self.records
                .lock()
                .unwrap()
                .insert(record.id, record.clone());
            Ok(record)
        }

        async fn update_record(
            &self,
            id: Uuid,
            update: RecordUpdate,
        ) -> Result<TruckingRecord, RecordError> {
            if self.fail_next_update.swap(false, Ordering::SeqCst) {
                return Err(RecordError::persistence("injected update failure"));
            }
            let mut records = self.records.lock().unwrap();
            let record = records.get_mut(&id).ok_or(RecordError::NotFound(id))?;
            if let Some(v) = update.carrier {
                record.carrier = v;
            }
            if let Some(v) = update.customer {
                record.customer = v;
            }
            if let Some(v) = update.handler {
                record.handler = v;
            }
            if let Some(v) = update.booking {
                record.booking = v;
            }
            if let Some(v) = update.notes {
                record.notes = v;
            }
            if let Some(v) = update.containers {
                record.containers = v;
            }
            if let Some(v) = update.cost {
                record.cost = v;
            }
            if let Some(v) = update.extra_cost {
                record.extra_cost = v;
            }
            if let Some(v) = update.lifting_cost {
                record.lifting_cost = v;
            }
            if let Some(v) = update.revenue {
                record.revenue = v;
            }
            if let Some(v) = update.payment_status {
                record.payment_status = v;
            }
            if let Some(v) = update.invoices {
                record.invoices = v;
            }
            if let Some(v) = update.lifting_invoice {
                record.lifting_invoice = v;
            }
            Ok(record.clone())
        }

        async fn delete_record(&self, id: Uuid) -> Result<Option<TruckingRecord>, RecordError> {
            Ok(self.records.lock().unwrap().remove(&id))
        }
    }

    fn temp_store() -> Arc<AttachmentStore> {
        let root = std::env::temp_dir().join(format!("haulbook-lifecycle-{}", Uuid::new_v4()));
        let config = StorageConfig::new(StorageProvider::local_fs(root));
        Arc::new(AttachmentStore::from_config(config).expect("should create store"))
    }

    fn setup() -> (
        RecordService<MockRecordRepository>,
        Arc<MockRecordRepository>,
        Arc<AttachmentStore>,
    ) {
        let store = temp_store();
        let repo = Arc::new(MockRecordRepository::new());
        let service = RecordService::new(store.clone(), repo.clone());
        (service, repo, store)
    }

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            content: name.as_bytes().to_vec(),
        }
    }

    fn booking_input() -> CreateRecordInput {
        CreateRecordInput {
            carrier: "ABC Logistics".to_string(),
            customer: "Northwind".to_string(),
            booking: "BK-1042".to_string(),
            ..CreateRecordInput::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_attachments() {
        let (service, _repo, store) = setup();

        let record = service
            .create_record(
                booking_input(),
                vec![upload("inv-1.pdf"), upload("inv-2.pdf")],
                None,
            )
            .await
            .unwrap();

        assert_eq!(record.invoices.len(), 2);
        assert!(record.lifting_invoice.is_none());
        assert_eq!(record.invoices[0].original_name, "inv-1.pdf");
        assert_eq!(record.invoices[1].original_name, "inv-2.pdf");
        for r in &record.invoices {
            assert!(store.exists(&r.storage_ref).await);
        }
    }

    #[tokio::test]
    async fn test_create_persist_failure_leaves_logged_orphans() {
        let (service, repo, store) = setup();
        repo.fail_next_create.store(true, Ordering::SeqCst);

        let err = service
            .create_record(booking_input(), vec![upload("inv-1.pdf")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Persistence(_)));

        // the blob written before the failed commit is orphaned, not
        // rolled back
        assert!(repo.records.lock().unwrap().is_empty());
        let orphans = std::fs::read_dir(
            store
                .config()
                .provider
                .local_root()
                .expect("local test store"),
        )
        .map(|d| d.count())
        .unwrap_or(0);
        assert_eq!(orphans, 1);
    }

    #[tokio::test]
    async fn test_append_files_preserves_order() {
        let (service, _repo, store) = setup();
        let record = service
            .create_record(
                booking_input(),
                vec![upload("first.pdf"), upload("second.pdf")],
                None,
            )
            .await
            .unwrap();
        let before = record.invoices.clone();

        let updated = service
            .append_files(record.id, vec![upload("third.pdf"), upload("fourth.pdf")])
            .await
            .unwrap();

        assert_eq!(updated.invoices.len(), 4);
        assert_eq!(&updated.invoices[..2], &before[..]);
        assert_eq!(updated.invoices[2].original_name, "third.pdf");
        assert_eq!(updated.invoices[3].original_name, "fourth.pdf");
        for r in &updated.invoices {
            assert!(store.exists(&r.storage_ref).await);
        }
    }

    #[tokio::test]
    async fn test_append_files_missing_record() {
        let (service, _repo, _store) = setup();
        let err = service
            .append_files(Uuid::new_v4(), vec![upload("inv.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_replace_lifting_invoice_releases_old_blob() {
        let (service, _repo, store) = setup();
        let record = service
            .create_record(booking_input(), Vec::new(), Some(upload("lift-old.pdf")))
            .await
            .unwrap();
        let old_ref = record.lifting_invoice.clone().unwrap();

        let updated = service
            .replace_lifting_invoice(record.id, upload("lift-new.pdf"))
            .await
            .unwrap();

        let new_ref = updated.lifting_invoice.unwrap();
        assert_eq!(new_ref.original_name, "lift-new.pdf");
        assert_ne!(new_ref.storage_ref, old_ref.storage_ref);
        assert!(store.exists(&new_ref.storage_ref).await);
        assert!(!store.exists(&old_ref.storage_ref).await);
    }

    #[tokio::test]
    async fn test_replace_lifting_invoice_failed_commit_leaves_dangling_ref() {
        // The one documented exception to "no dangling refs": the old blob
        // is released before the metadata commit, so a failed commit
        // leaves the stored record pointing at a missing blob.
        let (service, repo, store) = setup();
        let record = service
            .create_record(booking_input(), Vec::new(), Some(upload("lift-old.pdf")))
            .await
            .unwrap();
        let old_ref = record.lifting_invoice.clone().unwrap();

        repo.fail_next_update.store(true, Ordering::SeqCst);
        let err = service
            .replace_lifting_invoice(record.id, upload("lift-new.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Persistence(_)));

        let stored = repo.get_record(record.id).await.unwrap();
        let dangling = stored.lifting_invoice.unwrap();
        assert_eq!(dangling.storage_ref, old_ref.storage_ref);
        assert!(!store.exists(&dangling.storage_ref).await);
    }

    #[tokio::test]
    async fn test_remove_one_file_keeps_the_others() {
        let (service, _repo, store) = setup();
        let record = service
            .create_record(
                booking_input(),
                vec![upload("keep-a.pdf"), upload("drop.pdf"), upload("keep-b.pdf")],
                Some(upload("lift.pdf")),
            )
            .await
            .unwrap();
        let target = record.invoices[1].clone();

        let updated = service.remove_file(record.id, &target.storage_ref).await.unwrap();

        assert_eq!(updated.invoices.len(), 2);
        assert_eq!(updated.invoices[0].original_name, "keep-a.pdf");
        assert_eq!(updated.invoices[1].original_name, "keep-b.pdf");
        assert!(!store.exists(&target.storage_ref).await);
        for r in updated
            .invoices
            .iter()
            .chain(updated.lifting_invoice.iter())
        {
            assert!(store.exists(&r.storage_ref).await);
        }
    }

    #[tokio::test]
    async fn test_remove_file_clears_matching_lifting_slot() {
        let (service, _repo, store) = setup();
        let record = service
            .create_record(booking_input(), Vec::new(), Some(upload("lift.pdf")))
            .await
            .unwrap();
        let lifting = record.lifting_invoice.clone().unwrap();

        let updated = service.remove_file(record.id, &lifting.storage_ref).await.unwrap();

        assert!(updated.lifting_invoice.is_none());
        assert!(!store.exists(&lifting.storage_ref).await);
    }

    #[tokio::test]
    async fn test_remove_file_unmatched_ref_is_silent_noop() {
        let (service, _repo, _store) = setup();
        let record = service
            .create_record(booking_input(), vec![upload("inv.pdf")], None)
            .await
            .unwrap();

        let updated = service
            .remove_file(record.id, "1700000000000-ghost.pdf")
            .await
            .unwrap();

        assert_eq!(updated.invoices, record.invoices);
        assert_eq!(updated.lifting_invoice, record.lifting_invoice);
    }

    #[tokio::test]
    async fn test_remove_file_twice_is_idempotent() {
        let (service, _repo, _store) = setup();
        let record = service
            .create_record(booking_input(), vec![upload("inv.pdf")], None)
            .await
            .unwrap();
        let target = record.invoices[0].clone();

        let first = service.remove_file(record.id, &target.storage_ref).await.unwrap();
        assert!(first.invoices.is_empty());

        let second = service.remove_file(record.id, &target.storage_ref).await.unwrap();
        assert!(second.invoices.is_empty());
    }

    #[tokio::test]
    async fn test_cascade_delete_reclaims_every_blob() {
        let (service, repo, store) = setup();
        let record = service
            .create_record(
                booking_input(),
                vec![upload("inv-1.pdf"), upload("inv-2.pdf")],
                Some(upload("lift.pdf")),
            )
            .await
            .unwrap();
        let refs: Vec<String> = record
            .invoices
            .iter()
            .chain(record.lifting_invoice.iter())
            .map(|r| r.storage_ref.clone())
            .collect();

        let removed = service.delete_record(record.id).await.unwrap();
        assert_eq!(removed.map(|r| r.id), Some(record.id));

        assert!(repo.list_records().await.unwrap().is_empty());
        for storage_ref in &refs {
            assert!(!store.exists(storage_ref).await);
        }
    }

    #[tokio::test]
    async fn test_cascade_delete_tolerates_already_missing_blobs() {
        let (service, repo, store) = setup();
        let record = service
            .create_record(booking_input(), vec![upload("inv.pdf")], None)
            .await
            .unwrap();

        // blob vanished out from under us; the delete must still succeed
        store.delete(&record.invoices[0].storage_ref).await.unwrap();

        let removed = service.delete_record(record.id).await.unwrap();
        assert!(removed.is_some());
        assert!(repo.list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cascade_delete_absent_record() {
        let (service, _repo, _store) = setup();
        assert!(service.delete_record(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_amend_overwrites_only_supplied_fields() {
        let (service, _repo, _store) = setup();
        let record = service
            .create_record(booking_input(), Vec::new(), None)
            .await
            .unwrap();

        let update = RecordUpdate {
            notes: Some("rescheduled to Friday".to_string()),
            payment_status: Some(PaymentStatus::Paid),
            ..RecordUpdate::default()
        };
        let updated = service
            .amend_record(record.id, update, Vec::new(), None)
            .await
            .unwrap();

        assert_eq!(updated.notes, "rescheduled to Friday");
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.carrier, record.carrier);
        assert_eq!(updated.booking, record.booking);
    }

    #[tokio::test]
    async fn test_interleaved_appends_lose_the_first_write() {
        // Documents the known lost-update hazard: there is no locking, so
        // two interleaved read-modify-write appends on the same record let
        // the second write overwrite the first one's entry.
        let (service, repo, store) = setup();
        let record = service
            .create_record(booking_input(), vec![upload("base.pdf")], None)
            .await
            .unwrap();

        let read_a = repo.get_record(record.id).await.unwrap();
        let read_b = repo.get_record(record.id).await.unwrap();

        let ref_a = store.store(b"a".to_vec(), "a.pdf").await.unwrap();
        let mut invoices_a = read_a.invoices.clone();
        invoices_a.push(ref_a.clone());
        repo.update_record(
            record.id,
            RecordUpdate {
                invoices: Some(invoices_a),
                ..RecordUpdate::default()
            },
        )
        .await
        .unwrap();

        let ref_b = store.store(b"b".to_vec(), "b.pdf").await.unwrap();
        let mut invoices_b = read_b.invoices.clone();
        invoices_b.push(ref_b.clone());
        let last = repo
            .update_record(
                record.id,
                RecordUpdate {
                    invoices: Some(invoices_b),
                    ..RecordUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(!last.invoices.contains(&ref_a));
        assert!(last.invoices.contains(&ref_b));
    }

    #[tokio::test]
    async fn test_carrier_uniqueness() {
        let (_service, repo, _store) = setup();
        let input = CreateCarrierInput {
            name: "ABC Logistics".to_string(),
            tax_code: "0101234567".to_string(),
            key: "abc".to_string(),
        };

        repo.create_carrier(input.clone()).await.unwrap();
        let err = repo.create_carrier(input).await.unwrap_err();
        assert!(matches!(err, RecordError::Conflict(_)));

        let carriers = repo.list_carriers().await.unwrap();
        assert_eq!(carriers.len(), 1);
        assert_eq!(carriers[0].name, "ABC Logistics");
    }

    #[tokio::test]
    async fn test_delete_absent_carrier_is_silent() {
        let (_service, repo, _store) = setup();
        repo.delete_carrier(Uuid::new_v4()).await.unwrap();
    }
}

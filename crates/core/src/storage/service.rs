//! Attachment store implementation using Apache OpenDAL.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use opendal::{ErrorKind, Operator, services};
use serde::{Deserialize, Serialize};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Stable reference to one stored blob, paired with the name the file was
/// uploaded under. Embedded verbatim inside the records that own the blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    /// Globally unique locator into the attachment store.
    pub storage_ref: String,
    /// Original uploaded filename.
    pub original_name: String,
}

/// Durable byte storage for uploaded documents.
///
/// References are minted from a monotonically increasing millisecond stamp
/// combined with a sanitized form of the original filename, so repeated
/// uploads of the same file never collide and an existing blob is never
/// overwritten. All references use `/` separators regardless of platform.
pub struct AttachmentStore {
    operator: Operator,
    config: StorageConfig,
    // last stamp handed out; bumped past "now" when uploads land in the
    // same millisecond
    clock: AtomicI64,
}

impl AttachmentStore {
    /// Create a new attachment store from configuration.
    ///
    /// The storage root is created lazily on first write if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self {
            operator,
            config,
            clock: AtomicI64::new(0),
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Write `content` under a freshly minted reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    pub async fn store(
        &self,
        content: Vec<u8>,
        original_name: &str,
    ) -> Result<AttachmentRef, StorageError> {
        let key = self.mint_ref(original_name);

        self.operator
            .write(&key, content)
            .await
            .map_err(StorageError::from)?;

        Ok(AttachmentRef {
            storage_ref: key,
            original_name: original_name.to_string(),
        })
    }

    /// Remove the blob behind `storage_ref`.
    ///
    /// Idempotent: a reference that is already absent is treated as
    /// success, so best-effort cleanup can retry freely.
    ///
    /// # Errors
    ///
    /// Returns an error only for real storage failures, never for a
    /// missing blob.
    pub async fn delete(&self, storage_ref: &str) -> Result<(), StorageError> {
        match self.operator.delete(storage_ref).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Check whether a blob exists for `storage_ref`.
    pub async fn exists(&self, storage_ref: &str) -> bool {
        self.operator.stat(storage_ref).await.is_ok()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Mint a new storage reference for `original_name`.
    ///
    /// Format: `{millis}-{sanitized_filename}`. The stamp is strictly
    /// increasing within the process even when the wall clock repeats a
    /// millisecond, so minted references never collide.
    fn mint_ref(&self, original_name: &str) -> String {
        let stamp = self.next_stamp(Utc::now().timestamp_millis());
        format!("{stamp}-{}", sanitize_filename(original_name))
    }

    /// Advance the minting clock to `max(previous + 1, now_millis)`.
    fn next_stamp(&self, now_millis: i64) -> i64 {
        let prev = self
            .clock
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(prev.max(now_millis - 1) + 1)
            })
            .unwrap_or(now_millis);
        prev.max(now_millis - 1) + 1
    }
}

/// Sanitize filename for use inside a storage reference.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and
/// underscores; everything else becomes `_`.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

//! Blob storage for uploaded documents.
//!
//! Backed by Apache OpenDAL so the same code serves a local uploads
//! directory in development and S3/Azure in production. Every stored blob
//! is addressed by a stable, `/`-separated storage reference.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{AttachmentRef, AttachmentStore};

//! Carriers, trucking records, and the attachment lifecycle.
//!
//! The heart of this module is [`RecordService`], the coordinator that
//! keeps the blob store and the record store mutually consistent across
//! every record mutation: create, append files, replace the lifting
//! invoice, remove one file, and cascade delete.

mod error;
mod service;
mod types;

pub use error::RecordError;
pub use service::{RecordRepository, RecordService};
pub use types::{
    Carrier, ContainerLine, CreateCarrierInput, CreateRecordInput, PaymentStatus, RecordUpdate,
    TruckingRecord, UploadedFile,
};

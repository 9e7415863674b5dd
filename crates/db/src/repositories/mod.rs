//! Repository implementations for data access.

mod record;

pub use record::RecordRepository;

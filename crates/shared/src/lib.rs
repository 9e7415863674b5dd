//! Shared configuration for Haulbook.
//!
//! Layered configuration loading used by the binaries: `config/default`
//! and `config/{RUN_MODE}` files plus `HAULBOOK__`-prefixed environment
//! overrides.

pub mod config;

pub use config::AppConfig;

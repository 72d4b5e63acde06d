//! manual-core - Core types and traits for manual ingestion
//!
//! This crate provides the foundational types, configuration, traits, and
//! error handling shared by the chunking, ingestion and CLI crates.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{ManualError, Result};
pub use traits::*;
pub use types::*;

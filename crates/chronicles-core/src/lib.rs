//! Shared domain types for GUDID Chronicles.
//!
//! Holds the packing-list [`models::Record`], filter criteria and analytics
//! summary types, the crate-wide error enum, field normalizers, serial-date
//! helpers, number formatting and CLI settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{ChroniclesError, Result};

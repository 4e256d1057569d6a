//! Data layer for GUDID Chronicles.
//!
//! Parses packing-list CSV text into normalized [`Record`]s, filters them by
//! supplier / device / delivery-date range, aggregates the result into an
//! [`AnalyticsSummary`] and builds the supplier → device → customer graph.
//!
//! [`Record`]: chronicles_core::models::Record
//! [`AnalyticsSummary`]: chronicles_core::models::AnalyticsSummary

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod graph;
pub mod reader;

pub use chronicles_core as core;

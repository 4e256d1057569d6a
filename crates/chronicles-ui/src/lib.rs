//! Terminal UI layer for GUDID Chronicles.
//!
//! Provides themes, the header and bar-list components, the dashboard and
//! preview views, and the application event loop built on top of
//! [`ratatui`] for browsing packing-list analytics in the terminal.

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;

pub use chronicles_core as core;

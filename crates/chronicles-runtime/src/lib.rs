//! Runtime layer for GUDID Chronicles.
//!
//! Owns the loaded dataset and its memoized analysis, the YAML agent
//! registry, the language-model client and the assistant flows (agent chat,
//! comprehensive report, note keeper) built on top of them.

pub mod activity_log;
pub mod agents;
pub mod assistant;
pub mod context;
pub mod data_manager;
pub mod llm;

pub use chronicles_core as core;
pub use chronicles_data as data;

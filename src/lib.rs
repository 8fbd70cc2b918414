//! TrackMux Library
//!
//! Groups episode files with their sidecars, reconciles their tracks into one
//! operator-approved template and drives MKVToolNix to apply it to a batch.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod matcher;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod reconciler;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{MatchSet, MuxPlan, Track, TrackTemplate, TrackType};
pub use error::{ToolError, ToolResult};

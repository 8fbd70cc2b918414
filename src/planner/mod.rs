//! Output planning - multiplex instructions and post-mux property edits

pub mod mux_plan;
pub mod properties;

pub use mux_plan::MuxPlanCompiler;
pub use properties::PropertyUpdater;

//! Application layer: planning, path resolution, and the action pipeline.

pub mod actions;
pub mod build;
pub mod codeblock;
pub mod pipeline;
pub mod plan;
pub mod replacements;
pub mod resolve;

//! Infrastructure adapters for IO, config, logging, and the asset toolchain.

pub mod config;
pub mod fs;
pub mod highlight;
pub mod logging;
pub mod markdown;
pub mod minify;
pub mod stylesheet;
pub mod svg;

//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - feedback: feedback generation, example search, profile interpretation
//! - index: offline index build
//! - serve: API server
//! - info: configuration display

pub mod feedback;
pub mod index;
pub mod info;
pub mod serve;

// Re-export all public handlers
pub use feedback::*;
pub use index::*;
pub use info::*;
pub use serve::*;

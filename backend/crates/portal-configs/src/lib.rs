//! portal-configs
//!
//! Server configuration types and loader for the portal backend.

pub mod config;

pub use config::defaults;
pub use config::*;

//! Nutritrack Tools module
//!
//! Operations behind the MCP tools.

pub mod dishes;
pub mod health;
pub mod import;
pub mod ingredients;
pub mod status;

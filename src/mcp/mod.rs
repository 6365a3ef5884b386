//! MCP server surface

pub mod server;

pub use server::NutritrackService;

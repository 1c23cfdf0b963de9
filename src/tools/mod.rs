//! LumenDose Tools module
//!
//! MCP tool implementations for drink logging and brain impact analysis.

pub mod drinks;
pub mod impact;
pub mod progress;
pub mod quick_adds;
pub mod status;

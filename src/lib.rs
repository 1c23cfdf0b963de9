//! LumenDose Library
//!
//! Alcohol quantity derivation, brain impact analysis and the drink log store.

pub mod analysis;
pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod volume;

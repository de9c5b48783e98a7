//! Modules layer - Infrastructure components
//!
//! Contains adapters for local infrastructure such as upload storage.

pub mod storage;

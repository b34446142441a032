//! Adapter implementations of the report ports.

pub mod memory;
pub mod postgres;

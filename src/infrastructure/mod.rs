//! Infrastructure layer: persistence adapters for the domain contracts.

pub mod persistence;

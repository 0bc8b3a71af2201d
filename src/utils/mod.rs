//! Helper utilities shared across layers.

pub mod code_generator;
pub mod password;

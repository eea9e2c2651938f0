//! Command implementations

pub mod stack;

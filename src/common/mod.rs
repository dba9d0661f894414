//! Shared application infrastructure.

pub mod config;

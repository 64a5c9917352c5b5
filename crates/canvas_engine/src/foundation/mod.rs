//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Identifiers and their allocator
//! - Time sources
//! - Logging utilities

pub mod math;
pub mod ids;
pub mod time;
pub mod logging;

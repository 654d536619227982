//! Core utilities for the arbor scene graph.
//!
//! This crate provides foundational types and utilities used across the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Timer utilities
//! - Configuration management

mod config;
mod error;
mod logging;
mod timer;

pub use config::{DEFAULT_MAX_POINT_LIGHTS, EngineConfig, SceneConfig};
pub use error::{Error, Result};
pub use logging::{DEFAULT_LOG_FILTER, init_logging, init_logging_with};
pub use timer::Timer;

//! Configuration system for the neogrid renderer.
//!
//! This crate provides configuration loading, saving, and default values
//! for the renderer. It includes:
//!
//! - The `Config` struct and its YAML persistence
//! - Default values for every field
//! - 24-bit color type and normalized-float conversion helpers
//! - Typed configuration errors

pub mod color;
pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use color::{Rgb, color_u8_to_f32, color_u8_to_f32_a};
pub use config::Config;
pub use error::ConfigError;
pub use types::{LogLevel, VsyncMode};

//! Small enum types used by `Config`.

use serde::{Deserialize, Serialize};

/// Surface presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VsyncMode {
    /// Wait for vertical blank (always supported)
    #[default]
    Fifo,
    /// Low-latency triple buffering
    Mailbox,
    /// No synchronization, may tear
    Immediate,
}

#[cfg(feature = "wgpu-types")]
impl VsyncMode {
    /// Convert to the wgpu present mode.
    pub fn to_present_mode(self) -> wgpu::PresentMode {
        match self {
            VsyncMode::Fifo => wgpu::PresentMode::Fifo,
            VsyncMode::Mailbox => wgpu::PresentMode::Mailbox,
            VsyncMode::Immediate => wgpu::PresentMode::Immediate,
        }
    }
}

/// Log verbosity stored in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's level filter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

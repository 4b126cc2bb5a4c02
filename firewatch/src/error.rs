//! Error types for the detection core.

use thiserror::Error;

/// Errors surfaced by frame construction, settings, and configuration loading.
///
/// A frame that is simply not available is not an error; sources report that as `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Frame buffer for {width}x{height} must hold {expected} bytes of RGBA data, got {actual}"
    )]
    InvalidFrame {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Frame dimensions {width}x{height} overflow the addressable buffer size")]
    FrameTooLarge { width: usize, height: usize },

    #[error("Sensitivity level must be 1, 2 or 3, got {0}")]
    InvalidSensitivityLevel(u8),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

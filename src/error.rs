//! Error types for the texture bridge

use thiserror::Error;

use crate::bridge::PaintElement;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the texture bridge
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the browser engine
    #[error("Engine initialization failed: {0}")]
    Initialization(String),

    /// The engine lifecycle was started twice without an intervening stop
    #[error("Engine already started; stop() must be called first")]
    AlreadyStarted,

    /// No native window handle was supplied and none could be resolved
    /// from the host windowing system
    #[error("No native window handle available to anchor the off-screen browser")]
    WindowResolution,

    /// A paint callback carried an element type the bridge does not support
    #[error("Unsupported paint element type: {0:?}")]
    UnsupportedElement(PaintElement),

    /// A paint buffer's byte count disagrees with the current surface
    /// dimensions (a resize raced an in-flight paint)
    #[error("Paint buffer is {actual} bytes but the {width}x{height} surface expects {expected}")]
    PaintShapeMismatch {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },

    /// The browser reported a failed navigation or load
    #[error("Failed to load {url} in frame {frame}: {text} (code {code})")]
    Load {
        frame: String,
        code: i32,
        text: String,
        url: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

//! Error types for newsreel

use crate::Codec;
use thiserror::Error;

/// Result type alias for newsreel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for newsreel operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Codec is not available on this system
    #[error("Codec unavailable: {0}")]
    CodecUnavailable(String),

    /// Codec does not fit the configured output
    #[error("Codec {codec:?} cannot encode {width}x{height}")]
    UnsupportedResolution { codec: Codec, width: u32, height: u32 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Muxing error
    #[error("Muxing error: {0}")]
    Mux(String),

    /// FFmpeg could not be started or talked to
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// External process ran but exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    ProcessFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Duration probing error
    #[error("Probe error: {0}")]
    Probe(String),

    /// Configuration or manifest error
    #[error("Config error: {0}")]
    Config(String),
}

/// Error code for FFI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum ErrorCode {
    /// Success
    Ok = 0,
    /// Invalid input parameter
    InvalidInput = 1,
    /// Codec not available
    CodecUnavailable = 2,
    /// Configuration error
    ConfigError = 3,
    /// I/O error
    IoError = 4,
    /// Encoding error
    EncodeError = 5,
    /// Decoding error
    DecodeError = 6,
    /// Muxing or external process error
    MuxError = 7,
}

impl From<&Error> for ErrorCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidInput(_) => ErrorCode::InvalidInput,
            Error::CodecUnavailable(_) => ErrorCode::CodecUnavailable,
            Error::UnsupportedResolution { .. } => ErrorCode::ConfigError,
            Error::Config(_) => ErrorCode::ConfigError,
            Error::Io(_) => ErrorCode::IoError,
            Error::Image(_) => ErrorCode::DecodeError,
            Error::Decode(_) => ErrorCode::DecodeError,
            Error::Probe(_) => ErrorCode::DecodeError,
            Error::Encode(_) => ErrorCode::EncodeError,
            Error::Ffmpeg(_) => ErrorCode::EncodeError,
            Error::Mux(_) => ErrorCode::MuxError,
            Error::ProcessFailed { .. } => ErrorCode::MuxError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failure_maps_to_mux_code() {
        let err = Error::ProcessFailed {
            program: "ffmpeg".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "Invalid data found when processing input".to_string(),
        };
        assert_eq!(ErrorCode::from(&err), ErrorCode::MuxError);
        assert!(err.to_string().starts_with("ffmpeg exited with exit status: 1"));
    }
}

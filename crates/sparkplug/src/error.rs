// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.

use crate::codec::CodecError;
use crate::compression::CompressionError;
use crate::message::{CopyError, InvalidTypeError};

/// Errors returned by the Sparkplug payload API.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Value Model Errors
    // ========================================================================
    /// A value does not match its declared data type.
    InvalidType(InvalidTypeError),
    /// A deep copy produced a value that failed validation.
    Copy(CopyError),

    // ========================================================================
    // Compression Errors
    // ========================================================================
    /// Compression algorithm unknown or not registered.
    UnsupportedAlgorithm(String),
    /// Compressed body is corrupt, truncated, or empty.
    Format(String),

    // ========================================================================
    // Encoding Errors
    // ========================================================================
    /// Binary payload encoding or decoding failed.
    Codec(CodecError),
    /// JSON text could not be parsed or produced.
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidType(e) => write!(f, "{}", e),
            Error::Copy(e) => write!(f, "{}", e),
            Error::UnsupportedAlgorithm(name) => {
                write!(f, "Unsupported compression algorithm: {}", name)
            }
            Error::Format(msg) => write!(f, "Invalid compressed data: {}", msg),
            Error::Codec(e) => write!(f, "Payload codec error: {}", e),
            #[cfg(feature = "json")]
            Error::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidType(e) => Some(e),
            Error::Copy(e) => Some(e),
            Error::Codec(e) => Some(e),
            #[cfg(feature = "json")]
            Error::Json(e) => Some(e),
            Error::UnsupportedAlgorithm(_) | Error::Format(_) => None,
        }
    }
}

impl From<InvalidTypeError> for Error {
    fn from(e: InvalidTypeError) -> Self {
        Error::InvalidType(e)
    }
}

impl From<CopyError> for Error {
    fn from(e: CopyError) -> Self {
        Error::Copy(e)
    }
}

impl From<CompressionError> for Error {
    fn from(e: CompressionError) -> Self {
        match e {
            CompressionError::UnsupportedAlgorithm(name) => Error::UnsupportedAlgorithm(name),
            CompressionError::Format(msg) => Error::Format(msg),
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::InvalidType(e) => Error::InvalidType(e),
            other => Error::Codec(other),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// Result type for the Sparkplug payload API.
pub type Result<T> = std::result::Result<T, Error>;

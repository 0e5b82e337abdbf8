//! Error types shared across the crate.
//!
//! Hashing itself is total: every byte sequence is valid input. Errors only come from the
//! boundary around the engine, i.e. caller-supplied buffers and digest strings.

use thiserror::Error;

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The caller-supplied output buffer cannot hold the hex digest.
    #[error("output buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    /// A digest string was not 32 valid hex characters.
    #[error("invalid digest: {0}")]
    InvalidDigest(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::BufferTooSmall {
            required: 32,
            actual: 16,
        };
        assert_eq!(err.to_string(), "output buffer too small: need 32 bytes, got 16");

        let err: Error = hex::FromHexError::InvalidStringLength.into();
        assert_eq!(err, Error::InvalidDigest(hex::FromHexError::InvalidStringLength));
        assert!(err.to_string().starts_with("invalid digest: "));
    }
}

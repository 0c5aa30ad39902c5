// Error Types
// Errors raised by key generation, the codec and the protocol roles

use thiserror::Error;

/// Errors produced by the RSA engine and the protocol roles
#[derive(Debug, Error)]
pub enum RsaError {
    /// No modular inverse of the public exponent exists for the sampled primes
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("invalid key size: {bits} bits (must be even and at least {min})")]
    InvalidKeySize { bits: u32, min: u32 },

    /// A decimal string is not a valid non-negative numeral
    #[error("invalid decimal numeral: {0:?}")]
    Parse(String),

    /// A wire payload is malformed
    #[error("malformed payload: {0}")]
    Protocol(String),

    #[error("secure random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),

    #[error("modulus must be at least 1")]
    InvalidModulus,
}

impl RsaError {
    /// Whether the error should be reported to a peer as an unprocessable request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RsaError::Parse(_) | RsaError::Protocol(_) | RsaError::InvalidModulus
        )
    }
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(RsaError::Protocol("missing delimiter".to_string()).is_client_error());
        assert!(RsaError::Parse("abc".to_string()).is_client_error());
        assert!(!RsaError::KeyGeneration("no inverse".to_string()).is_client_error());
        assert!(!RsaError::InvalidKeySize { bits: 8, min: 16 }.is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = RsaError::Parse("12a".to_string());
        assert_eq!(err.to_string(), "invalid decimal numeral: \"12a\"");
    }
}

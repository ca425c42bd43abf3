//! Error types for the identity spoofing resolver
//!
//! Only two failure modes exist at runtime:
//! - Missing attributes, which are logged and skipped while applying overrides
//! - Blocked attestation, a deliberate denial surfaced to the host
//!
//! Configuration decoding adds a third kind for callers that load JSON
//! explicitly. Everything else in the crate is total.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::identity::Attribute;

pub type Result<T> = std::result::Result<T, SpoofError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Identity errors (1xx)
    MissingAttribute = 100,

    // Attestation errors (2xx)
    AttestationBlocked = 200,

    // Configuration errors (8xx)
    ConfigError = 800,
}

/// Main error type for the resolver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpoofError {
    #[error("Failed to set prop {attribute}: not present on host identity")]
    MissingAttribute { attribute: Attribute },

    /// Worded like the host's own unsupported-operation failure so callers
    /// cannot tell the veto apart from a missing implementation.
    #[error("Unsupported operation")]
    AttestationBlocked,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SpoofError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            SpoofError::MissingAttribute { .. } => ErrorCode::MissingAttribute,
            SpoofError::AttestationBlocked => ErrorCode::AttestationBlocked,
            SpoofError::InvalidConfig(_) => ErrorCode::ConfigError,
        }
    }

    /// Whether this error is swallowed after logging instead of reaching the caller
    pub fn is_logged_only(&self) -> bool {
        matches!(self, SpoofError::MissingAttribute { .. })
    }

    /// Whether this error is an intentional denial rather than a fault
    pub fn is_deliberate(&self) -> bool {
        matches!(self, SpoofError::AttestationBlocked)
    }
}

impl From<serde_json::Error> for SpoofError {
    fn from(err: serde_json::Error) -> Self {
        SpoofError::InvalidConfig(err.to_string())
    }
}

impl From<SpoofError> for JsValue {
    fn from(err: SpoofError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Error information for JavaScript consumption
#[derive(Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
    pub is_deliberate: bool,
}

impl From<&SpoofError> for ErrorInfo {
    fn from(err: &SpoofError) -> Self {
        ErrorInfo {
            code: err.code() as u32,
            message: err.to_string(),
            is_deliberate: err.is_deliberate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SpoofError::MissingAttribute {
                attribute: Attribute::Model
            }
            .code(),
            ErrorCode::MissingAttribute
        );
        assert_eq!(
            SpoofError::AttestationBlocked.code(),
            ErrorCode::AttestationBlocked
        );
        assert_eq!(
            SpoofError::InvalidConfig("bad".into()).code(),
            ErrorCode::ConfigError
        );
    }

    #[test]
    fn test_error_classification() {
        let missing = SpoofError::MissingAttribute {
            attribute: Attribute::Fingerprint,
        };
        assert!(missing.is_logged_only());
        assert!(!missing.is_deliberate());

        assert!(SpoofError::AttestationBlocked.is_deliberate());
        assert!(!SpoofError::AttestationBlocked.is_logged_only());
    }

    #[test]
    fn test_blocked_message_is_generic() {
        assert_eq!(
            SpoofError::AttestationBlocked.to_string(),
            "Unsupported operation"
        );
    }

    #[test]
    fn test_missing_attribute_names_the_prop() {
        let err = SpoofError::MissingAttribute {
            attribute: Attribute::VendorProductDevice,
        };
        assert!(err.to_string().contains("vendor.product.device"));
    }

    #[test]
    fn test_error_info() {
        let info = ErrorInfo::from(&SpoofError::AttestationBlocked);
        assert_eq!(info.code, 200);
        assert!(info.is_deliberate);
    }
}

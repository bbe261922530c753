//! Stable error codes surfaced to callers that need machine-readable failures.

pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const INVALID_DURATION: &str = "INVALID_DURATION";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";

/// Maps an error to a stable string code.
pub trait MpErrorCode {
    fn error_code(&self) -> &'static str;
}

//! Error types for the statistics engine.
//! One error enum, a stable code per variant, and a result alias.

pub mod error_code;
pub mod mp_error;

pub use error_code::MpErrorCode;
pub use mp_error::{MpError, MpResult};

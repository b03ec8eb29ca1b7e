//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use waitroom_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::InvalidState(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waitroom_core::domain::DomainError;

    #[test]
    fn test_invalid_action_is_validation_error() {
        let err = to_rpc_error(AppError::Domain(DomainError::InvalidActionKind(
            "teleport".to_string(),
        )));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert!(err.message().contains("teleport"));
    }

    #[test]
    fn test_config_error_is_internal() {
        let err = to_rpc_error(AppError::Config("bad tick interval".to_string()));
        assert_eq!(err.code(), code::INTERNAL_ERROR);
        assert_eq!(err.message(), "bad tick interval");
    }

    #[test]
    fn test_invalid_state_is_conflict() {
        let err = to_rpc_error(AppError::InvalidState("no runtime".to_string()));
        assert_eq!(err.code(), code::CONFLICT);
    }
}

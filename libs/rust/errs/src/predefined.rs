//! Platform-wide error codes.
//!
//! Each code has a constructor returning a fresh [`CodeError`] named after
//! it, ready for `with_detail` or `wrap_msg`.

use crate::CodeError;

/// Unexpected server-side failure.
pub const SERVER_INTERNAL_ERROR: i32 = 500;
/// Invalid input arguments.
pub const ARGS_ERROR: i32 = 1001;
/// Caller lacks permission.
pub const NO_PERMISSION_ERROR: i32 = 1002;
/// Unique key already exists.
pub const DUPLICATE_KEY_ERROR: i32 = 1003;
/// Record does not exist.
pub const RECORD_NOT_FOUND_ERROR: i32 = 1004;
/// Token has expired.
pub const TOKEN_EXPIRED_ERROR: i32 = 1501;
/// Token failed validation.
pub const TOKEN_INVALID_ERROR: i32 = 1502;
/// Token is malformed.
pub const TOKEN_MALFORMED_ERROR: i32 = 1503;
/// Token is not valid yet.
pub const TOKEN_NOT_VALID_YET_ERROR: i32 = 1504;
/// Token failed for an unknown reason.
pub const TOKEN_UNKNOWN_ERROR: i32 = 1505;
/// Token was kicked out by a newer session.
pub const TOKEN_KICKED_ERROR: i32 = 1506;
/// Token does not exist.
pub const TOKEN_NOT_EXIST_ERROR: i32 = 1507;
/// Organization user lacks permission.
pub const ORG_USER_NO_PERMISSION_ERROR: i32 = 1520;

/// `500 ServerInternalError`
#[must_use]
pub fn internal_server() -> CodeError {
    CodeError::new(SERVER_INTERNAL_ERROR, "ServerInternalError")
}

/// `1001 ArgsError`
#[must_use]
pub fn args() -> CodeError {
    CodeError::new(ARGS_ERROR, "ArgsError")
}

/// `1002 NoPermissionError`
#[must_use]
pub fn no_permission() -> CodeError {
    CodeError::new(NO_PERMISSION_ERROR, "NoPermissionError")
}

/// `1003 DuplicateKeyError`
#[must_use]
pub fn duplicate_key() -> CodeError {
    CodeError::new(DUPLICATE_KEY_ERROR, "DuplicateKeyError")
}

/// `1004 RecordNotFoundError`
#[must_use]
pub fn record_not_found() -> CodeError {
    CodeError::new(RECORD_NOT_FOUND_ERROR, "RecordNotFoundError")
}

/// `1501 TokenExpiredError`
#[must_use]
pub fn token_expired() -> CodeError {
    CodeError::new(TOKEN_EXPIRED_ERROR, "TokenExpiredError")
}

/// `1502 TokenInvalidError`
#[must_use]
pub fn token_invalid() -> CodeError {
    CodeError::new(TOKEN_INVALID_ERROR, "TokenInvalidError")
}

/// `1503 TokenMalformedError`
#[must_use]
pub fn token_malformed() -> CodeError {
    CodeError::new(TOKEN_MALFORMED_ERROR, "TokenMalformedError")
}

/// `1504 TokenNotValidYetError`
#[must_use]
pub fn token_not_valid_yet() -> CodeError {
    CodeError::new(TOKEN_NOT_VALID_YET_ERROR, "TokenNotValidYetError")
}

/// `1505 TokenUnknownError`
#[must_use]
pub fn token_unknown() -> CodeError {
    CodeError::new(TOKEN_UNKNOWN_ERROR, "TokenUnknownError")
}

/// `1506 TokenKickedError`
#[must_use]
pub fn token_kicked() -> CodeError {
    CodeError::new(TOKEN_KICKED_ERROR, "TokenKickedError")
}

/// `1507 TokenNotExistError`
#[must_use]
pub fn token_not_exist() -> CodeError {
    CodeError::new(TOKEN_NOT_EXIST_ERROR, "TokenNotExistError")
}

/// `1520 OrgUserNoPermissionError`
#[must_use]
pub fn org_user_no_permission() -> CodeError {
    CodeError::new(ORG_USER_NO_PERMISSION_ERROR, "OrgUserNoPermissionError")
}

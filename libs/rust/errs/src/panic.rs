//! Conversion of caught panics into coded errors.

use std::any::Any;
use std::panic::{self, UnwindSafe};

use crate::predefined::SERVER_INTERNAL_ERROR;
use crate::{CodeError, StackError};

const PANIC_MSG: &str = "panic error";

/// Convert a panic payload into `500 panic error <payload>`.
#[inline(never)]
#[must_use]
pub fn from_panic(payload: &(dyn Any + Send)) -> StackError {
    panic_error(payload, SERVER_INTERNAL_ERROR, PANIC_MSG, 2)
}

/// Convert a panic payload into a coded error with the given code and
/// message; the payload text becomes the detail.
#[inline(never)]
#[must_use]
pub fn from_panic_with(payload: &(dyn Any + Send), code: i32, msg: &str) -> StackError {
    panic_error(payload, code, msg, 2)
}

/// Run `f`, converting a panic into a stack-wrapped coded error.
///
/// ```
/// use platform_errs::catch;
///
/// let err = catch(|| -> u32 { panic!("worker crashed") }).unwrap_err();
/// assert!(err.to_string().contains("500 panic error worker crashed"));
/// ```
///
/// # Errors
///
/// Returns the converted panic if `f` panics.
#[inline(never)]
pub fn catch<F, R>(f: F) -> Result<R, StackError>
where
    F: FnOnce() -> R + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(value) => Ok(value),
        Err(payload) => Err(panic_error(payload.as_ref(), SERVER_INTERNAL_ERROR, PANIC_MSG, 2)),
    }
}

#[inline(never)]
fn panic_error(payload: &(dyn Any + Send), code: i32, msg: &str, skip: usize) -> StackError {
    let detail = payload_text(payload);
    StackError::capture_with(CodeError::with_parts(code, msg, detail), skip)
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseError, find};

    #[test]
    fn test_catch_passes_value_through() {
        let value = catch(|| 41 + 1).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_catch_converts_str_panic() {
        let err = catch(|| panic!("boom")).unwrap_err();
        let code = find::<CodeError>(&err).unwrap();
        assert_eq!(code.code(), SERVER_INTERNAL_ERROR);
        assert_eq!(code.msg(), "panic error");
        assert_eq!(code.detail(), "boom");
    }

    #[test]
    fn test_catch_converts_formatted_panic() {
        let id = 9;
        let err = catch(|| panic!("job {id} failed")).unwrap_err();
        assert_eq!(find::<CodeError>(&err).unwrap().detail(), "job 9 failed");
    }

    #[test]
    fn test_from_panic_with_custom_code() {
        let payload: Box<dyn Any + Send> = Box::new(17_u8);
        let err = from_panic_with(payload.as_ref(), 1001, "worker panic");
        let code = find::<CodeError>(&err).unwrap();
        assert_eq!(code.code(), 1001);
        assert_eq!(code.detail(), "Box<dyn Any>");
        assert!(crate::predefined::args().is(&err));
    }
}

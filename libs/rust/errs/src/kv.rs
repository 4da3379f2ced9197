//! Key/value context rendering.

use std::fmt::{self, Write};

/// Value rendered for a key that has no paired value.
pub const MISSING: &str = "MISSING";

/// Render `msg` followed by flattened key/value pairs.
///
/// The result reads `msg, k1=v1, k2=v2`. A trailing key without a value is
/// rendered as `key=MISSING`. With no pairs, `msg` is returned unchanged.
///
/// ```
/// use platform_errs::kv::render;
///
/// assert_eq!(render("open failed", &[&"path", &"/tmp/a"]), "open failed, path=/tmp/a");
/// assert_eq!(render("", &[&"retries", &3, &"host"]), "retries=3, host=MISSING");
/// ```
#[must_use]
pub fn render(msg: &str, kv: &[&dyn fmt::Display]) -> String {
    if kv.is_empty() {
        return msg.to_string();
    }

    let mut buf = String::from(msg);
    for pair in kv.chunks(2) {
        if !buf.is_empty() {
            buf.push_str(", ");
        }
        let _ = write!(buf, "{}=", pair[0]);
        match pair.get(1) {
            Some(value) => {
                let _ = write!(buf, "{value}");
            }
            None => buf.push_str(MISSING),
        }
    }
    buf
}

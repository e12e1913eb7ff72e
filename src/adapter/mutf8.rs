//! Java modified UTF-8 to standard UTF-8.
//!
//! JNI hands out supplementary characters as two 3-byte surrogate halves and
//! U+0000 as `C0 80`. Commands must reach the executor as plain UTF-8 without
//! interior NULs.

use std::ffi::CString;

use tracing::warn;

/// Decode JNI string bytes into an owned command. `None` for malformed input
/// or an embedded U+0000.
pub fn decode_modified_utf8(bytes: &[u8]) -> Option<CString> {
    let text = match cesu8::from_java_cesu8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!("malformed modified UTF-8: {err:?}");
            return None;
        }
    };
    match CString::new(text.into_owned()) {
        Ok(utf8) => Some(utf8),
        Err(_) => {
            warn!("command contains an embedded NUL");
            None
        }
    }
}

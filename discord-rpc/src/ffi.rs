#![allow(unsafe_code)]
//! Internal FFI utilities: C string helpers.

use std::borrow::Cow;
use std::ffi::{CStr, CString, c_char};
use std::ptr;

use crate::error::{Error, Result};

/// Convert `&str` to `CString` for FFI.
pub(crate) fn to_c_string(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidArgument("string contains NUL".into()))
}

/// Convert optional `&str` to optional `CString`. Empty strings map to `None`.
pub(crate) fn optional_c_string(s: Option<&str>) -> Result<Option<CString>> {
    s.filter(|s| !s.is_empty()).map(to_c_string).transpose()
}

/// Get pointer from an optional `CString` (null if `None`).
pub(crate) fn c_str_ptr(opt: Option<&CString>) -> *const c_char {
    opt.map_or(ptr::null(), |c| c.as_ptr())
}

/// Read a **borrowed** C string. Null reads as empty; invalid UTF-8 is replaced.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string valid for `'a`.
pub(crate) unsafe fn read_borrowed<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        return Cow::Borrowed("");
    }
    let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
    if let Cow::Owned(_) = s {
        tracing::warn!("native string is not valid UTF-8, replaced invalid sequences");
    }
    s
}

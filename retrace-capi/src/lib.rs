//! C ABI for the retrace regular expression engine.
//!
//! Every function returns `-1` on failure and records the reason for the calling thread, retrievable with
//! [`get_last_error_message`] and [`get_last_error_offset`] until the next call on that thread.
//!
//! Matches are written as flat records of `num_groups * 2` integers, a `(start, length)` pair per group with
//! `(-1, -1)` for groups that did not participate. A record is written whole or not at all.
#![allow(clippy::missing_safety_doc)]

#[macro_use]
extern crate log;

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::ffi::{CStr, CString};
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, ensure, Context, Result};
use lazy_static::lazy_static;
use libc::{c_char, c_int, c_uint};

use retrace::{Database, Error, PatternFlags};

struct LastError {
    message: CString,
    offset: c_int,
}

thread_local!(static LAST_ERROR: RefCell<Option<LastError>> = RefCell::new(None));

lazy_static! {
    static ref DATABASES: Mutex<HashMap<u32, Arc<Database>>> = Mutex::new(HashMap::new());
}

static NEXT_HANDLE: AtomicU32 = AtomicU32::new(1);

fn set_last_error(err: &anyhow::Error) {
    let offset = match err.downcast_ref::<Error>() {
        Some(Error::Compile(err)) => err.offset().map_or(-1, |off| off as c_int),
        _ => -1,
    };
    let message = CString::new(format!("{:#}", err).replace('\0', "\\0"))
        .unwrap_or_default();

    debug!("{:#}", err);

    LAST_ERROR.with(|e| *e.borrow_mut() = Some(LastError { message, offset }));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

fn ffi_result(res: Result<c_int>) -> c_int {
    match res {
        Ok(n) => {
            clear_last_error();
            n
        }
        Err(err) => {
            set_last_error(&err);
            -1
        }
    }
}

unsafe fn c_str<'a>(p: *const c_char, what: &str) -> Result<&'a str> {
    ensure!(!p.is_null(), "{} is NULL", what);

    CStr::from_ptr(p)
        .to_str()
        .with_context(|| format!("{} is not valid UTF-8", what))
}

unsafe fn out_buffer<'a>(buf: *mut c_int, size: c_int) -> Result<&'a mut [i32]> {
    ensure!(size >= 0, "negative buffer size {}", size);

    if size == 0 {
        return Ok(&mut []);
    }

    ensure!(!buf.is_null(), "buffer is NULL");

    Ok(slice::from_raw_parts_mut(buf, size as usize))
}

fn lookup(handle: c_int) -> Result<Arc<Database>> {
    let databases = DATABASES.lock().map_err(|_| anyhow!("database registry poisoned"))?;

    u32::try_from(handle)
        .ok()
        .and_then(|handle| databases.get(&handle))
        .cloned()
        .ok_or_else(|| anyhow!("invalid pattern handle {}", handle))
}

fn search(db: &Database, text: &str, max_matches: usize, buf: &mut [i32]) -> Result<c_int> {
    let scanned = db
        .scan_into(text, buf, max_matches)
        .with_context(|| format!("search `{}`", db.as_str()))?;

    trace!("`{}` wrote {} records, {:?}", db.as_str(), scanned.count, scanned.stop);

    Ok(scanned.count as c_int)
}

/// Compile `pattern` and write every non-overlapping match in `text` into `buffer`.
///
/// `buffer_size` is the capacity of `buffer` in integers. The number of groups, including group 0, is stored in
/// `num_groups_out` when it is not NULL and the pattern compiled. Returns the number of matches written.
#[no_mangle]
pub unsafe extern "C" fn match_all(
    pattern: *const c_char,
    text: *const c_char,
    buffer: *mut c_int,
    buffer_size: c_int,
    num_groups_out: *mut c_int,
) -> c_int {
    ffi_result((|| -> Result<c_int> {
        let pattern = c_str(pattern, "pattern")?;
        let text = c_str(text, "text")?;
        let buf = out_buffer(buffer, buffer_size)?;

        let db = Database::compile(pattern, PatternFlags::empty()).with_context(|| format!("compile `{}`", pattern))?;

        if !num_groups_out.is_null() {
            *num_groups_out = db.num_groups() as c_int;
        }

        search(&db, text, usize::MAX, buf)
    })())
}

/// Compile `pattern` with the given flag bits and return a handle to it.
///
/// Flag bits: `1` caseless, `2` extended, `4` multi-line, `8` dot-all.
#[no_mangle]
pub unsafe extern "C" fn retrace_compile(pattern: *const c_char, flags: c_uint) -> c_int {
    ffi_result((|| -> Result<c_int> {
        let pattern = c_str(pattern, "pattern")?;
        let flags = PatternFlags::from_bits(flags).ok_or_else(|| anyhow!("invalid pattern flags {:#x}", flags))?;

        let db = Database::compile(pattern, flags).with_context(|| format!("compile `{}`", pattern))?;

        let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);

        if handle > c_int::MAX as u32 {
            bail!("pattern handles exhausted");
        }

        DATABASES
            .lock()
            .map_err(|_| anyhow!("database registry poisoned"))?
            .insert(handle, Arc::new(db));

        debug!("compiled `{}` as handle {}", pattern, handle);

        Ok(handle as c_int)
    })())
}

/// Returns the number of groups, including group 0, of a compiled pattern.
#[no_mangle]
pub extern "C" fn retrace_num_groups(handle: c_int) -> c_int {
    ffi_result(lookup(handle).map(|db| db.num_groups() as c_int))
}

/// Write up to `max_matches` non-overlapping matches of a compiled pattern in `text` into `buffer`.
///
/// `buffer_size` is the capacity of `buffer` in integers. Returns the number of matches written.
#[no_mangle]
pub unsafe extern "C" fn retrace_search(
    handle: c_int,
    text: *const c_char,
    max_matches: c_int,
    buffer: *mut c_int,
    buffer_size: c_int,
) -> c_int {
    ffi_result((|| -> Result<c_int> {
        let db = lookup(handle)?;
        let text = c_str(text, "text")?;
        let buf = out_buffer(buffer, buffer_size)?;

        ensure!(max_matches >= 0, "negative match limit {}", max_matches);

        search(&db, text, max_matches as usize, buf)
    })())
}

/// Release a compiled pattern.
///
/// Searches already running on the pattern finish normally.
#[no_mangle]
pub extern "C" fn retrace_free(handle: c_int) -> c_int {
    ffi_result((|| -> Result<c_int> {
        let mut databases = DATABASES.lock().map_err(|_| anyhow!("database registry poisoned"))?;

        u32::try_from(handle)
            .ok()
            .and_then(|handle| databases.remove(&handle))
            .map(|_| 0)
            .ok_or_else(|| anyhow!("invalid pattern handle {}", handle))
    })())
}

/// Returns the message of the last failed call on this thread, or NULL.
///
/// The string is owned by the library and stays valid until the next call on this thread.
#[no_mangle]
pub extern "C" fn get_last_error_message() -> *const c_char {
    LAST_ERROR.with(|e| e.borrow().as_ref().map_or(ptr::null(), |e| e.message.as_ptr()))
}

/// Returns the pattern offset of the last failed compile on this thread, or `-1`.
#[no_mangle]
pub extern "C" fn get_last_error_offset() -> c_int {
    LAST_ERROR.with(|e| e.borrow().as_ref().map_or(-1, |e| e.offset))
}

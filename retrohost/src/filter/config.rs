//! The `softfilter_config` accessor table.
//!
//! The host side ([`ConfigUserdata`] and [`accessors`]) answers lookups from a
//! [`ConfigFile`]. The filter side ([`FilterConfig`]) calls back through whatever table it was
//! created with.
use std::alloc::{self, Layout};
use std::ffi::{c_char, c_float, c_int, c_uint, c_void, CStr, CString};
use std::{mem, ptr, slice};

use crate::{
    conf::{self, ConfigFile},
    ffi,
};

/// Filter specific keys of one filter in a config file.
///
/// A key `k` is looked up as `filter{index}_k` first, then as `{short_ident}_k`.
#[derive(Debug, Clone, Copy)]
pub struct ConfigUserdata<'a> {
    conf: &'a ConfigFile,
    index: usize,
    short_ident: &'a str,
}

impl<'a> ConfigUserdata<'a> {
    pub fn new(conf: &'a ConfigFile, index: usize, short_ident: &'a str) -> Self {
        Self {
            conf,
            index,
            short_ident,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.conf
            .get(&format!("filter{}_{}", self.index, key))
            .or_else(|| self.conf.get(&format!("{}_{}", self.short_ident, key)))
    }

    /// The pointer handed to a filter's `create` next to [`accessors`].
    pub fn as_ptr(&self) -> *mut c_void {
        (self as *const Self).cast_mut().cast()
    }
}

/// The accessor table answering lookups for a [`ConfigUserdata`].
pub fn accessors() -> ffi::softfilter_config {
    ffi::softfilter_config {
        get_float: Some(get_float),
        get_int: Some(get_int),
        get_hex: Some(get_hex),
        get_float_array: Some(get_float_array),
        get_int_array: Some(get_int_array),
        get_string: Some(get_string),
        free: Some(free_value),
    }
}

unsafe fn lookup<'a>(userdata: *mut c_void, key: *const c_char) -> Option<&'a str> {
    if userdata.is_null() || key.is_null() {
        return None;
    }
    let key = CStr::from_ptr(key).to_str().ok()?;
    (*userdata.cast::<ConfigUserdata<'a>>()).get(key)
}

unsafe fn answer<T>(out: *mut T, found: Option<T>, default: T) -> c_int {
    let hit = found.is_some();
    if !out.is_null() {
        out.write(found.unwrap_or(default));
    }
    c_int::from(hit)
}

unsafe extern "C" fn get_float(userdata: *mut c_void, key: *const c_char, value: *mut c_float, default: c_float) -> c_int {
    let found = lookup(userdata, key).and_then(|v| v.trim().parse().ok());
    answer(value, found, default)
}

unsafe extern "C" fn get_int(userdata: *mut c_void, key: *const c_char, value: *mut c_int, default: c_int) -> c_int {
    let found = lookup(userdata, key).and_then(|v| v.trim().parse().ok());
    answer(value, found, default)
}

unsafe extern "C" fn get_hex(userdata: *mut c_void, key: *const c_char, value: *mut c_uint, default: c_uint) -> c_int {
    let found = lookup(userdata, key).and_then(conf::parse_hex);
    answer(value, found, default)
}

fn parse_array<T: std::str::FromStr>(value: &str) -> Option<Vec<T>> {
    value.split_whitespace().map(|token| token.parse().ok()).collect()
}

unsafe fn answer_array<T: Copy>(
    values: *mut *mut T,
    out_num: *mut c_uint,
    found: Option<Vec<T>>,
    defaults: *const T,
    num_defaults: c_uint,
) -> c_int {
    let hit = found.is_some();
    let items: &[T] = match &found {
        Some(items) => items,
        None if defaults.is_null() || num_defaults == 0 => &[],
        None => slice::from_raw_parts(defaults, num_defaults as usize),
    };
    let copy = if items.is_empty() { ptr::null_mut() } else { alloc_copy(items) };
    if !values.is_null() {
        values.write(copy);
    }
    if !out_num.is_null() {
        out_num.write(if copy.is_null() { 0 } else { items.len() as c_uint });
    }
    c_int::from(hit)
}

unsafe extern "C" fn get_float_array(
    userdata: *mut c_void,
    key: *const c_char,
    values: *mut *mut c_float,
    out_num: *mut c_uint,
    defaults: *const c_float,
    num_defaults: c_uint,
) -> c_int {
    let found = lookup(userdata, key).and_then(parse_array);
    answer_array(values, out_num, found, defaults, num_defaults)
}

unsafe extern "C" fn get_int_array(
    userdata: *mut c_void,
    key: *const c_char,
    values: *mut *mut c_int,
    out_num: *mut c_uint,
    defaults: *const c_int,
    num_defaults: c_uint,
) -> c_int {
    let found = lookup(userdata, key).and_then(parse_array);
    answer_array(values, out_num, found, defaults, num_defaults)
}

unsafe extern "C" fn get_string(
    userdata: *mut c_void,
    key: *const c_char,
    output: *mut *mut c_char,
    default: *const c_char,
) -> c_int {
    let found = lookup(userdata, key);
    let bytes = match found {
        Some(value) => value.as_bytes(),
        None if default.is_null() => {
            if !output.is_null() {
                output.write(ptr::null_mut());
            }
            return 0;
        }
        None => CStr::from_ptr(default).to_bytes(),
    };
    let copy = alloc_bytes(bytes.len() + 1);
    if !copy.is_null() {
        ptr::copy_nonoverlapping(bytes.as_ptr(), copy, bytes.len());
        copy.add(bytes.len()).write(0);
    }
    if !output.is_null() {
        output.write(copy.cast());
    }
    c_int::from(found.is_some())
}

// Values handed to a filter carry their allocation size in a header so `free_value` can
// release them without knowing their type.
const HEADER: usize = 16;

fn alloc_bytes(len: usize) -> *mut u8 {
    let Ok(layout) = Layout::from_size_align(len + HEADER, HEADER) else {
        return ptr::null_mut();
    };
    // SAFETY: the layout is never zero sized.
    unsafe {
        let base = alloc::alloc(layout);
        if base.is_null() {
            return base;
        }
        base.cast::<usize>().write(layout.size());
        base.add(HEADER)
    }
}

fn alloc_copy<T: Copy>(items: &[T]) -> *mut T {
    let copy = alloc_bytes(mem::size_of_val(items)).cast::<T>();
    if !copy.is_null() {
        // SAFETY: `copy` holds `items.len()` elements and is aligned to the header size.
        unsafe { ptr::copy_nonoverlapping(items.as_ptr(), copy, items.len()) };
    }
    copy
}

unsafe extern "C" fn free_value(value: *mut c_void) {
    if value.is_null() {
        return;
    }
    let base = value.cast::<u8>().sub(HEADER);
    let size = base.cast::<usize>().read();
    alloc::dealloc(base, Layout::from_size_align_unchecked(size, HEADER));
}

/// The config accessors a filter was created with.
///
/// Every getter falls back to its default when the key is missing, malformed or the table
/// lacks the accessor.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig<'a> {
    table: Option<&'a ffi::softfilter_config>,
    userdata: *mut c_void,
}

impl<'a> FilterConfig<'a> {
    /// A config answering every lookup with the default.
    pub fn empty() -> Self {
        Self {
            table: None,
            userdata: ptr::null_mut(),
        }
    }

    /// # Safety
    /// `table` must be null or point to a valid table that, with `userdata`, stays usable for
    /// `'a`.
    pub unsafe fn from_raw(table: *const ffi::softfilter_config, userdata: *mut c_void) -> Self {
        Self {
            table: table.as_ref(),
            userdata,
        }
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.scalar(key, default, |t| t.get_float)
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.scalar(key, default, |t| t.get_int)
    }

    pub fn get_hex(&self, key: &str, default: u32) -> u32 {
        self.scalar(key, default, |t| t.get_hex)
    }

    pub fn get_float_array(&self, key: &str, defaults: &[f32]) -> Vec<f32> {
        self.array(key, defaults, |t| t.get_float_array)
    }

    pub fn get_int_array(&self, key: &str, defaults: &[i32]) -> Vec<i32> {
        self.array(key, defaults, |t| t.get_int_array)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        let (Some(table), Ok(c_key), Ok(c_default)) = (self.table, CString::new(key), CString::new(default)) else {
            return default.to_owned();
        };
        let Some(get) = table.get_string else {
            return default.to_owned();
        };
        let mut out: *mut c_char = ptr::null_mut();
        // SAFETY: the table and userdata are valid per `from_raw`.
        unsafe {
            get(self.userdata, c_key.as_ptr(), &mut out, c_default.as_ptr());
            if out.is_null() {
                return default.to_owned();
            }
            let value = CStr::from_ptr(out).to_string_lossy().into_owned();
            self.release(out.cast());
            value
        }
    }

    fn scalar<T: Copy>(
        &self,
        key: &str,
        default: T,
        pick: impl FnOnce(&ffi::softfilter_config) -> Option<unsafe extern "C" fn(*mut c_void, *const c_char, *mut T, T) -> c_int>,
    ) -> T {
        let (Some(get), Ok(c_key)) = (self.table.and_then(pick), CString::new(key)) else {
            return default;
        };
        let mut value = default;
        // SAFETY: as in `get_string`.
        unsafe { get(self.userdata, c_key.as_ptr(), &mut value, default) };
        value
    }

    #[allow(clippy::type_complexity)]
    fn array<T: Copy>(
        &self,
        key: &str,
        defaults: &[T],
        pick: impl FnOnce(
            &ffi::softfilter_config,
        ) -> Option<unsafe extern "C" fn(*mut c_void, *const c_char, *mut *mut T, *mut c_uint, *const T, c_uint) -> c_int>,
    ) -> Vec<T> {
        let (Some(get), Ok(c_key)) = (self.table.and_then(pick), CString::new(key)) else {
            return defaults.to_vec();
        };
        let mut values: *mut T = ptr::null_mut();
        let mut len: c_uint = 0;
        // SAFETY: as in `get_string`; the returned array holds `len` elements.
        unsafe {
            get(
                self.userdata,
                c_key.as_ptr(),
                &mut values,
                &mut len,
                defaults.as_ptr(),
                defaults.len() as c_uint,
            );
            if values.is_null() {
                return Vec::new();
            }
            let items = slice::from_raw_parts(values, len as usize).to_vec();
            self.release(values.cast());
            items
        }
    }

    unsafe fn release(&self, value: *mut c_void) {
        if let Some(free) = self.table.and_then(|t| t.free) {
            free(value);
        }
    }
}

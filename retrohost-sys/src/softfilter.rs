//! The softfilter image filter interface, API version 2.
//!
//! A filter plugin exports [`SOFTFILTER_GET_IMPLEMENTATION_SYMBOL`] with the signature of
//! [`softfilter_get_implementation_t`]. The returned table must stay valid for as long as the
//! plugin is loaded.
use std::ffi::{c_char, c_float, c_int, c_uint, c_void};

pub const SOFTFILTER_API_VERSION: c_int = 2;

pub const SOFTFILTER_GET_IMPLEMENTATION_SYMBOL: &str = "softfilter_get_implementation";

// Pixel formats. A filter reports the formats it supports as a bitmask of these.
pub const SOFTFILTER_FMT_NONE: c_uint = 0;
pub const SOFTFILTER_FMT_RGB565: c_uint = 1 << 0;
pub const SOFTFILTER_FMT_XRGB8888: c_uint = 1 << 1;

pub const SOFTFILTER_BPP_RGB565: usize = 2;
pub const SOFTFILTER_BPP_XRGB8888: usize = 4;

// SIMD capability bits passed to the factory and to `create`. Same layout as `RETRO_SIMD_*`.
pub const SOFTFILTER_SIMD_SSE: c_uint = 1 << 0;
pub const SOFTFILTER_SIMD_SSE2: c_uint = 1 << 1;
pub const SOFTFILTER_SIMD_VMX: c_uint = 1 << 2;
pub const SOFTFILTER_SIMD_VMX128: c_uint = 1 << 3;
pub const SOFTFILTER_SIMD_AVX: c_uint = 1 << 4;
pub const SOFTFILTER_SIMD_NEON: c_uint = 1 << 5;
pub const SOFTFILTER_SIMD_SSE3: c_uint = 1 << 6;
pub const SOFTFILTER_SIMD_SSSE3: c_uint = 1 << 7;
pub const SOFTFILTER_SIMD_MMX: c_uint = 1 << 8;
pub const SOFTFILTER_SIMD_MMXEXT: c_uint = 1 << 9;
pub const SOFTFILTER_SIMD_SSE4: c_uint = 1 << 10;
pub const SOFTFILTER_SIMD_SSE42: c_uint = 1 << 11;
pub const SOFTFILTER_SIMD_AVX2: c_uint = 1 << 12;
pub const SOFTFILTER_SIMD_VFPU: c_uint = 1 << 13;
pub const SOFTFILTER_SIMD_PS: c_uint = 1 << 14;
pub const SOFTFILTER_SIMD_AES: c_uint = 1 << 15;
pub const SOFTFILTER_SIMD_VFPV3: c_uint = 1 << 16;
pub const SOFTFILTER_SIMD_VFPV4: c_uint = 1 << 17;

pub type softfilter_simd_mask_t = c_uint;

// Config accessors. Every lookup returns non-zero when the key was found; otherwise the
// default is written to the out parameter. Arrays and strings are allocated by the host and
// must be released with `free`.

pub type softfilter_config_get_float_t = Option<
    unsafe extern "C" fn(userdata: *mut c_void, key: *const c_char, value: *mut c_float, default_value: c_float) -> c_int,
>;
pub type softfilter_config_get_int_t = Option<
    unsafe extern "C" fn(userdata: *mut c_void, key: *const c_char, value: *mut c_int, default_value: c_int) -> c_int,
>;
pub type softfilter_config_get_hex_t = Option<
    unsafe extern "C" fn(userdata: *mut c_void, key: *const c_char, value: *mut c_uint, default_value: c_uint) -> c_int,
>;
pub type softfilter_config_get_float_array_t = Option<
    unsafe extern "C" fn(
        userdata: *mut c_void,
        key: *const c_char,
        values: *mut *mut c_float,
        out_num_values: *mut c_uint,
        default_values: *const c_float,
        num_default_values: c_uint,
    ) -> c_int,
>;
pub type softfilter_config_get_int_array_t = Option<
    unsafe extern "C" fn(
        userdata: *mut c_void,
        key: *const c_char,
        values: *mut *mut c_int,
        out_num_values: *mut c_uint,
        default_values: *const c_int,
        num_default_values: c_uint,
    ) -> c_int,
>;
pub type softfilter_config_get_string_t = Option<
    unsafe extern "C" fn(
        userdata: *mut c_void,
        key: *const c_char,
        output: *mut *mut c_char,
        default_output: *const c_char,
    ) -> c_int,
>;
pub type softfilter_config_free_t = Option<unsafe extern "C" fn(ptr: *mut c_void)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct softfilter_config {
    pub get_float: softfilter_config_get_float_t,
    pub get_int: softfilter_config_get_int_t,
    pub get_hex: softfilter_config_get_hex_t,
    pub get_float_array: softfilter_config_get_float_array_t,
    pub get_int_array: softfilter_config_get_int_array_t,
    pub get_string: softfilter_config_get_string_t,
    pub free: softfilter_config_free_t,
}

pub type softfilter_work_t = Option<unsafe extern "C" fn(data: *mut c_void, thread_data: *mut c_void)>;

/// One unit of work for one thread. Filled in by `get_work_packets` every frame.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct softfilter_work_packet {
    pub work: softfilter_work_t,
    pub thread_data: *mut c_void,
}

pub type softfilter_query_input_formats_t = Option<unsafe extern "C" fn() -> c_uint>;
pub type softfilter_query_output_formats_t =
    Option<unsafe extern "C" fn(input_format: c_uint) -> c_uint>;
pub type softfilter_create_t = Option<
    unsafe extern "C" fn(
        config: *const softfilter_config,
        in_fmt: c_uint,
        out_fmt: c_uint,
        max_width: c_uint,
        max_height: c_uint,
        threads: c_uint,
        simd: softfilter_simd_mask_t,
        userdata: *mut c_void,
    ) -> *mut c_void,
>;
pub type softfilter_destroy_t = Option<unsafe extern "C" fn(data: *mut c_void)>;
pub type softfilter_query_num_threads_t = Option<unsafe extern "C" fn(data: *mut c_void) -> c_uint>;
pub type softfilter_query_output_size_t = Option<
    unsafe extern "C" fn(
        data: *mut c_void,
        out_width: *mut c_uint,
        out_height: *mut c_uint,
        width: c_uint,
        height: c_uint,
    ),
>;
pub type softfilter_get_work_packets_t = Option<
    unsafe extern "C" fn(
        data: *mut c_void,
        packets: *mut softfilter_work_packet,
        output: *mut c_void,
        output_stride: usize,
        input: *const c_void,
        width: c_uint,
        height: c_uint,
        input_stride: usize,
    ),
>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct softfilter_implementation {
    pub query_input_formats: softfilter_query_input_formats_t,
    pub query_output_formats: softfilter_query_output_formats_t,

    pub create: softfilter_create_t,
    pub destroy: softfilter_destroy_t,

    pub query_num_threads: softfilter_query_num_threads_t,
    pub query_output_size: softfilter_query_output_size_t,
    pub get_work_packets: softfilter_get_work_packets_t,

    /// Human readable identifier of implementation.
    pub ident: *const c_char,
    /// Computer-friendly short version of ident. Lower case, no spaces and special characters.
    pub short_ident: *const c_char,
    /// Must be [`SOFTFILTER_API_VERSION`].
    pub api_version: c_int,
}

pub type softfilter_get_implementation_t =
    unsafe extern "C" fn(simd: softfilter_simd_mask_t) -> *const softfilter_implementation;

crate::zeroed_default!(softfilter_config, softfilter_work_packet, softfilter_implementation);

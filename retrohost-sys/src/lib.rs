//! Low level libretro and softfilter ABI definitions for Rust
//!
//! This crate provides raw `#[repr(C)]` mirrors of the libretro plugin interface (version 1)
//! and of the softfilter image filter interface (version 2).
//! For a safe wrapper, see `retrohost`.
//!
//! ## Layout
//!
//! - [`libretro`] - core exports, callback typedefs, environment command codes and payloads
//! - [`softfilter`] - filter factory, implementation table, work packets and config accessors
//!
//! Enumerations are expressed as integer type aliases plus constants so that values coming
//! from a plugin are never transmuted into a Rust enum.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::missing_safety_doc)]

/// Implements `Default` as the all-zero bit pattern, which is what a C caller gets from
/// `memset(&x, 0, sizeof(x))`.
macro_rules! zeroed_default {
    ($($name:ty),* $(,)?) => {
        $(
            impl Default for $name {
                #[inline]
                fn default() -> Self {
                    // SAFETY: every field is an integer, float, bool, raw pointer or nullable
                    // function pointer, for which zero is a valid value.
                    unsafe { ::std::mem::zeroed() }
                }
            }
        )*
    };
}
pub(crate) use zeroed_default;

pub mod libretro;
pub mod softfilter;

pub use libretro::*;
pub use softfilter::*;

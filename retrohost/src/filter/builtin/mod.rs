//! Softfilters compiled into the host.
//!
//! They go through the same C interface as plugin filters.
use super::Factory;
use crate::format::FilterFormats;

pub mod darken;
pub mod normal2x;
pub mod scale2x;

/// Every compiled-in factory, by short identifier.
pub const FACTORIES: &[(&str, Factory)] = &[
    ("darken", darken::get_implementation as Factory),
    ("normal2x", normal2x::get_implementation as Factory),
    ("scale2x", scale2x::get_implementation as Factory),
];

/// The formats every compiled-in filter handles.
fn formats() -> FilterFormats {
    FilterFormats::RGB565 | FilterFormats::XRGB8888
}

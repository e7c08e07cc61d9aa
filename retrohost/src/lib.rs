//! A safe host for [libretro] cores and softfilter image filters, written in Rust
//!
//! The crate binds a core's exported interface at runtime, answers the core's environment
//! requests from an explicit [`Environment`](environment::Environment) context, and runs the
//! frames it renders through a chain-ready software filter graph.
//!
//! [libretro]: https://www.libretro.com
pub extern crate retrohost_sys;
pub use retrohost_sys as ffi;

pub mod conf;
pub mod core;
pub mod cpu;
pub mod dylib;
pub mod environment;
pub mod filter;
pub mod format;
pub mod frame;
pub mod host;
pub mod message;
pub mod options;
pub mod perf;
pub mod session;
pub mod settings;
pub mod state;

pub mod prelude {
    //! The retrohost prelude.
    //!
    //! Contains the types you most likely want to import anyway.
    pub use super::{
        conf::ConfigFile,
        core::{CoreApi, SystemInfo},
        cpu::SimdFeatures,
        dylib::{Loader, NativeLoader},
        environment::{DispatchMode, Environment},
        filter::{FilterGraph, FilterRegistry, FilterSource, SoftFilter},
        format::PixelFormat,
        host::{Host, NullHost},
        session::Session,
        settings::Settings,
    };
}

/// The libretro API version this host implements.
pub fn api_version() -> u32 {
    ffi::RETRO_API_VERSION
}

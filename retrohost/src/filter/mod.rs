//! Softfilter plugins: discovery, instantiation and frame processing.
//!
//! Filters are reached only through the `softfilter_implementation` C table, whether they live
//! in a plugin library or are compiled into the host. Rust filters implement [`SoftFilter`] and
//! are exported with [`export_softfilter!`](crate::export_softfilter).
use std::ffi::{c_uint, c_void, CStr};
use std::fmt;
use std::path::Path;
use std::ptr::NonNull;

use crate::{dylib::Library, ffi, format::FilterFormats};

pub mod builtin;
mod config;
mod errors;
mod graph;
mod registry;
pub mod traits;

pub use self::config::{accessors, ConfigUserdata, FilterConfig};
pub use self::errors::{FilterError, FilterResult, RejectReason};
pub use self::graph::FilterGraph;
pub use self::registry::{Factory, FilterRegistry, FilterSource};
pub use self::traits::{FilterParams, FrameJob, Pixel, SoftFilter};


#[derive(Clone, Copy)]
struct Functions {
    query_input_formats: unsafe extern "C" fn() -> c_uint,
    query_output_formats: unsafe extern "C" fn(c_uint) -> c_uint,
    create: unsafe extern "C" fn(
        *const ffi::softfilter_config,
        c_uint,
        c_uint,
        c_uint,
        c_uint,
        c_uint,
        ffi::softfilter_simd_mask_t,
        *mut c_void,
    ) -> *mut c_void,
    destroy: unsafe extern "C" fn(*mut c_void),
    query_num_threads: unsafe extern "C" fn(*mut c_void) -> c_uint,
    query_output_size: unsafe extern "C" fn(*mut c_void, *mut c_uint, *mut c_uint, c_uint, c_uint),
    get_work_packets: unsafe extern "C" fn(
        *mut c_void,
        *mut ffi::softfilter_work_packet,
        *mut c_void,
        usize,
        *const c_void,
        c_uint,
        c_uint,
        usize,
    ),
}

macro_rules! required {
    ($raw:ident, $($field:ident),*) => {
        Functions {
            $($field: $raw.$field.ok_or(RejectReason::MissingFunction(stringify!($field)))?,)*
        }
    };
}

/// A validated softfilter implementation table.
///
/// Keeps the library the table came from open; compiled-in filters have none.
pub struct FilterImplementation {
    ident: String,
    short_ident: String,
    api_version: i32,
    functions: Functions,
    // Declared last so it is closed after everything that points into it.
    library: Option<Box<dyn Library>>,
}

impl FilterImplementation {
    /// Copies and validates the table at `raw`. On failure `library` is closed before the
    /// reason is returned.
    ///
    /// # Safety
    /// `raw` must be null or point to a table whose functions and strings live as long as
    /// `library`, or forever when there is none.
    pub unsafe fn from_raw(
        raw: *const ffi::softfilter_implementation,
        library: Option<Box<dyn Library>>,
    ) -> Result<Self, RejectReason> {
        let raw = raw.as_ref().ok_or(RejectReason::Null)?;
        if raw.api_version != ffi::SOFTFILTER_API_VERSION {
            return Err(RejectReason::ApiVersion {
                found: raw.api_version,
                expected: ffi::SOFTFILTER_API_VERSION,
            });
        }
        if raw.ident.is_null() || raw.short_ident.is_null() {
            return Err(RejectReason::MissingIdent);
        }
        let functions = required!(
            raw,
            query_input_formats,
            query_output_formats,
            create,
            destroy,
            query_num_threads,
            query_output_size,
            get_work_packets
        );
        Ok(Self {
            ident: CStr::from_ptr(raw.ident).to_string_lossy().into_owned(),
            short_ident: CStr::from_ptr(raw.short_ident).to_string_lossy().into_owned(),
            api_version: raw.api_version,
            functions,
            library,
        })
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn short_ident(&self) -> &str {
        &self.short_ident
    }

    pub fn api_version(&self) -> i32 {
        self.api_version
    }

    /// The library the filter was loaded from, `None` for compiled-in filters.
    pub fn path(&self) -> Option<&Path> {
        self.library.as_ref().map(|lib| lib.path())
    }

    pub fn input_formats(&self) -> FilterFormats {
        // SAFETY: validated in `from_raw` and kept alive by `library`.
        FilterFormats::from_bits_truncate(unsafe { (self.functions.query_input_formats)() })
    }

    pub fn output_formats(&self, input: FilterFormats) -> FilterFormats {
        // SAFETY: as above.
        FilterFormats::from_bits_truncate(unsafe { (self.functions.query_output_formats)(input.bits()) })
    }

    /// # Safety
    /// `config` and `userdata` must stay valid for the duration of the call.
    pub(crate) unsafe fn create(
        &self,
        config: &ffi::softfilter_config,
        params: &FilterParams,
        userdata: *mut c_void,
    ) -> Option<NonNull<c_void>> {
        NonNull::new((self.functions.create)(
            config,
            params.input.bits(),
            params.output.bits(),
            params.max_width,
            params.max_height,
            params.threads,
            params.simd.softfilter_mask(),
            userdata,
        ))
    }

    /// # Safety
    /// `instance` must come from [`create`](Self::create) on `self` and not be used again.
    pub(crate) unsafe fn destroy(&self, instance: NonNull<c_void>) {
        (self.functions.destroy)(instance.as_ptr())
    }

    /// # Safety
    /// `instance` must be live and come from `self`.
    pub(crate) unsafe fn num_threads(&self, instance: NonNull<c_void>) -> u32 {
        (self.functions.query_num_threads)(instance.as_ptr())
    }

    /// # Safety
    /// As [`num_threads`](Self::num_threads).
    pub(crate) unsafe fn output_size(&self, instance: NonNull<c_void>, width: u32, height: u32) -> (u32, u32) {
        let (mut out_width, mut out_height) = (0, 0);
        (self.functions.query_output_size)(instance.as_ptr(), &mut out_width, &mut out_height, width, height);
        (out_width, out_height)
    }

    /// # Safety
    /// As [`num_threads`](Self::num_threads); `packets` must hold one entry per thread and the
    /// buffers must match the dimensions.
    #[allow(clippy::too_many_arguments)]
    pub(crate) unsafe fn get_work_packets(
        &self,
        instance: NonNull<c_void>,
        packets: &mut [ffi::softfilter_work_packet],
        output: *mut u8,
        output_stride: usize,
        input: *const u8,
        width: u32,
        height: u32,
        input_stride: usize,
    ) {
        (self.functions.get_work_packets)(
            instance.as_ptr(),
            packets.as_mut_ptr(),
            output.cast(),
            output_stride,
            input.cast(),
            width,
            height,
            input_stride,
        )
    }
}

impl fmt::Debug for FilterImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterImplementation")
            .field("ident", &self.ident)
            .field("short_ident", &self.short_ident)
            .field("api_version", &self.api_version)
            .field("path", &self.path())
            .finish()
    }
}

/// A `softfilter_implementation` that can live in a `static`.
pub struct StaticImplementation(ffi::softfilter_implementation);

// SAFETY: the table only holds function pointers and pointers to `'static` C strings.
unsafe impl Sync for StaticImplementation {}

impl StaticImplementation {
    pub const fn new<F: SoftFilter>() -> Self {
        Self(ffi::softfilter_implementation {
            query_input_formats: Some(export::query_input_formats::<F>),
            query_output_formats: Some(export::query_output_formats::<F>),
            create: Some(export::create::<F>),
            destroy: Some(export::destroy::<F>),
            query_num_threads: Some(export::query_num_threads::<F>),
            query_output_size: Some(export::query_output_size::<F>),
            get_work_packets: Some(export::get_work_packets::<F>),
            ident: F::IDENT.as_ptr(),
            short_ident: F::SHORT_IDENT.as_ptr(),
            api_version: ffi::SOFTFILTER_API_VERSION,
        })
    }

    pub fn as_ptr(&'static self) -> *const ffi::softfilter_implementation {
        &self.0
    }
}

/// The C side of a [`SoftFilter`].
#[doc(hidden)]
pub mod export {
    use super::*;
    use crate::cpu::SimdFeatures;
    use std::ptr;

    struct Instance<F> {
        filter: F,
        params: FilterParams,
        pending: Option<Pending>,
    }

    #[derive(Clone, Copy)]
    struct Pending {
        output: *mut u8,
        output_stride: usize,
        input: *const u8,
        input_stride: usize,
        width: u32,
        height: u32,
    }

    pub unsafe extern "C" fn query_input_formats<F: SoftFilter>() -> c_uint {
        F::input_formats().bits()
    }

    pub unsafe extern "C" fn query_output_formats<F: SoftFilter>(input: c_uint) -> c_uint {
        F::output_formats(FilterFormats::from_bits_truncate(input)).bits()
    }

    #[allow(clippy::too_many_arguments)]
    pub unsafe extern "C" fn create<F: SoftFilter>(
        config: *const ffi::softfilter_config,
        in_fmt: c_uint,
        out_fmt: c_uint,
        max_width: c_uint,
        max_height: c_uint,
        threads: c_uint,
        simd: ffi::softfilter_simd_mask_t,
        userdata: *mut c_void,
    ) -> *mut c_void {
        let input = FilterFormats::from_bits_truncate(in_fmt);
        let output = FilterFormats::from_bits_truncate(out_fmt);
        if input.bytes_per_pixel().is_none()
            || output.bytes_per_pixel().is_none()
            || !F::input_formats().contains(input)
            || !F::output_formats(input).contains(output)
        {
            return ptr::null_mut();
        }
        let params = FilterParams {
            input,
            output,
            max_width,
            max_height,
            threads: threads.max(1),
            simd: SimdFeatures::from_softfilter_mask(simd),
        };
        let config = FilterConfig::from_raw(config, userdata);
        match F::create(&config, &params) {
            Some(filter) => Box::into_raw(Box::new(Instance {
                filter,
                params,
                pending: None,
            }))
            .cast(),
            None => ptr::null_mut(),
        }
    }

    pub unsafe extern "C" fn destroy<F: SoftFilter>(data: *mut c_void) {
        if !data.is_null() {
            drop(Box::from_raw(data.cast::<Instance<F>>()));
        }
    }

    pub unsafe extern "C" fn query_num_threads<F: SoftFilter>(_data: *mut c_void) -> c_uint {
        1
    }

    pub unsafe extern "C" fn query_output_size<F: SoftFilter>(
        data: *mut c_void,
        out_width: *mut c_uint,
        out_height: *mut c_uint,
        width: c_uint,
        height: c_uint,
    ) {
        let Some(instance) = data.cast::<Instance<F>>().as_ref() else {
            return;
        };
        let (w, h) = instance.filter.output_size(width, height);
        if !out_width.is_null() {
            out_width.write(w);
        }
        if !out_height.is_null() {
            out_height.write(h);
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub unsafe extern "C" fn get_work_packets<F: SoftFilter>(
        data: *mut c_void,
        packets: *mut ffi::softfilter_work_packet,
        output: *mut c_void,
        output_stride: usize,
        input: *const c_void,
        width: c_uint,
        height: c_uint,
        input_stride: usize,
    ) {
        let Some(instance) = data.cast::<Instance<F>>().as_mut() else {
            return;
        };
        if packets.is_null() {
            return;
        }
        instance.pending = Some(Pending {
            output: output.cast(),
            output_stride,
            input: input.cast(),
            input_stride,
            width,
            height,
        });
        packets.write(ffi::softfilter_work_packet {
            work: Some(work::<F>),
            thread_data: data,
        });
    }

    unsafe extern "C" fn work<F: SoftFilter>(data: *mut c_void, _thread_data: *mut c_void) {
        let Some(instance) = data.cast::<Instance<F>>().as_mut() else {
            return;
        };
        let Some(pending) = instance.pending.take() else {
            return;
        };
        if pending.width == 0 || pending.height == 0 {
            return;
        }
        let out_size = instance.filter.output_size(pending.width, pending.height);
        let job = FrameJob::new(
            pending.input,
            pending.input_stride,
            pending.output,
            pending.output_stride,
            (pending.width, pending.height),
            out_size,
            instance.params,
        );
        instance.filter.process(job);
    }
}

/// Exports a [`SoftFilter`] through the softfilter C interface.
///
/// With just a type, defines the `softfilter_get_implementation` symbol a plugin library must
/// export. With `fn name => Type`, defines a factory function of that name instead, for filters
/// compiled into the host.
#[macro_export]
macro_rules! export_softfilter {
    // The `fn` form comes first: `fn ...` would otherwise be parsed as a function pointer type.
    (fn $name:ident => $filter:ty) => {
        pub unsafe extern "C" fn $name(
            simd: $crate::ffi::softfilter_simd_mask_t,
        ) -> *const $crate::ffi::softfilter_implementation {
            $crate::export_softfilter!(@table $filter, simd)
        }
    };
    (@table $filter:ty, $simd:ident) => {{
        static IMPLEMENTATION: $crate::filter::StaticImplementation =
            $crate::filter::StaticImplementation::new::<$filter>();
        let _ = $simd;
        IMPLEMENTATION.as_ptr()
    }};
    ($filter:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn softfilter_get_implementation(
            simd: $crate::ffi::softfilter_simd_mask_t,
        ) -> *const $crate::ffi::softfilter_implementation {
            $crate::export_softfilter!(@table $filter, simd)
        }
    };
}

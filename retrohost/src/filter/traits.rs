use std::ffi::CStr;
use std::marker::PhantomData;
use std::{mem, slice};

use crate::{cpu::SimdFeatures, filter::FilterConfig, format::FilterFormats};

/// Trait that softfilter structs must implement.
///
/// [`export_softfilter!`](crate::export_softfilter) turns an implementor into a
/// `softfilter_implementation` table, so the same type can be compiled into the host or into
/// a plugin library.
pub trait SoftFilter: Sized + 'static {
    /// Human readable name.
    const IDENT: &'static CStr;
    /// Lookup key: lower case, no spaces.
    const SHORT_IDENT: &'static CStr;

    /// The formats the filter accepts.
    fn input_formats() -> FilterFormats;

    /// The formats the filter can produce from `input`.
    fn output_formats(input: FilterFormats) -> FilterFormats;

    /// Creates an instance, or `None` if the parameters cannot be served.
    fn create(config: &FilterConfig<'_>, params: &FilterParams) -> Option<Self>;

    /// Output dimensions for an input of `width` x `height`.
    fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width, height)
    }

    /// Filters one frame.
    fn process(&mut self, job: FrameJob<'_>);
}

/// What a filter instance is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub input: FilterFormats,
    pub output: FilterFormats,
    pub max_width: u32,
    pub max_height: u32,
    pub threads: u32,
    pub simd: SimdFeatures,
}

/// A pixel type a softfilter operates on.
pub trait Pixel: Copy + Eq + Default + 'static {
    const FORMAT: FilterFormats;
}

impl Pixel for u16 {
    const FORMAT: FilterFormats = FilterFormats::RGB565;
}

impl Pixel for u32 {
    const FORMAT: FilterFormats = FilterFormats::XRGB8888;
}

/// One frame handed to [`SoftFilter::process`].
///
/// Input rows borrow the frame, not the job, so they can be held while output rows are
/// written.
pub struct FrameJob<'a> {
    input: *const u8,
    input_stride: usize,
    output: *mut u8,
    output_stride: usize,
    width: u32,
    height: u32,
    out_width: u32,
    out_height: u32,
    params: FilterParams,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> FrameJob<'a> {
    /// # Safety
    /// `input` must hold `height` rows of `width` input pixels spaced `input_stride` bytes
    /// apart, `output` likewise for the output size, both aligned to their pixel size,
    /// non-overlapping and valid for `'a`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) unsafe fn new(
        input: *const u8,
        input_stride: usize,
        output: *mut u8,
        output_stride: usize,
        (width, height): (u32, u32),
        (out_width, out_height): (u32, u32),
        params: FilterParams,
    ) -> Self {
        Self {
            input,
            input_stride,
            output,
            output_stride,
            width,
            height,
            out_width,
            out_height,
            params,
            _marker: PhantomData,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn out_width(&self) -> u32 {
        self.out_width
    }

    pub fn out_height(&self) -> u32 {
        self.out_height
    }

    pub fn input_format(&self) -> FilterFormats {
        self.params.input
    }

    pub fn output_format(&self) -> FilterFormats {
        self.params.output
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Input row `y`, clamped to the frame.
    ///
    /// # Panics
    /// If `P` is not the input pixel type or the frame is empty.
    pub fn input_row<P: Pixel>(&self, y: u32) -> &'a [P] {
        assert_eq!(P::FORMAT, self.params.input, "input pixel type mismatch");
        assert!(self.height > 0 && self.width > 0, "empty frame");
        let y = y.min(self.height - 1) as usize;
        debug_assert_eq!(self.input as usize % mem::align_of::<P>(), 0);
        // SAFETY: row `y` exists and holds `width` pixels of type `P` per `new`.
        unsafe { slice::from_raw_parts(self.input.add(y * self.input_stride).cast(), self.width as usize) }
    }

    /// Output row `y`.
    ///
    /// # Panics
    /// If `P` is not the output pixel type or `y` is out of range.
    pub fn output_row<P: Pixel>(&mut self, y: u32) -> &mut [P] {
        assert_eq!(P::FORMAT, self.params.output, "output pixel type mismatch");
        assert!(y < self.out_height, "output row {} out of range", y);
        debug_assert_eq!(self.output as usize % mem::align_of::<P>(), 0);
        // SAFETY: as above, and the returned slice borrows the job mutably.
        unsafe {
            slice::from_raw_parts_mut(
                self.output.add(y as usize * self.output_stride).cast(),
                self.out_width as usize,
            )
        }
    }
}

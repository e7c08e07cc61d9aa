use log::{debug, info};
use std::ffi::c_void;
use std::ptr::NonNull;

use super::{
    accessors, ConfigUserdata, FilterError, FilterImplementation, FilterParams, FilterRegistry, FilterResult,
    FilterSource,
};
use crate::{
    conf::ConfigFile,
    cpu::{self, SimdFeatures},
    dylib::Loader,
    ffi,
    format::{FilterFormats, PixelFormat},
    frame::VideoFrame,
};

/// The config key naming the filter to run.
pub const FILTER_KEY: &str = "filter";

/// A running softfilter instance.
///
/// Frames are processed synchronously on the calling thread. Dropping the graph destroys the
/// instance and closes the filter's library.
pub struct FilterGraph {
    instance: NonNull<c_void>,
    params: FilterParams,
    packets: Vec<ffi::softfilter_work_packet>,
    implementation: FilterImplementation,
}

impl FilterGraph {
    /// Builds the filter named by the `filter` key of `config`.
    ///
    /// 0RGB1555 input is filtered as RGB565; callers convert frames first, which
    /// [`process_frame`](Self::process_frame) does. Every filter that is not selected is closed
    /// before this returns.
    pub fn build(
        config: &ConfigFile,
        source: &FilterSource,
        loader: &dyn Loader,
        input: PixelFormat,
        max_width: u32,
        max_height: u32,
    ) -> FilterResult<Self> {
        let name = config.get(FILTER_KEY).ok_or(FilterError::NoFilterConfigured)?;
        let simd = cpu::detect();
        let implementation = {
            let mut registry = FilterRegistry::discover(source, loader, simd)?;
            registry
                .take(name)
                .ok_or_else(|| FilterError::NotFound(name.to_owned()))?
        };
        Self::with_implementation(implementation, config, input, max_width, max_height, simd)
    }

    /// Instantiates `implementation` for frames of `input` up to `max_width` x `max_height`.
    ///
    /// The output format is the input format when the filter can produce it, else XRGB8888,
    /// else RGB565.
    pub fn with_implementation(
        implementation: FilterImplementation,
        config: &ConfigFile,
        input: PixelFormat,
        max_width: u32,
        max_height: u32,
        simd: SimdFeatures,
    ) -> FilterResult<Self> {
        let input = input.filter_format();
        let name = implementation.short_ident().to_owned();
        if !implementation.input_formats().contains(input) {
            return Err(FilterError::UnsupportedInput {
                filter: name,
                format: input,
            });
        }
        let output = FilterFormats::negotiate(input, implementation.output_formats(input))
            .ok_or_else(|| FilterError::NoCompatibleFormat(name.clone()))?;

        let params = FilterParams {
            input,
            output,
            max_width,
            max_height,
            threads: 1,
            simd,
        };
        let userdata = ConfigUserdata::new(config, 0, &name);
        let table = accessors();
        // SAFETY: the table and userdata outlive the call.
        let instance = unsafe { implementation.create(&table, &params, userdata.as_ptr()) }
            .ok_or_else(|| FilterError::CreateFailed(name.clone()))?;

        let mut graph = Self {
            instance,
            params,
            packets: Vec::new(),
            implementation,
        };
        // SAFETY: the instance is live.
        let threads = unsafe { graph.implementation.num_threads(graph.instance) };
        if threads == 0 {
            return Err(FilterError::NoThreads(name));
        }
        graph.params.threads = threads;
        graph.packets = vec![ffi::softfilter_work_packet::default(); threads as usize];

        let (out_width, out_height) = graph.output_size(max_width, max_height);
        info!(
            "Softfilter initialized: \"{}\" ({:?} -> {:?}), max output {}x{}, {} thread(s)",
            graph.implementation.ident(),
            input,
            output,
            out_width,
            out_height,
            threads
        );
        Ok(graph)
    }

    pub fn implementation(&self) -> &FilterImplementation {
        &self.implementation
    }

    pub fn input_format(&self) -> FilterFormats {
        self.params.input
    }

    pub fn output_format(&self) -> FilterFormats {
        self.params.output
    }

    /// The pixel format of the frames [`process_frame`](Self::process_frame) returns.
    pub fn output_pixel_format(&self) -> PixelFormat {
        self.params.output.pixel_format().unwrap_or(PixelFormat::Xrgb8888)
    }

    pub fn max_size(&self) -> (u32, u32) {
        (self.params.max_width, self.params.max_height)
    }

    pub fn threads(&self) -> u32 {
        self.params.threads
    }

    /// Output dimensions for an input of `width` x `height`.
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        // SAFETY: the instance is live for as long as `self`.
        unsafe { self.implementation.output_size(self.instance, width, height) }
    }

    /// Filters one frame from `input` into `output`.
    ///
    /// Both buffers are checked against the frame dimensions first: rows of `width` pixels
    /// spaced `in_stride` bytes apart, and the same for the output size.
    ///
    /// # Errors
    /// - [`FilterError::FrameTooLarge`] if the frame exceeds the size the graph was built for
    /// - [`FilterError::StrideTooSmall`] or [`FilterError::BufferTooSmall`] if a buffer cannot
    ///   hold its frame
    /// - [`FilterError::Misaligned`] unless both buffers start at, and both strides are, a
    ///   multiple of their pixel size (2 bytes for RGB565, 4 for XRGB8888). Buffers viewed
    ///   from `u16`/`u32` storage always are.
    pub fn process(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        in_stride: usize,
        output: &mut [u8],
        out_stride: usize,
    ) -> FilterResult<()> {
        let (max_width, max_height) = self.max_size();
        if width > max_width || height > max_height {
            return Err(FilterError::FrameTooLarge {
                width,
                height,
                max_width,
                max_height,
            });
        }
        if width == 0 || height == 0 {
            return Ok(());
        }
        let in_bpp = bytes_per_pixel(self.params.input);
        let out_bpp = bytes_per_pixel(self.params.output);
        check_buffer("Input", input, width, height, in_stride, in_bpp)?;
        let (out_width, out_height) = self.output_size(width, height);
        check_buffer("Output", output, out_width, out_height, out_stride, out_bpp)?;

        // SAFETY: the buffers are checked above and the packets hold one entry per thread.
        unsafe {
            self.implementation.get_work_packets(
                self.instance,
                &mut self.packets,
                output.as_mut_ptr(),
                out_stride,
                input.as_ptr(),
                width,
                height,
                in_stride,
            );
            for packet in &self.packets {
                if let Some(work) = packet.work {
                    work(self.instance.as_ptr(), packet.thread_data);
                }
            }
        }
        Ok(())
    }

    /// Filters `frame` into a newly allocated frame, converting 0RGB1555 input first.
    pub fn process_frame(&mut self, frame: &VideoFrame) -> FilterResult<VideoFrame> {
        let (out_width, out_height) = self.output_size(frame.width(), frame.height());
        let mut output = VideoFrame::new(out_width, out_height, self.output_pixel_format());
        let out_stride = output.pitch();

        if frame.format() == PixelFormat::Rgb1555 {
            let mut converted = frame.clone();
            converted.convert_to_rgb565();
            self.process(
                converted.data(),
                converted.width(),
                converted.height(),
                converted.pitch(),
                output.data_mut(),
                out_stride,
            )?;
        } else {
            self.process(
                frame.data(),
                frame.width(),
                frame.height(),
                frame.pitch(),
                output.data_mut(),
                out_stride,
            )?;
        }
        Ok(output)
    }
}

impl Drop for FilterGraph {
    fn drop(&mut self) {
        debug!("Destroying softfilter \"{}\"", self.implementation.short_ident());
        // SAFETY: the instance came from this implementation and is not used again.
        unsafe { self.implementation.destroy(self.instance) };
    }
}

impl std::fmt::Debug for FilterGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterGraph")
            .field("implementation", &self.implementation)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn bytes_per_pixel(format: FilterFormats) -> usize {
    format.bytes_per_pixel().unwrap_or(ffi::SOFTFILTER_BPP_XRGB8888)
}

fn check_buffer(what: &'static str, buffer: &[u8], width: u32, height: u32, stride: usize, bpp: usize) -> FilterResult<()> {
    if width == 0 || height == 0 {
        return Ok(());
    }
    let row = width as usize * bpp;
    if stride < row {
        return Err(FilterError::StrideTooSmall { what, stride, row });
    }
    let needed = (height as usize - 1) * stride + row;
    if buffer.len() < needed {
        return Err(FilterError::BufferTooSmall {
            what,
            len: buffer.len(),
            needed,
        });
    }
    if buffer.as_ptr() as usize % bpp != 0 || stride % bpp != 0 {
        return Err(FilterError::Misaligned { what });
    }
    Ok(())
}

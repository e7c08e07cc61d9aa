//! A softfilter plugin built as its own shared library.
//!
//! Drop the built library into a filter directory and select it with `filter = "invert"`.
//! The `invert_mask` key (hex) limits which bits are flipped.
use retrohost::{
    filter::{FilterConfig, FilterParams, FrameJob, Pixel, SoftFilter},
    format::FilterFormats,
};
use std::ffi::CStr;
use std::ops::BitXor;

pub struct Invert {
    mask: u32,
}

retrohost::export_softfilter!(Invert);

impl SoftFilter for Invert {
    const IDENT: &'static CStr = c"Invert";
    const SHORT_IDENT: &'static CStr = c"invert";

    fn input_formats() -> FilterFormats {
        FilterFormats::RGB565 | FilterFormats::XRGB8888
    }

    fn output_formats(input: FilterFormats) -> FilterFormats {
        input
    }

    fn create(config: &FilterConfig<'_>, _params: &FilterParams) -> Option<Self> {
        let mask = config.get_hex("mask", 0x00ff_ffff);
        Some(Self { mask })
    }

    fn process(&mut self, mut job: FrameJob<'_>) {
        if job.input_format() == FilterFormats::RGB565 {
            invert::<u16>(&mut job, self.mask as u16);
        } else {
            invert::<u32>(&mut job, self.mask);
        }
    }
}

fn invert<P: Pixel + BitXor<Output = P>>(job: &mut FrameJob<'_>, mask: P) {
    for y in 0..job.height() {
        let src = job.input_row::<P>(y);
        for (out, &px) in job.output_row::<P>(y).iter_mut().zip(src) {
            *out = px ^ mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrohost::{
        conf::ConfigFile,
        cpu::SimdFeatures,
        filter::{FilterGraph, FilterRegistry},
        format::PixelFormat,
        frame::VideoFrame,
    };

    fn graph(config: &str) -> FilterGraph {
        let factories = [("invert", softfilter_get_implementation as retrohost::filter::Factory)];
        let mut registry = FilterRegistry::from_factories(&factories, SimdFeatures::empty()).unwrap();
        let imp = registry.take("invert").unwrap();
        let config: ConfigFile = config.parse().unwrap();
        FilterGraph::with_implementation(imp, &config, PixelFormat::Xrgb8888, 4, 4, SimdFeatures::empty()).unwrap()
    }

    fn first_pixel(frame: &VideoFrame) -> u32 {
        let row = frame.row(0);
        u32::from_ne_bytes([row[0], row[1], row[2], row[3]])
    }

    #[test]
    fn inverts_colour_bits() {
        let mut graph = graph("filter = \"invert\"\n");
        let out = graph.process_frame(&VideoFrame::new(2, 2, PixelFormat::Xrgb8888)).unwrap();
        assert_eq!(first_pixel(&out), 0x00ff_ffff);
    }

    #[test]
    fn mask_is_read_from_config() {
        let mut graph = graph("filter = \"invert\"\ninvert_mask = \"0xff0000\"\n");
        let out = graph.process_frame(&VideoFrame::new(1, 1, PixelFormat::Xrgb8888)).unwrap();
        assert_eq!(first_pixel(&out), 0x00ff_0000);
    }
}

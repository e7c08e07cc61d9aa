//! Doubles every pixel in both directions.
use std::ffi::CStr;

use super::formats;
use crate::{
    filter::{FilterConfig, FilterParams, FrameJob, Pixel, SoftFilter},
    format::FilterFormats,
};

pub struct Normal2x;

crate::export_softfilter!(fn get_implementation => Normal2x);

impl SoftFilter for Normal2x {
    const IDENT: &'static CStr = c"Normal 2x";
    const SHORT_IDENT: &'static CStr = c"normal2x";

    fn input_formats() -> FilterFormats {
        formats()
    }

    fn output_formats(input: FilterFormats) -> FilterFormats {
        input & formats()
    }

    fn create(_config: &FilterConfig<'_>, _params: &FilterParams) -> Option<Self> {
        Some(Self)
    }

    fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width.saturating_mul(2), height.saturating_mul(2))
    }

    fn process(&mut self, mut job: FrameJob<'_>) {
        if job.input_format() == FilterFormats::RGB565 {
            double::<u16>(&mut job);
        } else {
            double::<u32>(&mut job);
        }
    }
}

fn double<P: Pixel>(job: &mut FrameJob<'_>) {
    for y in 0..job.height() {
        let src = job.input_row::<P>(y);
        for half in 0..2 {
            let out = job.output_row::<P>(y * 2 + half);
            for (pair, &pixel) in out.chunks_exact_mut(2).zip(src) {
                pair[0] = pixel;
                pair[1] = pixel;
            }
        }
    }
}

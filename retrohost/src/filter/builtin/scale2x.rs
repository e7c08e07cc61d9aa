//! The Scale2x (EPX) upscaler: every input pixel becomes a 2x2 block shaped by its
//! neighbours.
use std::ffi::CStr;

use super::formats;
use crate::{
    filter::{FilterConfig, FilterParams, FrameJob, Pixel, SoftFilter},
    format::FilterFormats,
};

pub struct Scale2x;

crate::export_softfilter!(fn get_implementation => Scale2x);

impl SoftFilter for Scale2x {
    const IDENT: &'static CStr = c"Scale2x";
    const SHORT_IDENT: &'static CStr = c"scale2x";

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
            scale::<u16>(&mut job);
        } else {
            scale::<u32>(&mut job);
        }
    }
}

fn scale<P: Pixel>(job: &mut FrameJob<'_>) {
    let width = job.width() as usize;
    for y in 0..job.height() {
        let above = job.input_row::<P>(y.saturating_sub(1));
        let row = job.input_row::<P>(y);
        let below = job.input_row::<P>(y + 1);
        for (half, (near, far)) in [(above, below), (below, above)].into_iter().enumerate() {
            let out = job.output_row::<P>(y * 2 + half as u32);
            for x in 0..width {
                let center = row[x];
                let left = row[x.saturating_sub(1)];
                let right = row[(x + 1).min(width - 1)];
                let (n, f) = (near[x], far[x]);
                out[x * 2] = if left == n && n != right && left != f { left } else { center };
                out[x * 2 + 1] = if n == right && n != left && right != f { right } else { center };
            }
        }
    }
}

//! Darkens every channel by a configurable right shift.
//!
//! Reads `shift` (default 1, at most 4) from the filter config.
use std::ffi::CStr;
use std::ops::{BitAnd, Shr};

use super::formats;
use crate::{
    cpu::SimdFeatures,
    filter::{FilterConfig, FilterParams, FrameJob, Pixel, SoftFilter},
    format::FilterFormats,
};

pub const DEFAULT_SHIFT: u32 = 1;
pub const MAX_SHIFT: u32 = 4;

pub struct Darken {
    shift: u32,
    #[cfg_attr(not(target_arch = "x86_64"), allow(dead_code))]
    sse2: bool,
}

crate::export_softfilter!(fn get_implementation => Darken);

impl SoftFilter for Darken {
    const IDENT: &'static CStr = c"Darken";
    const SHORT_IDENT: &'static CStr = c"darken";

    fn input_formats() -> FilterFormats {
        formats()
    }

    fn output_formats(input: FilterFormats) -> FilterFormats {
        input & formats()
    }

    fn create(config: &FilterConfig<'_>, params: &FilterParams) -> Option<Self> {
        let shift = config.get_int("shift", DEFAULT_SHIFT as i32).clamp(0, MAX_SHIFT as i32) as u32;
        Some(Self {
            shift,
            sse2: params.simd.contains(SimdFeatures::SSE2),
        })
    }

    fn process(&mut self, mut job: FrameJob<'_>) {
        for y in 0..job.height() {
            if job.input_format() == FilterFormats::RGB565 {
                let src = job.input_row::<u16>(y);
                self.darken_565(src, job.output_row(y));
            } else {
                let src = job.input_row::<u32>(y);
                self.darken_8888(src, job.output_row(y));
            }
        }
    }
}

impl Darken {
    fn darken_565(&self, src: &[u16], dst: &mut [u16]) {
        let mask = mask_565(self.shift);
        #[cfg(target_arch = "x86_64")]
        if self.sse2 {
            // SAFETY: SSE2 was reported by the CPU feature mask.
            unsafe { sse2::darken_16(src, dst, self.shift, mask) };
            return;
        }
        darken_scalar(src, dst, self.shift, mask);
    }

    fn darken_8888(&self, src: &[u32], dst: &mut [u32]) {
        let mask = mask_8888(self.shift);
        #[cfg(target_arch = "x86_64")]
        if self.sse2 {
            // SAFETY: as above.
            unsafe { sse2::darken_32(src, dst, self.shift, mask) };
            return;
        }
        darken_scalar(src, dst, self.shift, mask);
    }
}

/// Bits that stay inside their own channel after shifting an RGB565 pixel right by `shift`.
pub fn mask_565(shift: u32) -> u16 {
    ((0x1f >> shift) << 11) | ((0x3f >> shift) << 5) | (0x1f >> shift)
}

/// As [`mask_565`], for XRGB8888.
pub fn mask_8888(shift: u32) -> u32 {
    let channel = 0xff >> shift;
    (channel << 16) | (channel << 8) | channel
}

fn darken_scalar<P>(src: &[P], dst: &mut [P], shift: u32, mask: P)
where
    P: Pixel + Shr<u32, Output = P> + BitAnd<Output = P>,
{
    for (out, &pixel) in dst.iter_mut().zip(src) {
        *out = (pixel >> shift) & mask;
    }
}

#[cfg(target_arch = "x86_64")]
mod sse2 {
    use std::arch::x86_64::*;

    #[target_feature(enable = "sse2")]
    pub unsafe fn darken_16(src: &[u16], dst: &mut [u16], shift: u32, mask: u16) {
        let len = src.len().min(dst.len());
        let count = _mm_cvtsi32_si128(shift as i32);
        let vmask = _mm_set1_epi16(mask as i16);
        let blocks = len / 8;
        for i in 0..blocks {
            let pixels = _mm_loadu_si128(src.as_ptr().add(i * 8).cast());
            let darkened = _mm_and_si128(_mm_srl_epi16(pixels, count), vmask);
            _mm_storeu_si128(dst.as_mut_ptr().add(i * 8).cast(), darkened);
        }
        super::darken_scalar(&src[blocks * 8..len], &mut dst[blocks * 8..len], shift, mask);
    }

    #[target_feature(enable = "sse2")]
    pub unsafe fn darken_32(src: &[u32], dst: &mut [u32], shift: u32, mask: u32) {
        let len = src.len().min(dst.len());
        let count = _mm_cvtsi32_si128(shift as i32);
        let vmask = _mm_set1_epi32(mask as i32);
        let blocks = len / 4;
        for i in 0..blocks {
            let pixels = _mm_loadu_si128(src.as_ptr().add(i * 4).cast());
            let darkened = _mm_and_si128(_mm_srl_epi32(pixels, count), vmask);
            _mm_storeu_si128(dst.as_mut_ptr().add(i * 4).cast(), darkened);
        }
        super::darken_scalar(&src[blocks * 4..len], &mut dst[blocks * 4..len], shift, mask);
    }
}

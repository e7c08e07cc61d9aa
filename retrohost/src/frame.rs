//! Video frames captured from a core.
use std::ffi::c_void;
use std::slice;

use crate::format::PixelFormat;

/// One frame of video, rows packed without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl VideoFrame {
    /// A black frame.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            data: vec![0; len],
            width,
            height,
            format,
        }
    }

    /// Copies a frame out of core memory.
    ///
    /// # Safety
    /// `data` must point to `height` rows of at least `width` pixels each, `pitch` bytes apart.
    pub unsafe fn from_raw(
        data: *const c_void,
        width: u32,
        height: u32,
        pitch: usize,
        format: PixelFormat,
    ) -> Self {
        let mut frame = Self::new(width, height, format);
        let row_len = frame.pitch();
        for y in 0..height as usize {
            let src = slice::from_raw_parts(data.cast::<u8>().add(y * pitch), row_len);
            frame.row_mut(y).copy_from_slice(src);
        }
        frame
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per row.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let pitch = self.pitch();
        &self.data[y * pitch..(y + 1) * pitch]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let pitch = self.pitch();
        &mut self.data[y * pitch..(y + 1) * pitch]
    }

    /// Converts a 0RGB1555 frame to RGB565 in place. Other formats are left alone.
    ///
    /// Filters never see 0RGB1555; frames in that format are converted before filtering.
    pub fn convert_to_rgb565(&mut self) {
        if self.format != PixelFormat::Rgb1555 {
            return;
        }
        for pixel in self.data.chunks_exact_mut(2) {
            let col = u16::from_ne_bytes([pixel[0], pixel[1]]);
            pixel.copy_from_slice(&rgb1555_to_rgb565(col).to_ne_bytes());
        }
        self.format = PixelFormat::Rgb565;
    }
}

/// Widens green to six bits by repeating its top bit in the new low bit.
#[inline]
pub fn rgb1555_to_rgb565(col: u16) -> u16 {
    let rg = (col << 1) & ((0x1f << 11) | (0x1f << 6));
    let b = col & 0x1f;
    let glow = (col >> 4) & (1 << 5);
    rg | b | glow
}

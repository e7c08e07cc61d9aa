//! Pixel formats shared by cores and filters.
use bitflags::bitflags;
use std::ffi::c_uint;
use std::fmt;

use crate::ffi;


/// The pixel layout of frames a core renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 0RGB1555, native endian. What a core renders until it asks for something else.
    #[default]
    Rgb1555,
    /// XRGB8888, native endian.
    Xrgb8888,
    /// RGB565, native endian.
    Rgb565,
}

impl PixelFormat {
    /// Maps a `retro_pixel_format` value, returning `None` for anything outside the closed set.
    pub fn from_raw(value: ffi::retro_pixel_format) -> Option<Self> {
        match value {
            ffi::RETRO_PIXEL_FORMAT_0RGB1555 => Some(Self::Rgb1555),
            ffi::RETRO_PIXEL_FORMAT_XRGB8888 => Some(Self::Xrgb8888),
            ffi::RETRO_PIXEL_FORMAT_RGB565 => Some(Self::Rgb565),
            _ => None,
        }
    }

    pub fn as_raw(self) -> ffi::retro_pixel_format {
        match self {
            Self::Rgb1555 => ffi::RETRO_PIXEL_FORMAT_0RGB1555,
            Self::Xrgb8888 => ffi::RETRO_PIXEL_FORMAT_XRGB8888,
            Self::Rgb565 => ffi::RETRO_PIXEL_FORMAT_RGB565,
        }
    }

    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb1555 | Self::Rgb565 => 2,
            Self::Xrgb8888 => 4,
        }
    }

    /// The filter format frames in this layout are fed to a filter as.
    ///
    /// 0RGB1555 frames are converted to RGB565 before filtering, so both 16-bit layouts map
    /// to [`FilterFormats::RGB565`].
    pub fn filter_format(self) -> FilterFormats {
        match self {
            Self::Rgb1555 | Self::Rgb565 => FilterFormats::RGB565,
            Self::Xrgb8888 => FilterFormats::XRGB8888,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb1555 => "0RGB1555",
            Self::Xrgb8888 => "XRGB8888",
            Self::Rgb565 => "RGB565",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// A set of softfilter pixel formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FilterFormats: c_uint {
        const RGB565 = ffi::SOFTFILTER_FMT_RGB565;
        const XRGB8888 = ffi::SOFTFILTER_FMT_XRGB8888;
    }
}

impl FilterFormats {
    /// Bytes per pixel of a single format, or `None` if `self` is not exactly one format.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        if self == Self::RGB565 {
            Some(ffi::SOFTFILTER_BPP_RGB565)
        } else if self == Self::XRGB8888 {
            Some(ffi::SOFTFILTER_BPP_XRGB8888)
        } else {
            None
        }
    }

    /// The core pixel format matching a single filter format.
    pub fn pixel_format(self) -> Option<PixelFormat> {
        if self == Self::RGB565 {
            Some(PixelFormat::Rgb565)
        } else if self == Self::XRGB8888 {
            Some(PixelFormat::Xrgb8888)
        } else {
            None
        }
    }

    /// Picks the output format for a filter that accepts `input` and can produce `supported`.
    ///
    /// The input format is kept when possible, otherwise XRGB8888 is preferred over RGB565.
    pub fn negotiate(input: Self, supported: Self) -> Option<Self> {
        [input, Self::XRGB8888, Self::RGB565]
            .into_iter()
            .find(|candidate| !candidate.is_empty() && supported.contains(*candidate))
    }
}

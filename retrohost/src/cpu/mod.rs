//! Runtime detection of SIMD capabilities.
use bitflags::bitflags;
use log::debug;
use std::ffi::c_uint;
use std::sync::OnceLock;

use crate::ffi;


bitflags! {
    /// SIMD instruction sets available on the executing CPU.
    ///
    /// The bit layout is the one cores receive from `get_cpu_features` and filters receive as
    /// their SIMD mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SimdFeatures: u64 {
        const SSE = ffi::RETRO_SIMD_SSE;
        const SSE2 = ffi::RETRO_SIMD_SSE2;
        const VMX = ffi::RETRO_SIMD_VMX;
        const VMX128 = ffi::RETRO_SIMD_VMX128;
        const AVX = ffi::RETRO_SIMD_AVX;
        const NEON = ffi::RETRO_SIMD_NEON;
        const SSE3 = ffi::RETRO_SIMD_SSE3;
        const SSSE3 = ffi::RETRO_SIMD_SSSE3;
        const MMX = ffi::RETRO_SIMD_MMX;
        const MMXEXT = ffi::RETRO_SIMD_MMXEXT;
        const SSE4 = ffi::RETRO_SIMD_SSE4;
        const SSE42 = ffi::RETRO_SIMD_SSE42;
        const AVX2 = ffi::RETRO_SIMD_AVX2;
        const VFPU = ffi::RETRO_SIMD_VFPU;
        const PS = ffi::RETRO_SIMD_PS;
        const AES = ffi::RETRO_SIMD_AES;
        const VFPV3 = 1 << 16;
        const VFPV4 = 1 << 17;
    }
}

impl SimdFeatures {
    /// The mask in the 32-bit form the softfilter interface uses.
    #[inline]
    pub fn softfilter_mask(self) -> ffi::softfilter_simd_mask_t {
        self.bits() as c_uint
    }

    /// Builds a set from a softfilter mask, dropping unknown bits.
    #[inline]
    pub fn from_softfilter_mask(mask: ffi::softfilter_simd_mask_t) -> Self {
        Self::from_bits_truncate(u64::from(mask))
    }
}

static FEATURES: OnceLock<SimdFeatures> = OnceLock::new();

/// Returns the SIMD features of the executing CPU. Computed on first call.
pub fn detect() -> SimdFeatures {
    *FEATURES.get_or_init(|| {
        let features = probe();
        debug!("SIMD features: {:?}", features);
        features
    })
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn probe() -> SimdFeatures {
    let mut features = SimdFeatures::empty();
    let checks = [
        (std::arch::is_x86_feature_detected!("mmx"), SimdFeatures::MMX),
        (std::arch::is_x86_feature_detected!("sse"), SimdFeatures::SSE | SimdFeatures::MMXEXT),
        (std::arch::is_x86_feature_detected!("sse2"), SimdFeatures::SSE2),
        (std::arch::is_x86_feature_detected!("sse3"), SimdFeatures::SSE3),
        (std::arch::is_x86_feature_detected!("ssse3"), SimdFeatures::SSSE3),
        (std::arch::is_x86_feature_detected!("sse4.1"), SimdFeatures::SSE4),
        (std::arch::is_x86_feature_detected!("sse4.2"), SimdFeatures::SSE42),
        (std::arch::is_x86_feature_detected!("avx"), SimdFeatures::AVX),
        (std::arch::is_x86_feature_detected!("avx2"), SimdFeatures::AVX2),
        (std::arch::is_x86_feature_detected!("aes"), SimdFeatures::AES),
    ];
    for (present, flag) in checks {
        if present {
            features |= flag;
        }
    }
    features
}

#[cfg(target_arch = "aarch64")]
fn probe() -> SimdFeatures {
    if std::arch::is_aarch64_feature_detected!("neon") {
        SimdFeatures::NEON
    } else {
        SimdFeatures::empty()
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn probe() -> SimdFeatures {
    SimdFeatures::empty()
}

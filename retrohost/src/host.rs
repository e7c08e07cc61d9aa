//! The frontend services a core can reach through its callbacks.
//!
//! Video, audio and input backends are supplied by the embedding application. Every method has
//! a default that declines the request, so an implementation only overrides what it supports.
use std::ffi::CStr;

use crate::ffi;

/// A position report from a location service.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
}

pub trait Host {
    /// Applies a rotation of `rotation * 90` degrees counter-clockwise. Returns false if the
    /// video backend cannot rotate.
    fn set_rotation(&mut self, _rotation: u32) -> bool {
        false
    }

    /// The base geometry or aspect ratio changed; the viewport should be recomputed.
    fn aspect_ratio_changed(&mut self, _geometry: &ffi::retro_game_geometry) {}

    /// The core replaced its AV info; drivers should reinitialise.
    fn av_info_changed(&mut self, _av_info: &ffi::retro_system_av_info) {}

    /// The framebuffer object hardware rendered cores draw into.
    fn current_framebuffer(&mut self) -> usize {
        0
    }

    /// Resolves a rendering API entry point for a hardware rendered core.
    fn proc_address(&mut self, _symbol: &CStr) -> ffi::retro_proc_address_t {
        None
    }

    /// A bitmask of `1 << RETRO_DEVICE_*` for the devices the input backend provides, or
    /// `None` if it cannot tell.
    fn input_device_capabilities(&mut self) -> Option<u64> {
        None
    }

    fn poll_input(&mut self) {}

    fn input_state(&mut self, _port: u32, _device: u32, _index: u32, _id: u32) -> i16 {
        0
    }

    /// Interleaved stereo samples from the core.
    fn audio_samples(&mut self, _samples: &[i16]) {}

    fn set_rumble_state(&mut self, _port: u32, _effect: ffi::retro_rumble_effect, _strength: u16) -> bool {
        false
    }

    fn set_sensor_state(&mut self, _port: u32, _action: ffi::retro_sensor_action, _rate: u32) -> bool {
        false
    }

    fn sensor_input(&mut self, _port: u32, _id: u32) -> f32 {
        0.0
    }

    fn camera_start(&mut self) -> bool {
        false
    }

    fn camera_stop(&mut self) {}

    fn location_start(&mut self) -> bool {
        false
    }

    fn location_stop(&mut self) {}

    fn location_position(&mut self) -> Option<Position> {
        None
    }

    fn location_set_interval(&mut self, _interval_ms: u32, _interval_distance: u32) {}
}

/// A host without any backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl Host for NullHost {}

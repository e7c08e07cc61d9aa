//! C entry points handed to the core. Each one forwards to the active [`Environment`].
use log::Level;
use std::ffi::{c_char, c_uint, c_void, CStr};
use std::slice;

use super::with_active;
use crate::ffi;

pub(crate) unsafe extern "C" fn video_refresh(data: *const c_void, width: c_uint, height: c_uint, pitch: usize) {
    with_active(|env| env.capture_frame(data, width, height, pitch));
}

pub(crate) unsafe extern "C" fn audio_sample(left: i16, right: i16) {
    with_active(|env| env.host_mut().audio_samples(&[left, right]));
}

pub(crate) unsafe extern "C" fn audio_sample_batch(data: *const i16, frames: usize) -> usize {
    if data.is_null() {
        return 0;
    }
    let samples = slice::from_raw_parts(data, frames * 2);
    with_active(|env| env.host_mut().audio_samples(samples));
    frames
}

pub(crate) unsafe extern "C" fn input_poll() {
    with_active(|env| env.host_mut().poll_input());
}

pub(crate) unsafe extern "C" fn input_state(port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16 {
    with_active(|env| env.host_mut().input_state(port, device, index, id)).unwrap_or(0)
}

pub(crate) unsafe extern "C" fn hw_current_framebuffer() -> usize {
    with_active(|env| env.host_mut().current_framebuffer()).unwrap_or(0)
}

pub(crate) unsafe extern "C" fn hw_proc_address(sym: *const c_char) -> ffi::retro_proc_address_t {
    if sym.is_null() {
        return None;
    }
    let sym = CStr::from_ptr(sym);
    with_active(|env| env.host_mut().proc_address(sym)).flatten()
}

pub(crate) unsafe extern "C" fn set_rumble_state(
    port: c_uint,
    effect: ffi::retro_rumble_effect,
    strength: u16,
) -> bool {
    with_active(|env| env.host_mut().set_rumble_state(port, effect, strength)).unwrap_or(false)
}

pub(crate) unsafe extern "C" fn set_sensor_state(port: c_uint, action: ffi::retro_sensor_action, rate: c_uint) -> bool {
    with_active(|env| env.host_mut().set_sensor_state(port, action, rate)).unwrap_or(false)
}

pub(crate) unsafe extern "C" fn sensor_input(port: c_uint, id: c_uint) -> f32 {
    with_active(|env| env.host_mut().sensor_input(port, id)).unwrap_or(0.0)
}

pub(crate) unsafe extern "C" fn camera_start() -> bool {
    with_active(|env| env.host_mut().camera_start()).unwrap_or(false)
}

pub(crate) unsafe extern "C" fn camera_stop() {
    with_active(|env| env.host_mut().camera_stop());
}

pub(crate) unsafe extern "C" fn location_start() -> bool {
    with_active(|env| env.host_mut().location_start()).unwrap_or(false)
}

pub(crate) unsafe extern "C" fn location_stop() {
    with_active(|env| env.host_mut().location_stop());
}

pub(crate) unsafe extern "C" fn location_position(
    lat: *mut f64,
    lon: *mut f64,
    horiz_accuracy: *mut f64,
    vert_accuracy: *mut f64,
) -> bool {
    let Some(position) = with_active(|env| env.host_mut().location_position()).flatten() else {
        return false;
    };
    for (out, value) in [
        (lat, position.latitude),
        (lon, position.longitude),
        (horiz_accuracy, position.horizontal_accuracy),
        (vert_accuracy, position.vertical_accuracy),
    ] {
        if let Some(out) = out.as_mut() {
            *out = value;
        }
    }
    true
}

pub(crate) unsafe extern "C" fn location_set_interval(interval_ms: c_uint, interval_distance: c_uint) {
    with_active(|env| env.host_mut().location_set_interval(interval_ms, interval_distance));
}

pub(crate) unsafe extern "C" fn perf_register(counter: *mut ffi::retro_perf_counter) {
    with_active(|env| env.perf.register(counter));
}

pub(crate) unsafe extern "C" fn perf_log() {
    with_active(|env| env.perf.log());
}

/// Forwards a core's log line to the `log` facade. The format string is logged as is.
unsafe extern "C" fn log_message(level: ffi::retro_log_level, fmt: *const c_char) {
    if fmt.is_null() {
        return;
    }
    let level = match level {
        ffi::RETRO_LOG_DEBUG => Level::Debug,
        ffi::RETRO_LOG_INFO => Level::Info,
        ffi::RETRO_LOG_WARN => Level::Warn,
        _ => Level::Error,
    };
    let message = CStr::from_ptr(fmt).to_string_lossy();
    log::log!(target: "libretro", level, "{}", message.trim_end());
}

/// The `retro_log_printf_t` handed out through `GET_LOG_INTERFACE`.
pub(crate) fn log_printf() -> ffi::retro_log_printf_t {
    let log: unsafe extern "C" fn(ffi::retro_log_level, *const c_char) = log_message;
    // SAFETY: the callee reads only the two fixed arguments, which the C calling convention
    // passes the same way for variadic and non-variadic calls.
    Some(unsafe {
        std::mem::transmute::<
            unsafe extern "C" fn(ffi::retro_log_level, *const c_char),
            unsafe extern "C" fn(ffi::retro_log_level, *const c_char, ...),
        >(log)
    })
}

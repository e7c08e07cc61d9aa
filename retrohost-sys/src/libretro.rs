//! The libretro plugin interface, API version 1.
use std::ffi::{c_char, c_uint, c_void};

pub const RETRO_API_VERSION: c_uint = 1;

// Devices
pub const RETRO_DEVICE_TYPE_SHIFT: c_uint = 8;
pub const RETRO_DEVICE_MASK: c_uint = (1 << RETRO_DEVICE_TYPE_SHIFT) - 1;
pub const RETRO_DEVICE_NONE: c_uint = 0;
pub const RETRO_DEVICE_JOYPAD: c_uint = 1;
pub const RETRO_DEVICE_MOUSE: c_uint = 2;
pub const RETRO_DEVICE_KEYBOARD: c_uint = 3;
pub const RETRO_DEVICE_LIGHTGUN: c_uint = 4;
pub const RETRO_DEVICE_ANALOG: c_uint = 5;
pub const RETRO_DEVICE_POINTER: c_uint = 6;

pub const RETRO_DEVICE_ID_JOYPAD_B: c_uint = 0;
pub const RETRO_DEVICE_ID_JOYPAD_Y: c_uint = 1;
pub const RETRO_DEVICE_ID_JOYPAD_SELECT: c_uint = 2;
pub const RETRO_DEVICE_ID_JOYPAD_START: c_uint = 3;
pub const RETRO_DEVICE_ID_JOYPAD_UP: c_uint = 4;
pub const RETRO_DEVICE_ID_JOYPAD_DOWN: c_uint = 5;
pub const RETRO_DEVICE_ID_JOYPAD_LEFT: c_uint = 6;
pub const RETRO_DEVICE_ID_JOYPAD_RIGHT: c_uint = 7;
pub const RETRO_DEVICE_ID_JOYPAD_A: c_uint = 8;
pub const RETRO_DEVICE_ID_JOYPAD_X: c_uint = 9;
pub const RETRO_DEVICE_ID_JOYPAD_L: c_uint = 10;
pub const RETRO_DEVICE_ID_JOYPAD_R: c_uint = 11;
pub const RETRO_DEVICE_ID_JOYPAD_L2: c_uint = 12;
pub const RETRO_DEVICE_ID_JOYPAD_R2: c_uint = 13;
pub const RETRO_DEVICE_ID_JOYPAD_L3: c_uint = 14;
pub const RETRO_DEVICE_ID_JOYPAD_R3: c_uint = 15;

pub const RETRO_REGION_NTSC: c_uint = 0;
pub const RETRO_REGION_PAL: c_uint = 1;

pub type retro_language = c_uint;
pub const RETRO_LANGUAGE_ENGLISH: retro_language = 0;
pub const RETRO_LANGUAGE_JAPANESE: retro_language = 1;
pub const RETRO_LANGUAGE_FRENCH: retro_language = 2;
pub const RETRO_LANGUAGE_SPANISH: retro_language = 3;
pub const RETRO_LANGUAGE_GERMAN: retro_language = 4;
pub const RETRO_LANGUAGE_ITALIAN: retro_language = 5;
pub const RETRO_LANGUAGE_DUTCH: retro_language = 6;
pub const RETRO_LANGUAGE_PORTUGUESE: retro_language = 7;
pub const RETRO_LANGUAGE_RUSSIAN: retro_language = 8;
pub const RETRO_LANGUAGE_KOREAN: retro_language = 9;
pub const RETRO_LANGUAGE_CHINESE_TRADITIONAL: retro_language = 10;
pub const RETRO_LANGUAGE_CHINESE_SIMPLIFIED: retro_language = 11;

pub const RETRO_MEMORY_MASK: c_uint = 0xff;
pub const RETRO_MEMORY_SAVE_RAM: c_uint = 0;
pub const RETRO_MEMORY_RTC: c_uint = 1;
pub const RETRO_MEMORY_SYSTEM_RAM: c_uint = 2;
pub const RETRO_MEMORY_VIDEO_RAM: c_uint = 3;

// Environment commands. The set is append-only: codes are never renumbered.

/// Payloads for commands with this bit set may change shape between releases.
pub const RETRO_ENVIRONMENT_EXPERIMENTAL: c_uint = 0x10000;
/// Frontend-internal commands that are not part of the public interface.
pub const RETRO_ENVIRONMENT_PRIVATE: c_uint = 0x20000;

pub const RETRO_ENVIRONMENT_SET_ROTATION: c_uint = 1;
pub const RETRO_ENVIRONMENT_GET_OVERSCAN: c_uint = 2;
pub const RETRO_ENVIRONMENT_GET_CAN_DUPE: c_uint = 3;
pub const RETRO_ENVIRONMENT_SET_MESSAGE: c_uint = 6;
pub const RETRO_ENVIRONMENT_SHUTDOWN: c_uint = 7;
pub const RETRO_ENVIRONMENT_SET_PERFORMANCE_LEVEL: c_uint = 8;
pub const RETRO_ENVIRONMENT_GET_SYSTEM_DIRECTORY: c_uint = 9;
pub const RETRO_ENVIRONMENT_SET_PIXEL_FORMAT: c_uint = 10;
pub const RETRO_ENVIRONMENT_SET_INPUT_DESCRIPTORS: c_uint = 11;
pub const RETRO_ENVIRONMENT_SET_KEYBOARD_CALLBACK: c_uint = 12;
pub const RETRO_ENVIRONMENT_SET_DISK_CONTROL_INTERFACE: c_uint = 13;
pub const RETRO_ENVIRONMENT_SET_HW_RENDER: c_uint = 14;
pub const RETRO_ENVIRONMENT_GET_VARIABLE: c_uint = 15;
pub const RETRO_ENVIRONMENT_SET_VARIABLES: c_uint = 16;
pub const RETRO_ENVIRONMENT_GET_VARIABLE_UPDATE: c_uint = 17;
pub const RETRO_ENVIRONMENT_SET_SUPPORT_NO_GAME: c_uint = 18;
pub const RETRO_ENVIRONMENT_GET_LIBRETRO_PATH: c_uint = 19;
pub const RETRO_ENVIRONMENT_SET_FRAME_TIME_CALLBACK: c_uint = 21;
pub const RETRO_ENVIRONMENT_SET_AUDIO_CALLBACK: c_uint = 22;
pub const RETRO_ENVIRONMENT_GET_RUMBLE_INTERFACE: c_uint = 23;
pub const RETRO_ENVIRONMENT_GET_INPUT_DEVICE_CAPABILITIES: c_uint = 24;
pub const RETRO_ENVIRONMENT_GET_SENSOR_INTERFACE: c_uint = 25 | RETRO_ENVIRONMENT_EXPERIMENTAL;
pub const RETRO_ENVIRONMENT_GET_CAMERA_INTERFACE: c_uint = 26 | RETRO_ENVIRONMENT_EXPERIMENTAL;
pub const RETRO_ENVIRONMENT_GET_LOG_INTERFACE: c_uint = 27;
pub const RETRO_ENVIRONMENT_GET_PERF_INTERFACE: c_uint = 28;
pub const RETRO_ENVIRONMENT_GET_LOCATION_INTERFACE: c_uint = 29;
pub const RETRO_ENVIRONMENT_GET_CORE_ASSETS_DIRECTORY: c_uint = 30;
pub const RETRO_ENVIRONMENT_GET_CONTENT_DIRECTORY: c_uint = RETRO_ENVIRONMENT_GET_CORE_ASSETS_DIRECTORY;
pub const RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY: c_uint = 31;
pub const RETRO_ENVIRONMENT_SET_SYSTEM_AV_INFO: c_uint = 32;
pub const RETRO_ENVIRONMENT_SET_PROC_ADDRESS_CALLBACK: c_uint = 33;
pub const RETRO_ENVIRONMENT_SET_SUBSYSTEM_INFO: c_uint = 34;
pub const RETRO_ENVIRONMENT_SET_CONTROLLER_INFO: c_uint = 35;
pub const RETRO_ENVIRONMENT_SET_MEMORY_MAPS: c_uint = 36 | RETRO_ENVIRONMENT_EXPERIMENTAL;
pub const RETRO_ENVIRONMENT_SET_GEOMETRY: c_uint = 37;
pub const RETRO_ENVIRONMENT_GET_USERNAME: c_uint = 38;
pub const RETRO_ENVIRONMENT_GET_LANGUAGE: c_uint = 39;

/// Replace the running content with the path in the payload.
pub const RETRO_ENVIRONMENT_EXEC: c_uint = RETRO_ENVIRONMENT_PRIVATE;
/// Like [`RETRO_ENVIRONMENT_EXEC`], but the frontend process itself is replaced.
pub const RETRO_ENVIRONMENT_EXEC_ESCAPE: c_uint = RETRO_ENVIRONMENT_PRIVATE | 1;
/// Sets the core path used by the next exec.
pub const RETRO_ENVIRONMENT_SET_LIBRETRO_PATH: c_uint = RETRO_ENVIRONMENT_PRIVATE | 2;

// CPU features reported through `retro_perf_callback::get_cpu_features`.
pub const RETRO_SIMD_SSE: u64 = 1 << 0;
pub const RETRO_SIMD_SSE2: u64 = 1 << 1;
pub const RETRO_SIMD_VMX: u64 = 1 << 2;
pub const RETRO_SIMD_VMX128: u64 = 1 << 3;
pub const RETRO_SIMD_AVX: u64 = 1 << 4;
pub const RETRO_SIMD_NEON: u64 = 1 << 5;
pub const RETRO_SIMD_SSE3: u64 = 1 << 6;
pub const RETRO_SIMD_SSSE3: u64 = 1 << 7;
pub const RETRO_SIMD_MMX: u64 = 1 << 8;
pub const RETRO_SIMD_MMXEXT: u64 = 1 << 9;
pub const RETRO_SIMD_SSE4: u64 = 1 << 10;
pub const RETRO_SIMD_SSE42: u64 = 1 << 11;
pub const RETRO_SIMD_AVX2: u64 = 1 << 12;
pub const RETRO_SIMD_VFPU: u64 = 1 << 13;
pub const RETRO_SIMD_PS: u64 = 1 << 14;
pub const RETRO_SIMD_AES: u64 = 1 << 15;

pub type retro_pixel_format = c_uint;
/// 0RGB1555, native endian. The 0 bit must be zero. The default format.
pub const RETRO_PIXEL_FORMAT_0RGB1555: retro_pixel_format = 0;
/// XRGB8888, native endian. The X bits are ignored.
pub const RETRO_PIXEL_FORMAT_XRGB8888: retro_pixel_format = 1;
/// RGB565, native endian.
pub const RETRO_PIXEL_FORMAT_RGB565: retro_pixel_format = 2;
pub const RETRO_PIXEL_FORMAT_UNKNOWN: retro_pixel_format = i32::MAX as c_uint;

pub type retro_hw_context_type = c_uint;
pub const RETRO_HW_CONTEXT_NONE: retro_hw_context_type = 0;
/// OpenGL 2.x. Newer versions may be used as long as compatibility profile is kept.
pub const RETRO_HW_CONTEXT_OPENGL: retro_hw_context_type = 1;
pub const RETRO_HW_CONTEXT_OPENGLES2: retro_hw_context_type = 2;
/// Modern desktop core GL context. Uses `version_major`/`version_minor`.
pub const RETRO_HW_CONTEXT_OPENGL_CORE: retro_hw_context_type = 3;
pub const RETRO_HW_CONTEXT_OPENGLES3: retro_hw_context_type = 4;
/// GLES version given by `version_major`/`version_minor`.
pub const RETRO_HW_CONTEXT_OPENGLES_VERSION: retro_hw_context_type = 5;

pub type retro_log_level = c_uint;
pub const RETRO_LOG_DEBUG: retro_log_level = 0;
pub const RETRO_LOG_INFO: retro_log_level = 1;
pub const RETRO_LOG_WARN: retro_log_level = 2;
pub const RETRO_LOG_ERROR: retro_log_level = 3;

pub type retro_rumble_effect = c_uint;
pub const RETRO_RUMBLE_STRONG: retro_rumble_effect = 0;
pub const RETRO_RUMBLE_WEAK: retro_rumble_effect = 1;

pub type retro_sensor_action = c_uint;
pub const RETRO_SENSOR_ACCELEROMETER_ENABLE: retro_sensor_action = 0;
pub const RETRO_SENSOR_ACCELEROMETER_DISABLE: retro_sensor_action = 1;

pub const RETRO_SENSOR_ACCELEROMETER_X: c_uint = 0;
pub const RETRO_SENSOR_ACCELEROMETER_Y: c_uint = 1;
pub const RETRO_SENSOR_ACCELEROMETER_Z: c_uint = 2;

pub type retro_camera_buffer = c_uint;
pub const RETRO_CAMERA_BUFFER_OPENGL_TEXTURE: retro_camera_buffer = 0;
pub const RETRO_CAMERA_BUFFER_RAW_FRAMEBUFFER: retro_camera_buffer = 1;

pub const RETRO_MEMDESC_CONST: u64 = 1 << 0;
pub const RETRO_MEMDESC_BIGENDIAN: u64 = 1 << 1;

// Frontend callbacks handed to the core.

/// Passed to the video refresh callback when a hardware rendered core drew into the frontend's
/// framebuffer instead of handing over pixels.
pub const RETRO_HW_FRAME_BUFFER_VALID: *const c_void = usize::MAX as *const c_void;

pub type retro_environment_t = Option<unsafe extern "C" fn(cmd: c_uint, data: *mut c_void) -> bool>;
pub type retro_video_refresh_t =
    Option<unsafe extern "C" fn(data: *const c_void, width: c_uint, height: c_uint, pitch: usize)>;
pub type retro_audio_sample_t = Option<unsafe extern "C" fn(left: i16, right: i16)>;
pub type retro_audio_sample_batch_t =
    Option<unsafe extern "C" fn(data: *const i16, frames: usize) -> usize>;
pub type retro_input_poll_t = Option<unsafe extern "C" fn()>;
pub type retro_input_state_t =
    Option<unsafe extern "C" fn(port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16>;

// Core exports, in the order a frontend resolves them.

pub type retro_init_t = unsafe extern "C" fn();
pub type retro_deinit_t = unsafe extern "C" fn();
pub type retro_api_version_t = unsafe extern "C" fn() -> c_uint;
pub type retro_get_system_info_t = unsafe extern "C" fn(info: *mut retro_system_info);
pub type retro_get_system_av_info_t = unsafe extern "C" fn(info: *mut retro_system_av_info);
pub type retro_set_environment_t = unsafe extern "C" fn(cb: retro_environment_t);
pub type retro_set_video_refresh_t = unsafe extern "C" fn(cb: retro_video_refresh_t);
pub type retro_set_audio_sample_t = unsafe extern "C" fn(cb: retro_audio_sample_t);
pub type retro_set_audio_sample_batch_t = unsafe extern "C" fn(cb: retro_audio_sample_batch_t);
pub type retro_set_input_poll_t = unsafe extern "C" fn(cb: retro_input_poll_t);
pub type retro_set_input_state_t = unsafe extern "C" fn(cb: retro_input_state_t);
pub type retro_set_controller_port_device_t = unsafe extern "C" fn(port: c_uint, device: c_uint);
pub type retro_reset_t = unsafe extern "C" fn();
pub type retro_run_t = unsafe extern "C" fn();
pub type retro_serialize_size_t = unsafe extern "C" fn() -> usize;
pub type retro_serialize_t = unsafe extern "C" fn(data: *mut c_void, size: usize) -> bool;
pub type retro_unserialize_t = unsafe extern "C" fn(data: *const c_void, size: usize) -> bool;
pub type retro_cheat_reset_t = unsafe extern "C" fn();
pub type retro_cheat_set_t = unsafe extern "C" fn(index: c_uint, enabled: bool, code: *const c_char);
pub type retro_load_game_t = unsafe extern "C" fn(game: *const retro_game_info) -> bool;
pub type retro_load_game_special_t =
    unsafe extern "C" fn(game_type: c_uint, info: *const retro_game_info, num_info: usize) -> bool;
pub type retro_unload_game_t = unsafe extern "C" fn();
pub type retro_get_region_t = unsafe extern "C" fn() -> c_uint;
pub type retro_get_memory_data_t = unsafe extern "C" fn(id: c_uint) -> *mut c_void;
pub type retro_get_memory_size_t = unsafe extern "C" fn(id: c_uint) -> usize;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_system_info {
    /// Descriptive name of the library. Should not contain any version numbers, etc.
    pub library_name: *const c_char,
    /// Descriptive version of the core.
    pub library_version: *const c_char,
    /// A string listing probably content extensions the core will be able to load, separated
    /// with pipe. I.e. "bin|rom|iso".
    pub valid_extensions: *const c_char,
    /// If true, `retro_load_game` is guaranteed to provide a valid pathname and `data` is not
    /// filled in.
    pub need_fullpath: bool,
    /// If true, the frontend is not allowed to extract any archives before loading the content.
    pub block_extract: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct retro_game_geometry {
    /// Nominal video width of game.
    pub base_width: c_uint,
    /// Nominal video height of game.
    pub base_height: c_uint,
    /// Maximum possible width of game.
    pub max_width: c_uint,
    /// Maximum possible height of game.
    pub max_height: c_uint,
    /// Nominal aspect ratio of game. If aspect_ratio is <= 0.0, an aspect ratio of
    /// base_width / base_height is assumed.
    pub aspect_ratio: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct retro_system_timing {
    /// FPS of video content.
    pub fps: f64,
    /// Sampling rate of audio.
    pub sample_rate: f64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct retro_system_av_info {
    pub geometry: retro_game_geometry,
    pub timing: retro_system_timing,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_game_info {
    /// Path to game, UTF-8 encoded. Usually used as a reference. May be null if rom was loaded
    /// from stdin or similar.
    pub path: *const c_char,
    /// Memory buffer of loaded game. Will be null if need_fullpath was set.
    pub data: *const c_void,
    /// Size of memory buffer.
    pub size: usize,
    /// String of implementation specific meta-data.
    pub meta: *const c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_variable {
    /// Variable to query in GET_VARIABLE, or to set in SET_VARIABLES.
    pub key: *const c_char,
    /// Value to be obtained. If key does not exist, it is set to null.
    pub value: *const c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_message {
    /// Message to be displayed.
    pub msg: *const c_char,
    /// Duration in frames of message.
    pub frames: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_input_descriptor {
    /// Associates given parameters with a description.
    pub port: c_uint,
    pub device: c_uint,
    pub index: c_uint,
    pub id: c_uint,
    /// Human readable description for parameters. The pointer must remain valid until
    /// `retro_unload_game` is called.
    pub description: *const c_char,
}

pub type retro_keyboard_event_t = Option<
    unsafe extern "C" fn(down: bool, keycode: c_uint, character: u32, key_modifiers: u16),
>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_keyboard_callback {
    pub callback: retro_keyboard_event_t,
}

pub type retro_set_eject_state_t = Option<unsafe extern "C" fn(ejected: bool) -> bool>;
pub type retro_get_eject_state_t = Option<unsafe extern "C" fn() -> bool>;
pub type retro_get_image_index_t = Option<unsafe extern "C" fn() -> c_uint>;
pub type retro_set_image_index_t = Option<unsafe extern "C" fn(index: c_uint) -> bool>;
pub type retro_get_num_images_t = Option<unsafe extern "C" fn() -> c_uint>;
pub type retro_replace_image_index_t =
    Option<unsafe extern "C" fn(index: c_uint, info: *const retro_game_info) -> bool>;
pub type retro_add_image_index_t = Option<unsafe extern "C" fn() -> bool>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_disk_control_callback {
    pub set_eject_state: retro_set_eject_state_t,
    pub get_eject_state: retro_get_eject_state_t,
    pub get_image_index: retro_get_image_index_t,
    pub set_image_index: retro_set_image_index_t,
    pub get_num_images: retro_get_num_images_t,
    pub replace_image_index: retro_replace_image_index_t,
    pub add_image_index: retro_add_image_index_t,
}

pub type retro_hw_context_reset_t = Option<unsafe extern "C" fn()>;
pub type retro_hw_get_current_framebuffer_t = Option<unsafe extern "C" fn() -> usize>;
pub type retro_proc_address_t = Option<unsafe extern "C" fn()>;
pub type retro_hw_get_proc_address_t =
    Option<unsafe extern "C" fn(sym: *const c_char) -> retro_proc_address_t>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_hw_render_callback {
    /// Which API to use. Set by core.
    pub context_type: retro_hw_context_type,
    /// Called when a context has been created or when it has been reset.
    pub context_reset: retro_hw_context_reset_t,
    /// Set by frontend.
    pub get_current_framebuffer: retro_hw_get_current_framebuffer_t,
    /// Set by frontend.
    pub get_proc_address: retro_hw_get_proc_address_t,
    /// Set if render buffers should have depth component attached.
    pub depth: bool,
    /// Set if stencil buffers should be attached. Cores built against the experimental
    /// variant of the command do not know about this field or anything after it.
    pub stencil: bool,
    /// If depth and stencil are true, a packed 24/8 buffer will be added. Only attaching
    /// stencil is invalid and will be ignored.
    pub bottom_left_origin: bool,
    /// Major version number for core GL context or GLES 3.1+.
    pub version_major: c_uint,
    /// Minor version number for core GL context or GLES 3.1+.
    pub version_minor: c_uint,
    /// If this is true, the frontend will go very far to avoid resetting context in scenarios
    /// like toggling fullscreen, etc.
    pub cache_context: bool,
    /// A callback to be called before the context is destroyed in a controlled way.
    pub context_destroy: retro_hw_context_reset_t,
    /// Creates a debug context.
    pub debug_context: bool,
}

pub type retro_usec_t = i64;
pub type retro_frame_time_callback_t = Option<unsafe extern "C" fn(usec: retro_usec_t)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_frame_time_callback {
    pub callback: retro_frame_time_callback_t,
    /// Represents the time of one frame. It is computed as 1000000 / fps, but the
    /// implementation will resolve the rounding to ensure that framestepping, etc is exact.
    pub reference: retro_usec_t,
}

pub type retro_audio_callback_t = Option<unsafe extern "C" fn()>;
pub type retro_audio_set_state_callback_t = Option<unsafe extern "C" fn(enabled: bool)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_audio_callback {
    pub callback: retro_audio_callback_t,
    pub set_state: retro_audio_set_state_callback_t,
}

pub type retro_set_rumble_state_t =
    Option<unsafe extern "C" fn(port: c_uint, effect: retro_rumble_effect, strength: u16) -> bool>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_rumble_interface {
    pub set_rumble_state: retro_set_rumble_state_t,
}

pub type retro_set_sensor_state_t =
    Option<unsafe extern "C" fn(port: c_uint, action: retro_sensor_action, rate: c_uint) -> bool>;
pub type retro_sensor_get_input_t = Option<unsafe extern "C" fn(port: c_uint, id: c_uint) -> f32>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_sensor_interface {
    pub set_sensor_state: retro_set_sensor_state_t,
    pub get_sensor_input: retro_sensor_get_input_t,
}

pub type retro_camera_start_t = Option<unsafe extern "C" fn() -> bool>;
pub type retro_camera_stop_t = Option<unsafe extern "C" fn()>;
pub type retro_camera_lifetime_status_t = Option<unsafe extern "C" fn()>;
pub type retro_camera_frame_raw_framebuffer_t =
    Option<unsafe extern "C" fn(buffer: *const u32, width: c_uint, height: c_uint, pitch: usize)>;
pub type retro_camera_frame_opengl_texture_t =
    Option<unsafe extern "C" fn(texture_id: c_uint, texture_target: c_uint, affine: *const f32)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_camera_callback {
    /// Set by core. Bitmask of `1 << retro_camera_buffer` values.
    pub caps: u64,
    /// Desired resolution for camera. Is only used as a hint.
    pub width: c_uint,
    pub height: c_uint,
    /// Set by frontend.
    pub start: retro_camera_start_t,
    /// Set by frontend.
    pub stop: retro_camera_stop_t,
    /// Set by core if raw framebuffer callbacks will be used.
    pub frame_raw_framebuffer: retro_camera_frame_raw_framebuffer_t,
    /// Set by core if OpenGL texture callbacks will be used.
    pub frame_opengl_texture: retro_camera_frame_opengl_texture_t,
    /// Set by core. Called after the camera driver is initialized and ready to be started.
    pub initialized: retro_camera_lifetime_status_t,
    /// Set by core. Called right before the camera driver is deinitialized.
    pub deinitialized: retro_camera_lifetime_status_t,
}

pub type retro_location_set_interval_t =
    Option<unsafe extern "C" fn(interval_ms: c_uint, interval_distance: c_uint)>;
pub type retro_location_start_t = Option<unsafe extern "C" fn() -> bool>;
pub type retro_location_stop_t = Option<unsafe extern "C" fn()>;
pub type retro_location_get_position_t = Option<
    unsafe extern "C" fn(lat: *mut f64, lon: *mut f64, horiz_accuracy: *mut f64, vert_accuracy: *mut f64) -> bool,
>;
pub type retro_location_lifetime_status_t = Option<unsafe extern "C" fn()>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_location_callback {
    pub start: retro_location_start_t,
    pub stop: retro_location_stop_t,
    pub get_position: retro_location_get_position_t,
    pub set_interval: retro_location_set_interval_t,
    pub initialized: retro_location_lifetime_status_t,
    pub deinitialized: retro_location_lifetime_status_t,
}

pub type retro_log_printf_t =
    Option<unsafe extern "C" fn(level: retro_log_level, fmt: *const c_char, ...)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_log_callback {
    pub log: retro_log_printf_t,
}

pub type retro_perf_tick_t = u64;
pub type retro_time_t = i64;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_perf_counter {
    pub ident: *const c_char,
    pub start: retro_perf_tick_t,
    pub total: retro_perf_tick_t,
    pub call_cnt: retro_perf_tick_t,
    pub registered: bool,
}

pub type retro_perf_get_time_usec_t = Option<unsafe extern "C" fn() -> retro_time_t>;
pub type retro_perf_get_counter_t = Option<unsafe extern "C" fn() -> retro_perf_tick_t>;
pub type retro_get_cpu_features_t = Option<unsafe extern "C" fn() -> u64>;
pub type retro_perf_log_t = Option<unsafe extern "C" fn()>;
pub type retro_perf_register_t = Option<unsafe extern "C" fn(counter: *mut retro_perf_counter)>;
pub type retro_perf_start_t = Option<unsafe extern "C" fn(counter: *mut retro_perf_counter)>;
pub type retro_perf_stop_t = Option<unsafe extern "C" fn(counter: *mut retro_perf_counter)>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_perf_callback {
    pub get_time_usec: retro_perf_get_time_usec_t,
    pub get_cpu_features: retro_get_cpu_features_t,
    pub get_perf_counter: retro_perf_get_counter_t,
    pub perf_register: retro_perf_register_t,
    pub perf_start: retro_perf_start_t,
    pub perf_stop: retro_perf_stop_t,
    pub perf_log: retro_perf_log_t,
}

pub type retro_get_proc_address_t =
    Option<unsafe extern "C" fn(sym: *const c_char) -> retro_proc_address_t>;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_get_proc_address_interface {
    pub get_proc_address: retro_get_proc_address_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_subsystem_memory_info {
    /// The extension associated with a memory type, e.g. "psram".
    pub extension: *const c_char,
    /// The memory type for retro_get_memory(). This should be at least 0x100 to avoid
    /// conflict with standardized libretro memory types.
    pub type_: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_subsystem_rom_info {
    /// Describes what the content is (SGB BIOS, GB ROM, etc).
    pub desc: *const c_char,
    /// Same definition as retro_get_system_info().
    pub valid_extensions: *const c_char,
    /// Same definition as retro_get_system_info().
    pub need_fullpath: bool,
    /// Same definition as retro_get_system_info().
    pub block_extract: bool,
    /// This is set if the content is required to load a game. If this is set to false, a
    /// zeroed-out retro_game_info can be passed.
    pub required: bool,
    /// Content can have multiple associated persistent memory types (retro_get_memory()).
    pub memory: *const retro_subsystem_memory_info,
    pub num_memory: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_subsystem_info {
    /// Describes the subsystem type.
    pub desc: *const c_char,
    /// A computer friendly short string identifier for the subsystem type.
    pub ident: *const c_char,
    /// Infos for each content file. The first entry is assumed to be the "most significant"
    /// content for frontend purposes.
    pub roms: *const retro_subsystem_rom_info,
    /// Number of content files associated with a subsystem.
    pub num_roms: c_uint,
    /// The type passed to retro_load_game_special().
    pub id: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_controller_description {
    /// Human-readable description of the controller.
    pub desc: *const c_char,
    /// Device type passed to retro_set_controller_port_device().
    pub id: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_controller_info {
    pub types: *const retro_controller_description,
    pub num_types: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_memory_descriptor {
    pub flags: u64,
    /// Pointer to the start of the relevant ROM or RAM chip.
    pub ptr: *mut c_void,
    pub offset: usize,
    /// Location in the emulated address space where the mapping starts.
    pub start: usize,
    /// Which bits must be the same as in 'start' for this mapping to apply.
    pub select: usize,
    /// If this is nonzero, the set bits are assumed not connected to the memory chip's
    /// address pins.
    pub disconnect: usize,
    /// Amount of bytes in the current region.
    pub len: usize,
    /// Name of the address space.
    pub addrspace: *const c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct retro_memory_map {
    pub descriptors: *const retro_memory_descriptor,
    pub num_descriptors: c_uint,
}

crate::zeroed_default!(
    retro_system_info,
    retro_game_geometry,
    retro_system_timing,
    retro_system_av_info,
    retro_game_info,
    retro_variable,
    retro_message,
    retro_input_descriptor,
    retro_keyboard_callback,
    retro_disk_control_callback,
    retro_hw_render_callback,
    retro_frame_time_callback,
    retro_audio_callback,
    retro_rumble_interface,
    retro_sensor_interface,
    retro_camera_callback,
    retro_location_callback,
    retro_log_callback,
    retro_perf_counter,
    retro_perf_callback,
    retro_get_proc_address_interface,
    retro_subsystem_memory_info,
    retro_subsystem_rom_info,
    retro_subsystem_info,
    retro_controller_description,
    retro_controller_info,
    retro_memory_descriptor,
    retro_memory_map,
);

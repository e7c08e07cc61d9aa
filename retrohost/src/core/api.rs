use std::ffi::{c_void, CStr};
use std::path::Path;

use crate::ffi;

/// The exported interface of a libretro core, one method per export.
///
/// Callers are expected to follow the libretro call order (`set_environment`, `init`,
/// `load_game`, `run`, ..., `unload_game`, `deinit`); implementations do not enforce it.
pub trait CoreApi {
    fn init(&self);
    fn deinit(&self);
    fn api_version(&self) -> u32;
    fn get_system_info(&self) -> ffi::retro_system_info;
    fn get_system_av_info(&self) -> ffi::retro_system_av_info;

    fn set_environment(&self, cb: ffi::retro_environment_t);
    fn set_video_refresh(&self, cb: ffi::retro_video_refresh_t);
    fn set_audio_sample(&self, cb: ffi::retro_audio_sample_t);
    fn set_audio_sample_batch(&self, cb: ffi::retro_audio_sample_batch_t);
    fn set_input_poll(&self, cb: ffi::retro_input_poll_t);
    fn set_input_state(&self, cb: ffi::retro_input_state_t);
    fn set_controller_port_device(&self, port: u32, device: u32);

    fn reset(&self);
    fn run(&self);

    fn serialize_size(&self) -> usize;
    fn serialize(&self, data: &mut [u8]) -> bool;
    fn unserialize(&self, data: &[u8]) -> bool;

    fn cheat_reset(&self);
    fn cheat_set(&self, index: u32, enabled: bool, code: &CStr);

    /// Loads content. `None` starts the core without content.
    fn load_game(&self, game: Option<&ffi::retro_game_info>) -> bool;
    fn load_game_special(&self, game_type: u32, info: &[ffi::retro_game_info]) -> bool;
    fn unload_game(&self);

    fn get_region(&self) -> u32;
    fn get_memory_data(&self, id: u32) -> *mut c_void;
    fn get_memory_size(&self, id: u32) -> usize;

    /// The library the core was bound from, `None` for built-in cores.
    fn path(&self) -> Option<&Path> {
        None
    }

    fn is_dummy(&self) -> bool {
        false
    }
}

use std::ffi::{c_void, CStr};
use std::ptr;

use super::CoreApi;
use crate::ffi;

/// The built-in core used while no real core is loaded.
///
/// Every entry is a no-op returning zero, false or an empty value.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyCore;

impl DummyCore {
    pub const LIBRARY_NAME: &'static CStr = c"No Core";
    pub const LIBRARY_VERSION: &'static CStr = c"";
}

impl CoreApi for DummyCore {
    fn init(&self) {}

    fn deinit(&self) {}

    fn api_version(&self) -> u32 {
        ffi::RETRO_API_VERSION
    }

    fn get_system_info(&self) -> ffi::retro_system_info {
        ffi::retro_system_info {
            library_name: Self::LIBRARY_NAME.as_ptr(),
            library_version: Self::LIBRARY_VERSION.as_ptr(),
            valid_extensions: ptr::null(),
            need_fullpath: false,
            block_extract: false,
        }
    }

    fn get_system_av_info(&self) -> ffi::retro_system_av_info {
        ffi::retro_system_av_info::default()
    }

    fn set_environment(&self, _cb: ffi::retro_environment_t) {}

    fn set_video_refresh(&self, _cb: ffi::retro_video_refresh_t) {}

    fn set_audio_sample(&self, _cb: ffi::retro_audio_sample_t) {}

    fn set_audio_sample_batch(&self, _cb: ffi::retro_audio_sample_batch_t) {}

    fn set_input_poll(&self, _cb: ffi::retro_input_poll_t) {}

    fn set_input_state(&self, _cb: ffi::retro_input_state_t) {}

    fn set_controller_port_device(&self, _port: u32, _device: u32) {}

    fn reset(&self) {}

    fn run(&self) {}

    fn serialize_size(&self) -> usize {
        0
    }

    fn serialize(&self, _data: &mut [u8]) -> bool {
        false
    }

    fn unserialize(&self, _data: &[u8]) -> bool {
        false
    }

    fn cheat_reset(&self) {}

    fn cheat_set(&self, _index: u32, _enabled: bool, _code: &CStr) {}

    fn load_game(&self, _game: Option<&ffi::retro_game_info>) -> bool {
        false
    }

    fn load_game_special(&self, _game_type: u32, _info: &[ffi::retro_game_info]) -> bool {
        false
    }

    fn unload_game(&self) {}

    fn get_region(&self) -> u32 {
        ffi::RETRO_REGION_NTSC
    }

    fn get_memory_data(&self, _id: u32) -> *mut c_void {
        ptr::null_mut()
    }

    fn get_memory_size(&self, _id: u32) -> usize {
        0
    }

    fn is_dummy(&self) -> bool {
        true
    }
}

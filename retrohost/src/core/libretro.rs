use log::error;
use std::ffi::{c_void, CStr};
use std::path::{Path, PathBuf};
use std::ptr;

use super::{CoreApi, CoreError, CoreResult};
use crate::dylib::{Library, Loader};
use crate::ffi;

macro_rules! core_symbols {
    ($($field:ident: $ty:ty = $name:literal),* $(,)?) => {
        #[derive(Clone, Copy)]
        struct Symbols {
            $($field: $ty,)*
        }

        /// Names of the exports a libretro core must provide, in resolution order.
        pub const SYMBOL_NAMES: &[&str] = &[$($name),*];

        impl Symbols {
            fn resolve(library: &dyn Library) -> CoreResult<Self> {
                Ok(Self {
                    $($field: {
                        let symbol = library.symbol($name).ok_or_else(|| {
                            error!("Failed to load symbol \"{}\" from {}", $name, library.path().display());
                            CoreError::MissingSymbol($name)
                        })?;
                        // SAFETY: the export has the type the libretro ABI assigns to it.
                        unsafe { symbol.cast::<$ty>() }
                    },)*
                })
            }
        }
    };
}

core_symbols! {
    init: ffi::retro_init_t = "retro_init",
    deinit: ffi::retro_deinit_t = "retro_deinit",
    api_version: ffi::retro_api_version_t = "retro_api_version",
    get_system_info: ffi::retro_get_system_info_t = "retro_get_system_info",
    get_system_av_info: ffi::retro_get_system_av_info_t = "retro_get_system_av_info",
    set_environment: ffi::retro_set_environment_t = "retro_set_environment",
    set_video_refresh: ffi::retro_set_video_refresh_t = "retro_set_video_refresh",
    set_audio_sample: ffi::retro_set_audio_sample_t = "retro_set_audio_sample",
    set_audio_sample_batch: ffi::retro_set_audio_sample_batch_t = "retro_set_audio_sample_batch",
    set_input_poll: ffi::retro_set_input_poll_t = "retro_set_input_poll",
    set_input_state: ffi::retro_set_input_state_t = "retro_set_input_state",
    set_controller_port_device: ffi::retro_set_controller_port_device_t = "retro_set_controller_port_device",
    reset: ffi::retro_reset_t = "retro_reset",
    run: ffi::retro_run_t = "retro_run",
    serialize_size: ffi::retro_serialize_size_t = "retro_serialize_size",
    serialize: ffi::retro_serialize_t = "retro_serialize",
    unserialize: ffi::retro_unserialize_t = "retro_unserialize",
    cheat_reset: ffi::retro_cheat_reset_t = "retro_cheat_reset",
    cheat_set: ffi::retro_cheat_set_t = "retro_cheat_set",
    load_game: ffi::retro_load_game_t = "retro_load_game",
    load_game_special: ffi::retro_load_game_special_t = "retro_load_game_special",
    unload_game: ffi::retro_unload_game_t = "retro_unload_game",
    get_region: ffi::retro_get_region_t = "retro_get_region",
    get_memory_data: ffi::retro_get_memory_data_t = "retro_get_memory_data",
    get_memory_size: ffi::retro_get_memory_size_t = "retro_get_memory_size",
}

/// A core bound to a dynamically loaded library.
///
/// The library stays open for as long as this value lives; every entry points into it.
pub struct LibretroCore {
    symbols: Symbols,
    path: PathBuf,
    // Declared last so it is closed after everything that points into it.
    _library: Box<dyn Library>,
}

impl LibretroCore {
    /// Opens `path` and resolves every export. On failure the library is closed before the
    /// error is returned.
    pub fn open(loader: &dyn Loader, path: &Path) -> CoreResult<Self> {
        let library = loader.open(path)?;
        let symbols = Symbols::resolve(library.as_ref())?;
        Ok(Self {
            symbols,
            path: path.to_path_buf(),
            _library: library,
        })
    }
}

impl std::fmt::Debug for LibretroCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibretroCore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// SAFETY (for every call below): the symbols were resolved from `_library`, which outlives
// them, and the arguments match the exported signatures.
impl CoreApi for LibretroCore {
    fn init(&self) {
        unsafe { (self.symbols.init)() }
    }

    fn deinit(&self) {
        unsafe { (self.symbols.deinit)() }
    }

    fn api_version(&self) -> u32 {
        unsafe { (self.symbols.api_version)() }
    }

    fn get_system_info(&self) -> ffi::retro_system_info {
        let mut info = ffi::retro_system_info::default();
        unsafe { (self.symbols.get_system_info)(&mut info) };
        info
    }

    fn get_system_av_info(&self) -> ffi::retro_system_av_info {
        let mut info = ffi::retro_system_av_info::default();
        unsafe { (self.symbols.get_system_av_info)(&mut info) };
        info
    }

    fn set_environment(&self, cb: ffi::retro_environment_t) {
        unsafe { (self.symbols.set_environment)(cb) }
    }

    fn set_video_refresh(&self, cb: ffi::retro_video_refresh_t) {
        unsafe { (self.symbols.set_video_refresh)(cb) }
    }

    fn set_audio_sample(&self, cb: ffi::retro_audio_sample_t) {
        unsafe { (self.symbols.set_audio_sample)(cb) }
    }

    fn set_audio_sample_batch(&self, cb: ffi::retro_audio_sample_batch_t) {
        unsafe { (self.symbols.set_audio_sample_batch)(cb) }
    }

    fn set_input_poll(&self, cb: ffi::retro_input_poll_t) {
        unsafe { (self.symbols.set_input_poll)(cb) }
    }

    fn set_input_state(&self, cb: ffi::retro_input_state_t) {
        unsafe { (self.symbols.set_input_state)(cb) }
    }

    fn set_controller_port_device(&self, port: u32, device: u32) {
        unsafe { (self.symbols.set_controller_port_device)(port, device) }
    }

    fn reset(&self) {
        unsafe { (self.symbols.reset)() }
    }

    fn run(&self) {
        unsafe { (self.symbols.run)() }
    }

    fn serialize_size(&self) -> usize {
        unsafe { (self.symbols.serialize_size)() }
    }

    fn serialize(&self, data: &mut [u8]) -> bool {
        unsafe { (self.symbols.serialize)(data.as_mut_ptr().cast(), data.len()) }
    }

    fn unserialize(&self, data: &[u8]) -> bool {
        unsafe { (self.symbols.unserialize)(data.as_ptr().cast(), data.len()) }
    }

    fn cheat_reset(&self) {
        unsafe { (self.symbols.cheat_reset)() }
    }

    fn cheat_set(&self, index: u32, enabled: bool, code: &CStr) {
        unsafe { (self.symbols.cheat_set)(index, enabled, code.as_ptr()) }
    }

    fn load_game(&self, game: Option<&ffi::retro_game_info>) -> bool {
        let game = game.map_or(ptr::null(), |g| g as *const _);
        unsafe { (self.symbols.load_game)(game) }
    }

    fn load_game_special(&self, game_type: u32, info: &[ffi::retro_game_info]) -> bool {
        unsafe { (self.symbols.load_game_special)(game_type, info.as_ptr(), info.len()) }
    }

    fn unload_game(&self) {
        unsafe { (self.symbols.unload_game)() }
    }

    fn get_region(&self) -> u32 {
        unsafe { (self.symbols.get_region)() }
    }

    fn get_memory_data(&self, id: u32) -> *mut c_void {
        unsafe { (self.symbols.get_memory_data)(id) }
    }

    fn get_memory_size(&self, id: u32) -> usize {
        unsafe { (self.symbols.get_memory_size)(id) }
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

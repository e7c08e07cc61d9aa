//! Test doubles shared by the integration tests: a loader serving in-process functions as
//! library exports, two fake cores and a few fake softfilters.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::{c_char, c_uint, c_void, CStr};
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::Rc;

use retrohost::dylib::{DylibError, DylibResult, Library, Loader, RawSymbol};
use retrohost::ffi;
use retrohost::filter::{FilterConfig, FilterParams, FrameJob, SoftFilter};
use retrohost::format::FilterFormats;

pub type Exports = Vec<(&'static str, RawSymbol)>;

/// Serves registered export tables as libraries and counts the handles still open.
#[derive(Default)]
pub struct MockLoader {
    libraries: HashMap<PathBuf, Exports>,
    open: Rc<Cell<usize>>,
}

struct MockLibrary {
    path: PathBuf,
    exports: Exports,
    open: Rc<Cell<usize>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(mut self, path: impl Into<PathBuf>, exports: Exports) -> Self {
        self.libraries.insert(path.into(), exports);
        self
    }

    /// Shared counter of open handles; stays readable after the loader is moved.
    pub fn handles(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.open)
    }
}

impl Loader for MockLoader {
    fn open(&self, path: &Path) -> DylibResult<Box<dyn Library>> {
        let exports = self.libraries.get(path).ok_or_else(|| DylibError::Open {
            path: path.to_path_buf(),
            reason: "not registered".into(),
        })?;
        self.open.set(self.open.get() + 1);
        Ok(Box::new(MockLibrary {
            path: path.to_path_buf(),
            exports: exports.clone(),
            open: Rc::clone(&self.open),
        }))
    }

    fn lookup_self(&self, _name: &str) -> Option<RawSymbol> {
        None
    }
}

impl Library for MockLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn symbol(&self, name: &str) -> Option<RawSymbol> {
        self.exports.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
    }
}

impl Drop for MockLibrary {
    fn drop(&mut self) {
        self.open.set(self.open.get() - 1);
    }
}

macro_rules! exports {
    ($($name:literal => $f:expr),* $(,)?) => {
        vec![$(($name, RawSymbol::new($f as *const () as *mut c_void).unwrap())),*]
    };
}

/// What the fake cores did, per thread.
#[derive(Debug, Default)]
pub struct CoreLog {
    pub inits: usize,
    pub deinits: usize,
    pub runs: usize,
    pub loaded_path: Option<String>,
    pub loaded_bytes: usize,
    pub unloads: usize,
    /// Results of the commands sent from `retro_set_environment`, in order.
    pub answers: Vec<(c_uint, bool)>,
}

thread_local! {
    pub static CORE_LOG: RefCell<CoreLog> = RefCell::new(CoreLog::default());
    static VIDEO: Cell<ffi::retro_video_refresh_t> = const { Cell::new(None) };
}

pub fn core_log<R>(f: impl FnOnce(&CoreLog) -> R) -> R {
    CORE_LOG.with(|log| f(&log.borrow()))
}

pub const FRAME_WIDTH: u32 = 4;
pub const FRAME_HEIGHT: u32 = 2;
static FRAME: [u32; 8] = [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x00ff_ffff, 0, 0, 0, 0x0080_8080];

unsafe fn negotiate(cb: ffi::retro_environment_t, format: ffi::retro_pixel_format, no_game: bool) {
    let Some(cb) = cb else { return };
    let mut format = format;
    let mut no_game = no_game;
    let answers = [
        (
            ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT,
            cb(ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, (&mut format as *mut ffi::retro_pixel_format).cast()),
        ),
        (
            ffi::RETRO_ENVIRONMENT_SET_SUPPORT_NO_GAME,
            cb(ffi::RETRO_ENVIRONMENT_SET_SUPPORT_NO_GAME, (&mut no_game as *mut bool).cast()),
        ),
    ];
    CORE_LOG.with(|log| log.borrow_mut().answers.extend(answers));
}

unsafe extern "C" fn a_set_environment(cb: ffi::retro_environment_t) {
    negotiate(cb, ffi::RETRO_PIXEL_FORMAT_XRGB8888, true);
}

unsafe extern "C" fn b_set_environment(cb: ffi::retro_environment_t) {
    negotiate(cb, ffi::RETRO_PIXEL_FORMAT_RGB565, false);
}

unsafe extern "C" fn a_get_system_info(info: *mut ffi::retro_system_info) {
    *info = ffi::retro_system_info {
        library_name: c"Fake A".as_ptr(),
        library_version: c"1.0".as_ptr(),
        valid_extensions: c"bin|rom".as_ptr(),
        need_fullpath: false,
        block_extract: false,
    };
}

unsafe extern "C" fn b_get_system_info(info: *mut ffi::retro_system_info) {
    *info = ffi::retro_system_info {
        library_name: c"Fake B".as_ptr(),
        library_version: c"2.1".as_ptr(),
        valid_extensions: c"iso".as_ptr(),
        need_fullpath: true,
        block_extract: true,
    };
}

unsafe extern "C" fn get_system_av_info(info: *mut ffi::retro_system_av_info) {
    *info = ffi::retro_system_av_info {
        geometry: ffi::retro_game_geometry {
            base_width: FRAME_WIDTH,
            base_height: FRAME_HEIGHT,
            max_width: FRAME_WIDTH,
            max_height: FRAME_HEIGHT,
            aspect_ratio: 2.0,
        },
        timing: ffi::retro_system_timing {
            fps: 60.0,
            sample_rate: 48000.0,
        },
    };
}

unsafe extern "C" fn init() {
    CORE_LOG.with(|log| log.borrow_mut().inits += 1);
}

unsafe extern "C" fn deinit() {
    CORE_LOG.with(|log| log.borrow_mut().deinits += 1);
}

unsafe extern "C" fn api_version() -> c_uint {
    ffi::RETRO_API_VERSION
}

unsafe extern "C" fn set_video_refresh(cb: ffi::retro_video_refresh_t) {
    VIDEO.with(|v| v.set(cb));
}

unsafe extern "C" fn set_audio_sample(_cb: ffi::retro_audio_sample_t) {}
unsafe extern "C" fn set_audio_sample_batch(_cb: ffi::retro_audio_sample_batch_t) {}
unsafe extern "C" fn set_input_poll(_cb: ffi::retro_input_poll_t) {}
unsafe extern "C" fn set_input_state(_cb: ffi::retro_input_state_t) {}
unsafe extern "C" fn set_controller_port_device(_port: c_uint, _device: c_uint) {}
unsafe extern "C" fn nothing() {}

unsafe extern "C" fn run() {
    CORE_LOG.with(|log| log.borrow_mut().runs += 1);
    if let Some(video) = VIDEO.with(Cell::get) {
        video(FRAME.as_ptr().cast(), FRAME_WIDTH, FRAME_HEIGHT, FRAME_WIDTH as usize * 4);
    }
}

unsafe extern "C" fn serialize_size() -> usize {
    0
}

unsafe extern "C" fn serialize(_data: *mut c_void, _size: usize) -> bool {
    false
}

unsafe extern "C" fn unserialize(_data: *const c_void, _size: usize) -> bool {
    false
}

unsafe extern "C" fn cheat_set(_index: c_uint, _enabled: bool, _code: *const c_char) {}

unsafe extern "C" fn load_game(game: *const ffi::retro_game_info) -> bool {
    let Some(game) = game.as_ref() else {
        return true;
    };
    CORE_LOG.with(|log| {
        let mut log = log.borrow_mut();
        log.loaded_path = (!game.path.is_null()).then(|| CStr::from_ptr(game.path).to_string_lossy().into_owned());
        log.loaded_bytes = game.size;
    });
    true
}

unsafe extern "C" fn load_game_special(_game_type: c_uint, _info: *const ffi::retro_game_info, _num: usize) -> bool {
    false
}

unsafe extern "C" fn unload_game() {
    CORE_LOG.with(|log| log.borrow_mut().unloads += 1);
}

unsafe extern "C" fn get_region() -> c_uint {
    ffi::RETRO_REGION_NTSC
}

unsafe extern "C" fn get_memory_data(_id: c_uint) -> *mut c_void {
    ptr::null_mut()
}

unsafe extern "C" fn get_memory_size(_id: c_uint) -> usize {
    0
}

fn core_exports(
    set_environment: unsafe extern "C" fn(ffi::retro_environment_t),
    get_system_info: unsafe extern "C" fn(*mut ffi::retro_system_info),
) -> Exports {
    exports![
        "retro_init" => init,
        "retro_deinit" => deinit,
        "retro_api_version" => api_version,
        "retro_get_system_info" => get_system_info,
        "retro_get_system_av_info" => get_system_av_info,
        "retro_set_environment" => set_environment,
        "retro_set_video_refresh" => set_video_refresh,
        "retro_set_audio_sample" => set_audio_sample,
        "retro_set_audio_sample_batch" => set_audio_sample_batch,
        "retro_set_input_poll" => set_input_poll,
        "retro_set_input_state" => set_input_state,
        "retro_set_controller_port_device" => set_controller_port_device,
        "retro_reset" => nothing,
        "retro_run" => run,
        "retro_serialize_size" => serialize_size,
        "retro_serialize" => serialize,
        "retro_unserialize" => unserialize,
        "retro_cheat_reset" => nothing,
        "retro_cheat_set" => cheat_set,
        "retro_load_game" => load_game,
        "retro_load_game_special" => load_game_special,
        "retro_unload_game" => unload_game,
        "retro_get_region" => get_region,
        "retro_get_memory_data" => get_memory_data,
        "retro_get_memory_size" => get_memory_size,
    ]
}

/// A complete core asking for XRGB8888 and supporting no content.
pub fn core_a() -> Exports {
    core_exports(a_set_environment, a_get_system_info)
}

/// A complete core asking for RGB565 and needing full paths.
pub fn core_b() -> Exports {
    core_exports(b_set_environment, b_get_system_info)
}

/// Core A without `name`.
pub fn core_a_without(name: &str) -> Exports {
    core_a().into_iter().filter(|(n, _)| *n != name).collect()
}

/// Copies every pixel.
pub struct Passthrough;

impl SoftFilter for Passthrough {
    const IDENT: &'static CStr = c"Passthrough";
    const SHORT_IDENT: &'static CStr = c"passthrough";

    fn input_formats() -> FilterFormats {
        FilterFormats::RGB565 | FilterFormats::XRGB8888
    }

    fn output_formats(input: FilterFormats) -> FilterFormats {
        input
    }

    fn create(_config: &FilterConfig<'_>, _params: &FilterParams) -> Option<Self> {
        Some(Self)
    }

    fn process(&mut self, mut job: FrameJob<'_>) {
        for y in 0..job.height() {
            if job.input_format() == FilterFormats::RGB565 {
                let src = job.input_row::<u16>(y);
                job.output_row::<u16>(y).copy_from_slice(src);
            } else {
                let src = job.input_row::<u32>(y);
                job.output_row::<u32>(y).copy_from_slice(src);
            }
        }
    }
}

retrohost::export_softfilter!(fn passthrough_factory => Passthrough);

/// Accepts XRGB8888 only.
pub struct Wide;

impl SoftFilter for Wide {
    const IDENT: &'static CStr = c"Wide only";
    const SHORT_IDENT: &'static CStr = c"wide";

    fn input_formats() -> FilterFormats {
        FilterFormats::XRGB8888
    }

    fn output_formats(input: FilterFormats) -> FilterFormats {
        input
    }

    fn create(_config: &FilterConfig<'_>, _params: &FilterParams) -> Option<Self> {
        Some(Self)
    }

    fn process(&mut self, _job: FrameJob<'_>) {}
}

retrohost::export_softfilter!(fn wide_factory => Wide);

/// Accepts RGB565 but produces nothing.
pub struct Mute;

impl SoftFilter for Mute {
    const IDENT: &'static CStr = c"Mute";
    const SHORT_IDENT: &'static CStr = c"mute";

    fn input_formats() -> FilterFormats {
        FilterFormats::RGB565
    }

    fn output_formats(_input: FilterFormats) -> FilterFormats {
        FilterFormats::empty()
    }

    fn create(_config: &FilterConfig<'_>, _params: &FilterParams) -> Option<Self> {
        Some(Self)
    }

    fn process(&mut self, _job: FrameJob<'_>) {}
}

retrohost::export_softfilter!(fn mute_factory => Mute);

/// A table declaring softfilter API version 1.
unsafe extern "C" fn outdated_factory(simd: ffi::softfilter_simd_mask_t) -> *const ffi::softfilter_implementation {
    let mut table = *passthrough_factory(simd);
    table.api_version = 1;
    table.short_ident = c"outdated".as_ptr();
    Box::leak(Box::new(table))
}

unsafe extern "C" fn null_factory(_simd: ffi::softfilter_simd_mask_t) -> *const ffi::softfilter_implementation {
    ptr::null()
}

pub fn filter_plugin(factory: ffi::softfilter_get_implementation_t) -> Exports {
    vec![(
        ffi::SOFTFILTER_GET_IMPLEMENTATION_SYMBOL,
        RawSymbol::new(factory as *const () as *mut c_void).unwrap(),
    )]
}

/// Plugins for discovery tests: file name and exports. `notes.txt` is never opened.
pub fn filter_plugins() -> Vec<(&'static str, Exports)> {
    vec![
        ("passthrough.so", filter_plugin(passthrough_factory)),
        ("wide.so", filter_plugin(wide_factory)),
        ("outdated.so", filter_plugin(outdated_factory)),
        ("broken.so", filter_plugin(null_factory)),
        ("unrelated.so", core_a()),
        ("notes.txt", filter_plugin(passthrough_factory)),
    ]
}

/// A directory holding an empty file per plugin and a loader serving them.
pub fn plugin_dir() -> (tempfile::TempDir, MockLoader) {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = MockLoader::new();
    for (name, exports) in filter_plugins() {
        let path = dir.path().join(name);
        std::fs::write(&path, b"").unwrap();
        loader = loader.with_library(path, exports);
    }
    (dir, loader)
}

mod common;

use retrohost::conf::ConfigFile;
use retrohost::filter::{FilterGraph, FilterSource};
use retrohost::format::PixelFormat;
use retrohost::host::NullHost;
use retrohost::session::Session;
use retrohost::settings::Settings;

use common::{core_a, core_a_without, core_log, MockLoader, FRAME_HEIGHT, FRAME_WIDTH};

const CORE: &str = "/cores/fake_a_libretro.so";

fn session() -> (Session, std::rc::Rc<std::cell::Cell<usize>>) {
    let loader = MockLoader::new().with_library(CORE, core_a());
    let handles = loader.handles();
    (Session::new(Settings::with_core(CORE), loader, NullHost), handles)
}

#[test]
fn core_lifecycle() {
    let (mut session, handles) = session();
    session.load_core().unwrap();
    assert_eq!(handles.get(), 1);
    assert_eq!(session.core_path().unwrap().to_str(), Some(CORE));
    assert_eq!(session.system_info().library_name.as_deref(), Some("Fake A"));
    assert!(session.system_info().supports_no_content);

    session.load_game(None).unwrap();
    assert!(session.is_game_loaded());
    assert_eq!(core_log(|log| log.inits), 1);
    assert_eq!(session.av_info().geometry.base_width, FRAME_WIDTH);

    session.run_frame();
    let frame = session.take_frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (FRAME_WIDTH, FRAME_HEIGHT));
    assert_eq!(frame.format(), PixelFormat::Xrgb8888);
    assert_eq!(frame.row(0)[..4], 0x00ff_0000u32.to_ne_bytes());
    assert!(session.take_frame().is_none());

    session.unload();
    assert_eq!(handles.get(), 0);
    assert!(session.core().is_dummy());
    assert!(!session.is_game_loaded());
    assert_eq!(core_log(|log| (log.unloads, log.deinits)), (1, 1));
    assert_eq!(session.environment().state.pixel_format, PixelFormat::Rgb1555);
}

#[test]
fn content_is_read_into_memory() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("game.bin");
    std::fs::write(&rom, [0xaa; 16]).unwrap();

    let (mut session, _handles) = session();
    session.load_core().unwrap();
    session.load_game(Some(&rom)).unwrap();
    assert_eq!(core_log(|log| log.loaded_bytes), 16);
    let loaded = core_log(|log| log.loaded_path.clone()).unwrap();
    assert!(loaded.ends_with("game.bin"));
}

#[test]
fn broken_core_falls_back_to_dummy() {
    let loader = MockLoader::new().with_library(CORE, core_a_without("retro_unload_game"));
    let handles = loader.handles();
    let mut session = Session::new(Settings::with_core(CORE), loader, NullHost);

    assert!(!session.load_core_or_dummy());
    assert!(session.core().is_dummy());
    assert_eq!(session.system_info().library_name.as_deref(), Some("No Core"));
    assert_eq!(handles.get(), 0);
}

#[test]
fn frames_run_through_filter() {
    let (mut session, _handles) = session();
    session.load_core().unwrap();
    session.load_game(None).unwrap();
    session.run_frame();
    let frame = session.take_frame().unwrap();

    let config: ConfigFile = "filter = darken\n".parse().unwrap();
    let geometry = session.av_info().geometry;
    let mut graph = FilterGraph::build(
        &config,
        &FilterSource::Builtin,
        &MockLoader::new(),
        session.environment().state.pixel_format,
        geometry.max_width,
        geometry.max_height,
    )
    .unwrap();
    let out = graph.process_frame(&frame).unwrap();
    assert_eq!(out.format(), PixelFormat::Xrgb8888);
    assert_eq!(out.row(0)[..4], 0x007f_0000u32.to_ne_bytes());
    assert_eq!(out.row(1)[12..16], 0x0040_4040u32.to_ne_bytes());
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_void, CStr};
    use std::path::{Path, PathBuf};

    use crate::core::{bind, CoreApi, CoreError, DummyCore, SystemInfo, SYMBOL_NAMES};
    use crate::dylib::{DylibError, DylibResult, Library, Loader, RawSymbol};
    use crate::ffi;
    use crate::settings::Settings;

    /// Refuses to open anything; optionally pretends the process exports the libretro API.
    struct NoLibraries {
        statically_linked: bool,
    }

    extern "C" fn fake_export() {}

    impl Loader for NoLibraries {
        fn open(&self, path: &Path) -> DylibResult<Box<dyn Library>> {
            Err(DylibError::Open {
                path: path.to_path_buf(),
                reason: "not found".into(),
            })
        }

        fn lookup_self(&self, name: &str) -> Option<RawSymbol> {
            if self.statically_linked && name == "retro_init" {
                RawSymbol::new(fake_export as *mut c_void)
            } else {
                None
            }
        }
    }

    #[test]
    fn test_symbol_names() {
        assert_eq!(SYMBOL_NAMES.len(), 25);
        assert_eq!(SYMBOL_NAMES[0], "retro_init");
        assert!(SYMBOL_NAMES.contains(&"retro_get_memory_size"));
        assert!(SYMBOL_NAMES.iter().all(|name| name.starts_with("retro_")));
    }

    #[test]
    fn test_dummy_binding_always_succeeds() {
        let loader = NoLibraries {
            statically_linked: true,
        };
        let mut settings = Settings::default();
        let core = bind(&loader, &mut settings, true).unwrap();
        assert!(core.is_dummy());
        assert!(core.path().is_none());
    }

    #[test]
    fn test_dummy_entries_are_inert() {
        let core = DummyCore;
        core.set_environment(None);
        core.set_video_refresh(None);
        core.set_audio_sample(None);
        core.set_audio_sample_batch(None);
        core.set_input_poll(None);
        core.set_input_state(None);
        core.init();
        core.set_controller_port_device(0, ffi::RETRO_DEVICE_JOYPAD);
        core.reset();
        core.run();
        core.cheat_reset();
        core.cheat_set(0, true, c"DEADBEEF");
        core.unload_game();
        core.deinit();

        assert_eq!(core.api_version(), ffi::RETRO_API_VERSION);
        assert_eq!(core.serialize_size(), 0);
        assert!(!core.serialize(&mut [0u8; 16]));
        assert!(!core.unserialize(&[0u8; 16]));
        assert!(!core.load_game(None));
        assert!(!core.load_game_special(0, &[]));
        assert_eq!(core.get_region(), ffi::RETRO_REGION_NTSC);
        assert!(core.get_memory_data(ffi::RETRO_MEMORY_SAVE_RAM).is_null());
        assert_eq!(core.get_memory_size(ffi::RETRO_MEMORY_SAVE_RAM), 0);
        assert_eq!(core.get_system_av_info(), ffi::retro_system_av_info::default());
    }

    #[test]
    fn test_dummy_system_info() {
        let raw = DummyCore.get_system_info();
        let info = unsafe { SystemInfo::from_raw(&raw) };
        assert_eq!(info.library_name.as_deref(), Some("No Core"));
        assert_eq!(info.valid_extensions, None);
        assert_eq!(unsafe { CStr::from_ptr(raw.library_name) }, DummyCore::LIBRARY_NAME);
    }

    #[test]
    fn test_empty_path_is_fatal() {
        let loader = NoLibraries {
            statically_linked: false,
        };
        let mut settings = Settings::default();
        assert!(matches!(
            bind(&loader, &mut settings, false),
            Err(CoreError::EmptyPath)
        ));
    }

    #[test]
    fn test_static_linkage_is_fatal() {
        let loader = NoLibraries {
            statically_linked: true,
        };
        let mut settings = Settings::with_core("cores/snes9x_libretro.so");
        assert!(matches!(
            bind(&loader, &mut settings, false),
            Err(CoreError::StaticallyLinked)
        ));
        // Nothing was resolved, so the configured path is untouched.
        assert_eq!(settings.core_path, PathBuf::from("cores/snes9x_libretro.so"));
    }

    #[test]
    fn test_relative_path_made_absolute() {
        let loader = NoLibraries {
            statically_linked: false,
        };
        let mut settings = Settings::with_core("cores/snes9x_libretro.so");
        assert!(matches!(
            bind(&loader, &mut settings, false),
            Err(CoreError::Load(DylibError::Open { .. }))
        ));
        assert!(settings.core_path.is_absolute());
        assert!(settings.core_path.ends_with("cores/snes9x_libretro.so"));
    }

    #[test]
    fn test_system_info_extensions_and_release() {
        let mut info = SystemInfo {
            library_name: Some("Snes9x".into()),
            library_version: Some("1.62".into()),
            valid_extensions: Some("smc|sfc|swc|fig".into()),
            need_fullpath: false,
            block_extract: true,
            supports_no_content: false,
        };
        assert_eq!(info.extensions().count(), 4);
        assert!(info.supports_extension("SFC"));
        assert!(!info.supports_extension("nes"));

        info.release();
        assert!(info.is_released());
        assert_eq!(info.library_name, None);
        assert_eq!(info.library_version, None);
        assert_eq!(info.valid_extensions, None);
        assert!(!info.block_extract);
        assert_eq!(info.extensions().count(), 0);
    }
}

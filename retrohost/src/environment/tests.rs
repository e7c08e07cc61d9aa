#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::ffi::{c_uint, c_void, CStr};
    use std::mem;
    use std::ptr;
    use std::rc::Rc;

    use crate::environment::{
        activate, current_mode, environment_callback, services, suppress, with_active, CommandTable,
        DispatchMode, Environment, Payload, HW_RENDER_LEGACY_SIZE,
    };
    use crate::ffi;
    use crate::format::PixelFormat;
    use crate::host::Host;
    use crate::settings::{HwContextSupport, Settings};

    #[derive(Debug, Default)]
    struct Calls {
        rotation: Option<u32>,
        aspect_changes: usize,
        av_changes: usize,
    }

    struct TestHost {
        calls: Rc<RefCell<Calls>>,
        can_rotate: bool,
    }

    impl Host for TestHost {
        fn set_rotation(&mut self, rotation: u32) -> bool {
            self.calls.borrow_mut().rotation = Some(rotation);
            self.can_rotate
        }

        fn aspect_ratio_changed(&mut self, _geometry: &ffi::retro_game_geometry) {
            self.calls.borrow_mut().aspect_changes += 1;
        }

        fn av_info_changed(&mut self, _av_info: &ffi::retro_system_av_info) {
            self.calls.borrow_mut().av_changes += 1;
        }

        fn input_device_capabilities(&mut self) -> Option<u64> {
            Some(1 << ffi::RETRO_DEVICE_JOYPAD)
        }
    }

    fn environment(settings: Settings) -> (Environment, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let host = TestHost {
            calls: calls.clone(),
            can_rotate: true,
        };
        (Environment::new(settings, host), calls)
    }

    fn send<T>(env: &mut Environment, cmd: u32, value: &mut T) -> bool {
        env.dispatch(cmd, unsafe { Payload::from_mut(value) }, DispatchMode::Live)
    }

    fn send_ptr<T>(env: &mut Environment, cmd: u32, ptr: *const T) -> bool {
        env.dispatch(cmd, unsafe { Payload::new(ptr as *mut c_void) }, DispatchMode::Live)
    }

    fn get_variable(env: &mut Environment, key: &CStr) -> Option<String> {
        let mut var = ffi::retro_variable {
            key: key.as_ptr(),
            value: ptr::null(),
        };
        assert!(send(env, ffi::RETRO_ENVIRONMENT_GET_VARIABLE, &mut var));
        (!var.value.is_null()).then(|| unsafe { CStr::from_ptr(var.value) }.to_string_lossy().into_owned())
    }

    fn declare_options(env: &mut Environment) -> bool {
        let vars = [
            ffi::retro_variable {
                key: c"snes_region".as_ptr(),
                value: c"Region; auto|ntsc|pal".as_ptr(),
            },
            ffi::retro_variable {
                key: c"snes_blend".as_ptr(),
                value: c"Hi-res blending; disabled|enabled".as_ptr(),
            },
            ffi::retro_variable::default(),
        ];
        send_ptr(env, ffi::RETRO_ENVIRONMENT_SET_VARIABLES, vars.as_ptr())
    }

    #[test]
    fn test_command_table_covers_libretro() {
        let table = CommandTable::libretro();
        assert_eq!(table.len(), 40);
        for cmd in (1..=39).filter(|cmd| ![4, 5, 20, 25, 26, 36].contains(cmd)) {
            assert!(table.contains(cmd), "command {} is not handled", cmd);
        }
        for cmd in [25, 26, 36] {
            assert!(!table.contains(cmd));
            assert!(table.contains(cmd | ffi::RETRO_ENVIRONMENT_EXPERIMENTAL));
        }
        assert!(table.contains(ffi::RETRO_ENVIRONMENT_SET_HW_RENDER | ffi::RETRO_ENVIRONMENT_EXPERIMENTAL));
        assert!(table.contains(ffi::RETRO_ENVIRONMENT_EXEC));
        assert!(table.contains(ffi::RETRO_ENVIRONMENT_EXEC_ESCAPE));
        assert!(table.contains(ffi::RETRO_ENVIRONMENT_SET_LIBRETRO_PATH));
    }

    #[test]
    fn test_unknown_command_is_refused() {
        let (mut env, _) = environment(Settings::default());
        let mut value = 0u32;
        assert!(!send(&mut env, 4, &mut value));
        assert!(!send(&mut env, 0xdead, &mut value));
        assert!(env.state.is_pristine());
    }

    #[test]
    fn test_custom_handler_registration() {
        fn always(_env: &mut Environment, _data: Payload) -> bool {
            true
        }
        let mut table = CommandTable::new();
        table.register(0x1234, always);
        let mut env = Environment::with_commands(Settings::default(), crate::host::NullHost, table);
        assert!(env.dispatch(0x1234, Payload::null(), DispatchMode::Live));
        assert!(!env.dispatch(ffi::RETRO_ENVIRONMENT_SHUTDOWN, Payload::null(), DispatchMode::Live));

        env.commands_mut().unregister(0x1234);
        assert!(!env.dispatch(0x1234, Payload::null(), DispatchMode::Live));
    }

    #[test]
    fn test_probe_only_mode_has_no_effect() {
        let (mut env, _) = environment(Settings::default());
        let mut format = ffi::RETRO_PIXEL_FORMAT_XRGB8888;
        let payload = unsafe { Payload::from_mut(&mut format) };
        assert!(!env.dispatch(ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, payload, DispatchMode::ProbeOnly));
        assert!(!env.dispatch(ffi::RETRO_ENVIRONMENT_SHUTDOWN, Payload::null(), DispatchMode::ProbeOnly));
        assert!(env.state.is_pristine());
        assert!(!env.flags.shutdown);
    }

    #[test]
    fn test_get_variable_before_set_variables() {
        let (mut env, _) = environment(Settings::default());
        assert_eq!(get_variable(&mut env, c"snes_region"), None);
        assert_eq!(get_variable(&mut env, c"anything"), None);
    }

    #[test]
    fn test_set_variables_then_get() {
        let (mut env, _) = environment(Settings::default());
        assert!(declare_options(&mut env));
        assert_eq!(get_variable(&mut env, c"snes_region").as_deref(), Some("auto"));
        assert_eq!(get_variable(&mut env, c"snes_blend").as_deref(), Some("disabled"));
        assert_eq!(get_variable(&mut env, c"unknown"), None);

        assert!(!send_ptr::<ffi::retro_variable>(&mut env, ffi::RETRO_ENVIRONMENT_SET_VARIABLES, ptr::null()));
    }

    #[test]
    fn test_variable_update_reported_once() {
        let (mut env, _) = environment(Settings::default());
        assert!(declare_options(&mut env));

        let mut updated = true;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_VARIABLE_UPDATE, &mut updated));
        assert!(!updated);

        env.state.options.as_mut().unwrap().next(0).unwrap();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_VARIABLE_UPDATE, &mut updated));
        assert!(updated);
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_VARIABLE_UPDATE, &mut updated));
        assert!(!updated);

        assert_eq!(get_variable(&mut env, c"snes_region").as_deref(), Some("ntsc"));
    }

    #[test]
    fn test_set_variables_uses_persisted_values() {
        let dir = tempfile::tempdir().unwrap();
        let options = dir.path().join("core-options.cfg");
        std::fs::write(&options, "snes_region = \"pal\"\nother_core_key = \"kept\"\n").unwrap();

        let settings = Settings {
            core_options_path: Some(options.clone()),
            ..Settings::default()
        };
        let (mut env, _) = environment(settings);
        assert!(declare_options(&mut env));
        assert_eq!(get_variable(&mut env, c"snes_region").as_deref(), Some("pal"));

        env.state.options.as_mut().unwrap().set_value("snes_blend", "enabled").unwrap();
        env.reset();
        assert!(env.state.options.is_none());

        let saved = crate::conf::ConfigFile::from_path(&options).unwrap();
        assert_eq!(saved.get("snes_blend"), Some("enabled"));
        assert_eq!(saved.get("snes_region"), Some("pal"));
        assert_eq!(saved.get("other_core_key"), Some("kept"));
    }

    #[test]
    fn test_geometry_recompute_only_on_change() {
        let (mut env, calls) = environment(Settings::default());
        let mut geometry = ffi::retro_game_geometry {
            base_width: 256,
            base_height: 224,
            max_width: 512,
            max_height: 448,
            aspect_ratio: 4.0 / 3.0,
        };
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_GEOMETRY, &mut geometry));
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_GEOMETRY, &mut geometry));
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_GEOMETRY, &mut geometry));
        assert_eq!(calls.borrow().aspect_changes, 1);
        assert_eq!(env.state.av_info.geometry.base_width, 256);
        // Only the base size and aspect are taken over.
        assert_eq!(env.state.av_info.geometry.max_width, 0);

        geometry.max_width = 1024;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_GEOMETRY, &mut geometry));
        assert_eq!(calls.borrow().aspect_changes, 1);

        geometry.aspect_ratio = 16.0 / 9.0;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_GEOMETRY, &mut geometry));
        assert_eq!(calls.borrow().aspect_changes, 2);
    }

    #[test]
    fn test_pixel_format_closed_set() {
        let (mut env, _) = environment(Settings::default());
        let mut format = ffi::RETRO_PIXEL_FORMAT_RGB565;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, &mut format));
        assert_eq!(env.state.pixel_format, PixelFormat::Rgb565);

        for invalid in [3, 42, ffi::RETRO_PIXEL_FORMAT_UNKNOWN] {
            let mut format = invalid;
            assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, &mut format));
            assert_eq!(env.state.pixel_format, PixelFormat::Rgb565);
        }
    }

    #[test]
    fn test_rotation() {
        let settings = Settings {
            allow_rotate: false,
            ..Settings::default()
        };
        let (mut env, calls) = environment(settings);
        let mut rotation: c_uint = 1;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_ROTATION, &mut rotation));
        assert_eq!(env.state.rotation, 0);
        assert_eq!(calls.borrow().rotation, None);

        env.settings.allow_rotate = true;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_ROTATION, &mut rotation));
        assert_eq!(env.state.rotation, 1);
        assert_eq!(calls.borrow().rotation, Some(1));

        // A host without rotation support refuses, but the request is still recorded.
        let mut env = Environment::new(Settings::default(), crate::host::NullHost);
        let mut rotation: c_uint = 3;
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_ROTATION, &mut rotation));
        assert_eq!(env.state.rotation, 3);
    }

    #[test]
    fn test_message_replaces_queue() {
        let (mut env, _) = environment(Settings::default());
        env.messages.push("stale", 5, 100);
        let mut msg = ffi::retro_message {
            msg: c"Disk 2 inserted".as_ptr(),
            frames: 60,
        };
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_MESSAGE, &mut msg));
        assert_eq!(env.messages.len(), 1);
        assert_eq!(env.messages.peek(), Some("Disk 2 inserted"));
    }

    #[test]
    fn test_shutdown_and_exec_flags() {
        let (mut env, _) = environment(Settings::default());
        assert!(env.dispatch(ffi::RETRO_ENVIRONMENT_SHUTDOWN, Payload::null(), DispatchMode::Live));
        assert!(env.flags.shutdown);
        assert!(env.flags.core_shutdown_initiated);

        let (mut env, _) = environment(Settings::default());
        let content = c"/roms/next.sfc";
        assert!(send_ptr(&mut env, ffi::RETRO_ENVIRONMENT_EXEC_ESCAPE, content.as_ptr()));
        let exec = env.flags.exec.clone().unwrap();
        assert_eq!(exec.content.as_deref(), Some(std::path::Path::new("/roms/next.sfc")));
        assert!(exec.replace_process);
        assert!(env.flags.shutdown);
        assert!(!env.flags.core_shutdown_initiated);

        assert!(env.dispatch(ffi::RETRO_ENVIRONMENT_EXEC, Payload::null(), DispatchMode::Live));
        let exec = env.flags.exec.clone().unwrap();
        assert_eq!(exec.content, None);
        assert!(!exec.replace_process);
    }

    #[test]
    fn test_set_libretro_path_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let core = dir.path().join("next_libretro.so");
        std::fs::write(&core, b"").unwrap();
        let core_str = std::ffi::CString::new(core.to_str().unwrap()).unwrap();

        let (mut env, _) = environment(Settings::with_core("/cores/current_libretro.so"));
        assert!(!send_ptr(&mut env, ffi::RETRO_ENVIRONMENT_SET_LIBRETRO_PATH, c"/nonexistent/core.so".as_ptr()));
        assert_eq!(env.settings.core_path, std::path::PathBuf::from("/cores/current_libretro.so"));

        assert!(send_ptr(&mut env, ffi::RETRO_ENVIRONMENT_SET_LIBRETRO_PATH, core_str.as_ptr()));
        assert_eq!(env.settings.core_path, core);
    }

    #[test]
    fn test_input_descriptors_filtered() {
        let (mut env, _) = environment(Settings::default());
        let descriptors = [
            ffi::retro_input_descriptor {
                port: 0,
                device: ffi::RETRO_DEVICE_JOYPAD,
                index: 0,
                id: ffi::RETRO_DEVICE_ID_JOYPAD_A,
                description: c"Jump".as_ptr(),
            },
            ffi::retro_input_descriptor {
                port: 0,
                device: ffi::RETRO_DEVICE_ANALOG,
                index: 0,
                id: 0,
                description: c"Move".as_ptr(),
            },
            ffi::retro_input_descriptor {
                port: 99,
                device: ffi::RETRO_DEVICE_JOYPAD,
                index: 0,
                id: 0,
                description: c"Far away".as_ptr(),
            },
            ffi::retro_input_descriptor {
                port: 1,
                device: ffi::RETRO_DEVICE_JOYPAD,
                index: 0,
                id: 20,
                description: c"Custom".as_ptr(),
            },
            ffi::retro_input_descriptor {
                port: 1,
                device: ffi::RETRO_DEVICE_JOYPAD,
                index: 0,
                id: ffi::RETRO_DEVICE_ID_JOYPAD_START,
                description: c"Pause".as_ptr(),
            },
            ffi::retro_input_descriptor::default(),
        ];
        assert!(send_ptr(&mut env, ffi::RETRO_ENVIRONMENT_SET_INPUT_DESCRIPTORS, descriptors.as_ptr()));
        let stored: Vec<_> = env.state.input_descriptors.iter().collect();
        assert_eq!(stored, [(0, 8, "Jump"), (1, 3, "Pause")]);
    }

    #[test]
    fn test_hw_render_context_validation() {
        let (mut env, _) = environment(Settings::default());
        let mut cb = ffi::retro_hw_render_callback {
            context_type: ffi::RETRO_HW_CONTEXT_OPENGLES2,
            ..Default::default()
        };
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));
        assert!(env.state.hw_render.is_none());

        cb.context_type = ffi::RETRO_HW_CONTEXT_NONE;
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));

        cb.context_type = ffi::RETRO_HW_CONTEXT_OPENGL_CORE;
        cb.version_major = 3;
        cb.version_minor = 3;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));
        assert!(cb.get_current_framebuffer.is_some());
        assert!(cb.get_proc_address.is_some());
        let stored = env.state.hw_render.unwrap();
        assert_eq!(stored.version_major, 3);
        assert!(stored.get_current_framebuffer.is_some());

        env.settings.hw_context = HwContextSupport::OpenGles2;
        cb.context_type = ffi::RETRO_HW_CONTEXT_OPENGL;
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));
        cb.context_type = ffi::RETRO_HW_CONTEXT_OPENGLES3;
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));
        cb.context_type = ffi::RETRO_HW_CONTEXT_OPENGLES2;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));

        env.settings.hw_context = HwContextSupport::None;
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, &mut cb));
    }

    #[test]
    fn test_hw_render_legacy_copies_prefix() {
        assert!(HW_RENDER_LEGACY_SIZE < mem::size_of::<ffi::retro_hw_render_callback>());

        let (mut env, _) = environment(Settings::default());
        let mut cb = ffi::retro_hw_render_callback {
            context_type: ffi::RETRO_HW_CONTEXT_OPENGL,
            depth: true,
            stencil: true,
            bottom_left_origin: true,
            version_major: 2,
            debug_context: true,
            ..Default::default()
        };
        let cmd = ffi::RETRO_ENVIRONMENT_SET_HW_RENDER | ffi::RETRO_ENVIRONMENT_EXPERIMENTAL;
        assert!(send(&mut env, cmd, &mut cb));

        let stored = env.state.hw_render.unwrap();
        assert_eq!(stored.context_type, ffi::RETRO_HW_CONTEXT_OPENGL);
        assert!(stored.depth);
        assert!(stored.get_proc_address.is_some());
        assert!(!stored.stencil);
        assert!(!stored.bottom_left_origin);
        assert_eq!(stored.version_major, 0);
        assert!(!stored.debug_context);
    }

    #[test]
    fn test_callbacks_refused_by_concurrent_features() {
        let settings = Settings {
            netplay_active: true,
            ..Settings::default()
        };
        let (mut env, _) = environment(settings);
        let mut frame_time = ffi::retro_frame_time_callback {
            callback: None,
            reference: 16_666,
        };
        let mut audio = ffi::retro_audio_callback::default();
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_FRAME_TIME_CALLBACK, &mut frame_time));
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_AUDIO_CALLBACK, &mut audio));

        env.settings.netplay_active = false;
        env.settings.recording_active = true;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_FRAME_TIME_CALLBACK, &mut frame_time));
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_SET_AUDIO_CALLBACK, &mut audio));
        assert_eq!(env.state.frame_time.unwrap().reference, 16_666);
        assert!(env.state.audio_callback.is_none());

        env.settings.recording_active = false;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_AUDIO_CALLBACK, &mut audio));
        assert!(env.state.audio_callback.is_some());
    }

    #[test]
    fn test_interfaces_are_filled() {
        let (mut env, _) = environment(Settings::default());

        let mut rumble = ffi::retro_rumble_interface::default();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_RUMBLE_INTERFACE, &mut rumble));
        assert!(rumble.set_rumble_state.is_some());

        let mut sensor = ffi::retro_sensor_interface::default();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_SENSOR_INTERFACE, &mut sensor));
        assert!(sensor.set_sensor_state.is_some() && sensor.get_sensor_input.is_some());

        let mut perf = ffi::retro_perf_callback::default();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_PERF_INTERFACE, &mut perf));
        assert!(perf.get_time_usec.is_some());
        assert!(perf.get_cpu_features.is_some());
        assert!(perf.get_perf_counter.is_some());
        assert!(perf.perf_register.is_some());
        assert!(perf.perf_start.is_some());
        assert!(perf.perf_stop.is_some());
        assert!(perf.perf_log.is_some());

        let mut log = ffi::retro_log_callback::default();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_LOG_INTERFACE, &mut log));
        let log = log.log.unwrap();
        unsafe { log(ffi::RETRO_LOG_INFO, c"core says hello\n".as_ptr()) };

        let mut caps = 0u64;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_INPUT_DEVICE_CAPABILITIES, &mut caps));
        assert_eq!(caps, 1 << ffi::RETRO_DEVICE_JOYPAD);

        let mut env = Environment::new(Settings::default(), crate::host::NullHost);
        assert!(!send(&mut env, ffi::RETRO_ENVIRONMENT_GET_INPUT_DEVICE_CAPABILITIES, &mut caps));
    }

    #[test]
    fn test_camera_and_location() {
        let (mut env, _) = environment(Settings::default());
        let mut camera = ffi::retro_camera_callback {
            caps: 1 << ffi::RETRO_CAMERA_BUFFER_RAW_FRAMEBUFFER,
            width: 320,
            height: 240,
            ..Default::default()
        };
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_CAMERA_INTERFACE, &mut camera));
        assert!(camera.start.is_some() && camera.stop.is_some());
        assert!(env.flags.camera_active);
        assert_eq!(env.state.camera.unwrap().width, 320);

        let mut location = ffi::retro_location_callback::default();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_LOCATION_INTERFACE, &mut location));
        assert!(location.start.is_some());
        assert!(location.stop.is_some());
        assert!(location.get_position.is_some());
        assert!(location.set_interval.is_some());
        assert!(env.flags.location_active);

        let (mut env, _) = environment(Settings::default());
        let mut camera = ffi::retro_camera_callback::default();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_CAMERA_INTERFACE, &mut camera));
        assert!(!env.flags.camera_active);
    }

    #[test]
    fn test_directories_and_strings() {
        let settings = Settings {
            content_path: Some("/roms/snes/game.sfc".into()),
            save_directory: Some("/saves".into()),
            username: Some("player".into()),
            language: ffi::RETRO_LANGUAGE_GERMAN,
            ..Settings::with_core("/cores/snes9x_libretro.so")
        };
        let (mut env, _) = environment(settings);

        let read = |env: &mut Environment, cmd: u32| -> Option<String> {
            let mut out: *const std::ffi::c_char = ptr::null();
            assert!(send(env, cmd, &mut out));
            (!out.is_null()).then(|| unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned())
        };

        assert_eq!(read(&mut env, ffi::RETRO_ENVIRONMENT_GET_SYSTEM_DIRECTORY).as_deref(), Some("/roms/snes"));
        assert_eq!(read(&mut env, ffi::RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY).as_deref(), Some("/saves"));
        assert_eq!(read(&mut env, ffi::RETRO_ENVIRONMENT_GET_CORE_ASSETS_DIRECTORY), None);
        assert_eq!(read(&mut env, ffi::RETRO_ENVIRONMENT_GET_USERNAME).as_deref(), Some("player"));
        assert_eq!(
            read(&mut env, ffi::RETRO_ENVIRONMENT_GET_LIBRETRO_PATH).as_deref(),
            Some("/cores/snes9x_libretro.so")
        );

        let mut language: ffi::retro_language = 0;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_LANGUAGE, &mut language));
        assert_eq!(language, ffi::RETRO_LANGUAGE_GERMAN);

        let mut overscan = true;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_OVERSCAN, &mut overscan));
        assert!(!overscan);
        let mut dupe = false;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_CAN_DUPE, &mut dupe));
        assert!(dupe);

        assert!(!env.dispatch(ffi::RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY, Payload::null(), DispatchMode::Live));
    }

    #[test]
    fn test_published_string_outlives_other_queries() {
        let settings = Settings {
            save_directory: Some("/saves".into()),
            username: Some("player".into()),
            ..Settings::default()
        };
        let (mut env, _) = environment(settings);
        let mut save: *const std::ffi::c_char = ptr::null();
        let mut user: *const std::ffi::c_char = ptr::null();
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY, &mut save));
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_GET_USERNAME, &mut user));
        assert_eq!(unsafe { CStr::from_ptr(save) }, c"/saves");
        assert_eq!(unsafe { CStr::from_ptr(user) }, c"player");
    }

    #[test]
    fn test_descriptor_lists_copied() {
        let (mut env, _) = environment(Settings::default());
        let types = [
            ffi::retro_controller_description {
                desc: c"Gamepad".as_ptr(),
                id: ffi::RETRO_DEVICE_JOYPAD,
            },
            ffi::retro_controller_description {
                desc: c"Mouse".as_ptr(),
                id: ffi::RETRO_DEVICE_MOUSE,
            },
        ];
        let ports = [
            ffi::retro_controller_info {
                types: types.as_ptr(),
                num_types: 2,
            },
            ffi::retro_controller_info::default(),
        ];
        assert!(send_ptr(&mut env, ffi::RETRO_ENVIRONMENT_SET_CONTROLLER_INFO, ports.as_ptr()));
        assert_eq!(env.state.ports.len(), 1);
        assert_eq!(env.state.ports[0].types[1].desc.as_deref(), Some("Mouse"));

        let mut ram = [0u8; 64];
        let descriptors = [ffi::retro_memory_descriptor {
            ptr: ram.as_mut_ptr().cast(),
            start: 0x7e0000,
            len: ram.len(),
            addrspace: c"WRAM".as_ptr(),
            ..Default::default()
        }];
        let mut map = ffi::retro_memory_map {
            descriptors: descriptors.as_ptr(),
            num_descriptors: 1,
        };
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_MEMORY_MAPS, &mut map));
        assert_eq!(env.state.memory_map.len(), 1);
        assert_eq!(env.state.memory_map[0].start, 0x7e0000);
        assert_eq!(env.state.memory_map[0].addrspace.as_deref(), Some("WRAM"));

        let mut av = ffi::retro_system_av_info::default();
        av.timing.fps = 60.0;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_SYSTEM_AV_INFO, &mut av));
        assert_eq!(env.state.av_info.timing.fps, 60.0);

        assert!(env.dispatch(ffi::RETRO_ENVIRONMENT_SET_PROC_ADDRESS_CALLBACK, Payload::null(), DispatchMode::Live));
        assert!(env.state.proc_address.is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut env, _) = environment(Settings::default());
        assert!(declare_options(&mut env));
        assert!(env.dispatch(ffi::RETRO_ENVIRONMENT_SHUTDOWN, Payload::null(), DispatchMode::Live));
        let mut no_game = true;
        assert!(send(&mut env, ffi::RETRO_ENVIRONMENT_SET_SUPPORT_NO_GAME, &mut no_game));
        env.reset();
        assert!(env.state.is_pristine());
        assert_eq!(env.flags, Default::default());
        assert_eq!(get_variable(&mut env, c"snes_region"), None);
    }

    #[test]
    fn test_callback_reaches_active_environment() {
        let (env, _) = environment(Settings::default());
        let env = Rc::new(RefCell::new(env));

        assert!(!unsafe { environment_callback(ffi::RETRO_ENVIRONMENT_SHUTDOWN, ptr::null_mut()) });

        let guard = activate(&env);
        assert!(unsafe { environment_callback(ffi::RETRO_ENVIRONMENT_SHUTDOWN, ptr::null_mut()) });
        assert!(env.borrow().flags.shutdown);

        {
            let _busy = env.borrow_mut();
            assert!(!unsafe { environment_callback(ffi::RETRO_ENVIRONMENT_SHUTDOWN, ptr::null_mut()) });
            assert_eq!(with_active(|_| ()), None);
        }

        drop(guard);
        assert_eq!(with_active(|_| ()), None);
    }

    #[test]
    fn test_suppress_guard_refuses_and_restores() {
        let (env, _) = environment(Settings::default());
        let env = Rc::new(RefCell::new(env));
        let _guard = activate(&env);

        assert_eq!(current_mode(), DispatchMode::Live);
        {
            let _suppress = suppress();
            assert_eq!(current_mode(), DispatchMode::ProbeOnly);
            let mut format = ffi::RETRO_PIXEL_FORMAT_XRGB8888;
            let data = (&mut format as *mut ffi::retro_pixel_format).cast::<c_void>();
            assert!(!unsafe { environment_callback(ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, data) });
        }
        assert_eq!(current_mode(), DispatchMode::Live);
        assert!(env.borrow().state.is_pristine());
    }

    #[test]
    fn test_video_refresh_captures_frames() {
        let (env, _) = environment(Settings::default());
        let env = Rc::new(RefCell::new(env));
        let _guard = activate(&env);

        let pixels: [u16; 4] = [0x7fff, 0, 0, 0x7fff];
        unsafe { services::video_refresh(pixels.as_ptr().cast(), 2, 2, 4) };
        let frame = env.borrow().last_frame().cloned().unwrap();
        assert_eq!(frame.format(), PixelFormat::Rgb1555);
        assert_eq!((frame.width(), frame.height()), (2, 2));

        // Dupes and hardware frames keep the last software frame.
        unsafe { services::video_refresh(ptr::null(), 2, 2, 4) };
        unsafe { services::video_refresh(ffi::RETRO_HW_FRAME_BUFFER_VALID, 2, 2, 0) };
        assert_eq!(env.borrow_mut().take_frame(), Some(frame));
        assert!(env.borrow().last_frame().is_none());
    }
}

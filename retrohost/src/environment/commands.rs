use std::collections::HashMap;

use super::{handlers, Environment, Payload};
use crate::ffi;

/// Answers one environment command. Returns false if the request is refused.
pub type Handler = fn(&mut Environment, Payload) -> bool;

/// Environment handlers keyed by command code.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    handlers: HashMap<u32, Handler>,
}

impl CommandTable {
    /// An empty table; every command is unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full libretro command set.
    pub fn libretro() -> Self {
        use handlers::*;

        let mut table = Self::new();
        table
            .register(ffi::RETRO_ENVIRONMENT_SET_ROTATION, set_rotation)
            .register(ffi::RETRO_ENVIRONMENT_GET_OVERSCAN, get_overscan)
            .register(ffi::RETRO_ENVIRONMENT_GET_CAN_DUPE, get_can_dupe)
            .register(ffi::RETRO_ENVIRONMENT_SET_MESSAGE, set_message)
            .register(ffi::RETRO_ENVIRONMENT_SHUTDOWN, shutdown)
            .register(ffi::RETRO_ENVIRONMENT_SET_PERFORMANCE_LEVEL, set_performance_level)
            .register(ffi::RETRO_ENVIRONMENT_GET_SYSTEM_DIRECTORY, get_system_directory)
            .register(ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, set_pixel_format)
            .register(ffi::RETRO_ENVIRONMENT_SET_INPUT_DESCRIPTORS, set_input_descriptors)
            .register(ffi::RETRO_ENVIRONMENT_SET_KEYBOARD_CALLBACK, set_keyboard_callback)
            .register(ffi::RETRO_ENVIRONMENT_SET_DISK_CONTROL_INTERFACE, set_disk_control_interface)
            .register(ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, set_hw_render)
            .register(
                ffi::RETRO_ENVIRONMENT_SET_HW_RENDER | ffi::RETRO_ENVIRONMENT_EXPERIMENTAL,
                set_hw_render_legacy,
            )
            .register(ffi::RETRO_ENVIRONMENT_GET_VARIABLE, get_variable)
            .register(ffi::RETRO_ENVIRONMENT_SET_VARIABLES, set_variables)
            .register(ffi::RETRO_ENVIRONMENT_GET_VARIABLE_UPDATE, get_variable_update)
            .register(ffi::RETRO_ENVIRONMENT_SET_SUPPORT_NO_GAME, set_support_no_game)
            .register(ffi::RETRO_ENVIRONMENT_GET_LIBRETRO_PATH, get_libretro_path)
            .register(ffi::RETRO_ENVIRONMENT_SET_FRAME_TIME_CALLBACK, set_frame_time_callback)
            .register(ffi::RETRO_ENVIRONMENT_SET_AUDIO_CALLBACK, set_audio_callback)
            .register(ffi::RETRO_ENVIRONMENT_GET_RUMBLE_INTERFACE, get_rumble_interface)
            .register(
                ffi::RETRO_ENVIRONMENT_GET_INPUT_DEVICE_CAPABILITIES,
                get_input_device_capabilities,
            )
            .register(ffi::RETRO_ENVIRONMENT_GET_SENSOR_INTERFACE, get_sensor_interface)
            .register(ffi::RETRO_ENVIRONMENT_GET_CAMERA_INTERFACE, get_camera_interface)
            .register(ffi::RETRO_ENVIRONMENT_GET_LOG_INTERFACE, get_log_interface)
            .register(ffi::RETRO_ENVIRONMENT_GET_PERF_INTERFACE, get_perf_interface)
            .register(ffi::RETRO_ENVIRONMENT_GET_LOCATION_INTERFACE, get_location_interface)
            .register(ffi::RETRO_ENVIRONMENT_GET_CORE_ASSETS_DIRECTORY, get_core_assets_directory)
            .register(ffi::RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY, get_save_directory)
            .register(ffi::RETRO_ENVIRONMENT_SET_SYSTEM_AV_INFO, set_system_av_info)
            .register(ffi::RETRO_ENVIRONMENT_SET_PROC_ADDRESS_CALLBACK, set_proc_address_callback)
            .register(ffi::RETRO_ENVIRONMENT_SET_SUBSYSTEM_INFO, set_subsystem_info)
            .register(ffi::RETRO_ENVIRONMENT_SET_CONTROLLER_INFO, set_controller_info)
            .register(ffi::RETRO_ENVIRONMENT_SET_MEMORY_MAPS, set_memory_maps)
            .register(ffi::RETRO_ENVIRONMENT_SET_GEOMETRY, set_geometry)
            .register(ffi::RETRO_ENVIRONMENT_GET_USERNAME, get_username)
            .register(ffi::RETRO_ENVIRONMENT_GET_LANGUAGE, get_language)
            .register(ffi::RETRO_ENVIRONMENT_EXEC, exec)
            .register(ffi::RETRO_ENVIRONMENT_EXEC_ESCAPE, exec_escape)
            .register(ffi::RETRO_ENVIRONMENT_SET_LIBRETRO_PATH, set_libretro_path);
        table
    }

    /// Registers `handler` for `cmd`, replacing any previous handler.
    pub fn register(&mut self, cmd: u32, handler: Handler) -> &mut Self {
        self.handlers.insert(cmd, handler);
        self
    }

    /// Removes the handler for `cmd`, making the command unsupported.
    pub fn unregister(&mut self, cmd: u32) -> Option<Handler> {
        self.handlers.remove(&cmd)
    }

    pub fn get(&self, cmd: u32) -> Option<Handler> {
        self.handlers.get(&cmd).copied()
    }

    pub fn contains(&self, cmd: u32) -> bool {
        self.handlers.contains_key(&cmd)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

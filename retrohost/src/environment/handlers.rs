//! One function per environment command.
use log::{debug, error, info, warn};
use std::ffi::{c_char, c_uint, CString};
use std::mem;
use std::path::{Path, PathBuf};
use std::ptr;

use super::{services, Environment, Payload};
use crate::{
    ffi,
    format::PixelFormat,
    options::CoreOptions,
    perf,
    settings::HwContextSupport,
    state::{
        owned_str, ControllerPort, MemoryDescriptor, PendingExec, Subsystem, FIRST_CUSTOM_BIND,
        JOYPAD_BUTTON_NAMES, MAX_USERS,
    },
};

/// Bytes of `retro_hw_render_callback` known to cores using the experimental variant of
/// `SET_HW_RENDER`.
pub const HW_RENDER_LEGACY_SIZE: usize = mem::offset_of!(ffi::retro_hw_render_callback, stencil);

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Copies the C string a payload points at.
fn payload_str(data: Payload) -> Option<String> {
    // SAFETY: commands taking a string payload are documented as `const char *`.
    unsafe { owned_str(data.as_ptr().cast::<c_char>()) }
}

pub(super) fn set_rotation(env: &mut Environment, data: Payload) -> bool {
    let Some(rotation) = data.read::<c_uint>() else {
        return false;
    };
    debug!("Environ SET_ROTATION: {}", rotation);
    if !env.settings.allow_rotate {
        return true;
    }
    env.state.rotation = rotation;
    env.host.set_rotation(rotation)
}

pub(super) fn get_overscan(env: &mut Environment, data: Payload) -> bool {
    let overscan = !env.settings.crop_overscan;
    debug!("Environ GET_OVERSCAN: {}", overscan);
    data.write(overscan)
}

pub(super) fn get_can_dupe(_env: &mut Environment, data: Payload) -> bool {
    data.write(true)
}

pub(super) fn set_message(env: &mut Environment, data: Payload) -> bool {
    let Some(msg) = data.get::<ffi::retro_message>() else {
        return false;
    };
    // SAFETY: the core passes a C string.
    let text = unsafe { owned_str(msg.msg) }.unwrap_or_default();
    debug!("Environ SET_MESSAGE: {}", text);
    env.messages.clear();
    env.messages.push(&text, 1, msg.frames);
    true
}

pub(super) fn shutdown(env: &mut Environment, _data: Payload) -> bool {
    info!("Environ SHUTDOWN.");
    env.flags.shutdown = true;
    env.flags.core_shutdown_initiated = true;
    true
}

pub(super) fn set_performance_level(env: &mut Environment, data: Payload) -> bool {
    let Some(level) = data.read::<c_uint>() else {
        return false;
    };
    debug!("Environ PERFORMANCE_LEVEL: {}.", level);
    env.state.performance_level = level;
    true
}

pub(super) fn get_system_directory(env: &mut Environment, data: Payload) -> bool {
    if data.is_null() {
        return false;
    }
    let dir = env.settings.system_directory();
    if env.settings.system_directory.is_none() {
        match &dir {
            Some(dir) => warn!("SYSTEM DIR is empty, assume CONTENT DIR {}", dir.display()),
            None => warn!("SYSTEM DIR is empty and there is no content to fall back to"),
        }
    }
    let dir = env.publish(
        ffi::RETRO_ENVIRONMENT_GET_SYSTEM_DIRECTORY,
        dir.as_deref().map(path_string),
    );
    data.write(dir)
}

pub(super) fn set_pixel_format(env: &mut Environment, data: Payload) -> bool {
    let Some(raw) = data.read::<ffi::retro_pixel_format>() else {
        return false;
    };
    match PixelFormat::from_raw(raw) {
        Some(format) => {
            info!("Environ SET_PIXEL_FORMAT: {}.", format);
            env.state.pixel_format = format;
            true
        }
        None => false,
    }
}

pub(super) fn set_input_descriptors(env: &mut Environment, data: Payload) -> bool {
    let mut cursor = data.as_ptr().cast::<ffi::retro_input_descriptor>().cast_const();
    if cursor.is_null() {
        return false;
    }
    let descriptors = &mut env.state.input_descriptors;
    descriptors.clear();
    // SAFETY: the core passes an array terminated by an entry with a null description.
    unsafe {
        while !(*cursor).description.is_null() {
            let desc = &*cursor;
            cursor = cursor.add(1);
            if desc.port as usize >= MAX_USERS
                || desc.device != ffi::RETRO_DEVICE_JOYPAD
                || desc.id as usize >= FIRST_CUSTOM_BIND
            {
                continue;
            }
            if let Some(label) = owned_str(desc.description) {
                descriptors.set(desc.port as usize, desc.id as usize, label);
            }
        }
    }

    debug!("Environ SET_INPUT_DESCRIPTORS:");
    for (port, button, label) in descriptors.iter() {
        debug!("\tRetroPad, User {}, Button \"{}\" => \"{}\"", port + 1, JOYPAD_BUTTON_NAMES[button], label);
    }
    true
}

pub(super) fn set_keyboard_callback(env: &mut Environment, data: Payload) -> bool {
    debug!("Environ SET_KEYBOARD_CALLBACK.");
    match data.read::<ffi::retro_keyboard_callback>() {
        Some(cb) => {
            env.state.keyboard = Some(cb);
            true
        }
        None => false,
    }
}

pub(super) fn set_disk_control_interface(env: &mut Environment, data: Payload) -> bool {
    debug!("Environ SET_DISK_CONTROL_INTERFACE.");
    match data.read::<ffi::retro_disk_control_callback>() {
        Some(cb) => {
            env.state.disk_control = Some(cb);
            true
        }
        None => false,
    }
}

pub(super) fn set_hw_render(env: &mut Environment, data: Payload) -> bool {
    hw_render(env, data, false)
}

pub(super) fn set_hw_render_legacy(env: &mut Environment, data: Payload) -> bool {
    hw_render(env, data, true)
}

fn hw_context_supported(support: HwContextSupport, context: ffi::retro_hw_context_type) -> bool {
    use HwContextSupport::{OpenGl, OpenGles2, OpenGles3};

    match (context, support) {
        (_, HwContextSupport::None) => {
            error!("Requesting HW context {}, but the video driver has no HW rendering.", context);
            false
        }
        (ffi::RETRO_HW_CONTEXT_NONE, _) => {
            error!("Requesting no HW context. This is a bug in the core.");
            false
        }
        (ffi::RETRO_HW_CONTEXT_OPENGL | ffi::RETRO_HW_CONTEXT_OPENGL_CORE, OpenGl) => true,
        (ffi::RETRO_HW_CONTEXT_OPENGL | ffi::RETRO_HW_CONTEXT_OPENGL_CORE, _) => {
            error!("Requesting OpenGL context, but the video driver is OpenGLES. Cannot use HW context.");
            false
        }
        (ffi::RETRO_HW_CONTEXT_OPENGLES2, OpenGles2 | OpenGles3) => true,
        (ffi::RETRO_HW_CONTEXT_OPENGLES3 | ffi::RETRO_HW_CONTEXT_OPENGLES_VERSION, OpenGles3) => true,
        (
            ffi::RETRO_HW_CONTEXT_OPENGLES2
            | ffi::RETRO_HW_CONTEXT_OPENGLES3
            | ffi::RETRO_HW_CONTEXT_OPENGLES_VERSION,
            _,
        ) => {
            error!("Requesting OpenGLES context {}, which the video driver cannot provide. Cannot use HW context.", context);
            false
        }
        _ => {
            error!("Requesting unknown HW context {}.", context);
            false
        }
    }
}

fn hw_render(env: &mut Environment, data: Payload, legacy: bool) -> bool {
    let cb = data.as_ptr().cast::<ffi::retro_hw_render_callback>();
    if cb.is_null() {
        return false;
    }
    debug!("Environ SET_HW_RENDER.");

    // Legacy cores only allocate the fields before `stencil`, so nothing past that prefix is
    // touched through `cb`.
    // SAFETY: the core passes at least the legacy prefix, and the full struct unless `legacy`.
    unsafe {
        let context = ptr::addr_of!((*cb).context_type).read();
        if !hw_context_supported(env.settings.hw_context, context) {
            return false;
        }
        if context == ffi::RETRO_HW_CONTEXT_OPENGL_CORE && !legacy {
            info!(
                "Requesting core OpenGL context ({}.{}).",
                ptr::addr_of!((*cb).version_major).read(),
                ptr::addr_of!((*cb).version_minor).read()
            );
        }

        ptr::addr_of_mut!((*cb).get_current_framebuffer).write(Some(services::hw_current_framebuffer));
        ptr::addr_of_mut!((*cb).get_proc_address).write(Some(services::hw_proc_address));

        let mut stored = ffi::retro_hw_render_callback::default();
        let len = if legacy {
            HW_RENDER_LEGACY_SIZE
        } else {
            mem::size_of::<ffi::retro_hw_render_callback>()
        };
        ptr::copy_nonoverlapping(cb.cast::<u8>(), ptr::addr_of_mut!(stored).cast::<u8>(), len);
        env.state.hw_render = Some(stored);
    }
    true
}

pub(super) fn get_variable(env: &mut Environment, data: Payload) -> bool {
    let Some(var) = data.get_mut::<ffi::retro_variable>() else {
        return false;
    };
    var.value = ptr::null();
    // SAFETY: the core passes a C string key.
    let Some(key) = (unsafe { owned_str(var.key) }) else {
        return true;
    };

    let value = env.state.options.as_ref().and_then(|options| options.get(&key));
    debug!("Environ GET_VARIABLE {}: {}", key, value.unwrap_or("N/A"));
    let Some(value) = value else {
        return true;
    };
    match CString::new(value) {
        Ok(value) => {
            var.value = value.as_ptr();
            env.variables.insert(key, value);
        }
        Err(e) => warn!("Core option {} cannot be passed to the core: {}", key, e),
    }
    true
}

pub(super) fn set_variables(env: &mut Environment, data: Payload) -> bool {
    let mut cursor = data.as_ptr().cast::<ffi::retro_variable>().cast_const();
    if cursor.is_null() {
        return false;
    }
    debug!("Environ SET_VARIABLES.");

    if let Some(mut previous) = env.state.options.take() {
        if let Err(e) = previous.flush() {
            warn!("Failed to save core options: {}", e);
        }
    }
    env.variables.clear();

    let mut declarations = Vec::new();
    // SAFETY: the core passes an array terminated by an entry with a null key.
    unsafe {
        while !(*cursor).key.is_null() {
            let var = &*cursor;
            cursor = cursor.add(1);
            let key = owned_str(var.key).unwrap_or_default();
            let declaration = owned_str(var.value).unwrap_or_default();
            declarations.push((key, declaration));
        }
    }

    let path = env.settings.options_path();
    env.state.options = Some(CoreOptions::new(
        path.as_deref(),
        declarations.iter().map(|(key, decl)| (key.as_str(), decl.as_str())),
    ));
    true
}

pub(super) fn get_variable_update(env: &mut Environment, data: Payload) -> bool {
    let updated = env
        .state
        .options
        .as_mut()
        .is_some_and(CoreOptions::take_updated);
    data.write(updated)
}

pub(super) fn set_support_no_game(env: &mut Environment, data: Payload) -> bool {
    match data.read::<bool>() {
        Some(supported) => {
            debug!("Environ SET_SUPPORT_NO_GAME: {}.", supported);
            env.state.supports_no_game = supported;
            true
        }
        None => false,
    }
}

pub(super) fn get_libretro_path(env: &mut Environment, data: Payload) -> bool {
    if data.is_null() {
        return false;
    }
    let path = Some(&env.settings.core_path)
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| path_string(path));
    debug!("Environ GET_LIBRETRO_PATH: {:?}", path);
    let path = env.publish(ffi::RETRO_ENVIRONMENT_GET_LIBRETRO_PATH, path);
    data.write(path)
}

pub(super) fn set_frame_time_callback(env: &mut Environment, data: Payload) -> bool {
    if env.settings.netplay_active {
        warn!("Frame time callback cannot be used with netplay.");
        return false;
    }
    match data.read::<ffi::retro_frame_time_callback>() {
        Some(cb) => {
            debug!("Environ SET_FRAME_TIME_CALLBACK, reference {} usec.", cb.reference);
            env.state.frame_time = Some(cb);
            true
        }
        None => false,
    }
}

pub(super) fn set_audio_callback(env: &mut Environment, data: Payload) -> bool {
    if env.settings.netplay_active {
        warn!("Audio callback cannot be used with netplay.");
        return false;
    }
    if env.settings.recording_active {
        warn!("Audio callback cannot be used while recording.");
        return false;
    }
    match data.read::<ffi::retro_audio_callback>() {
        Some(cb) => {
            debug!("Environ SET_AUDIO_CALLBACK.");
            env.state.audio_callback = Some(cb);
            true
        }
        None => false,
    }
}

pub(super) fn get_rumble_interface(_env: &mut Environment, data: Payload) -> bool {
    debug!("Environ GET_RUMBLE_INTERFACE.");
    data.write(ffi::retro_rumble_interface {
        set_rumble_state: Some(services::set_rumble_state),
    })
}

pub(super) fn get_input_device_capabilities(env: &mut Environment, data: Payload) -> bool {
    match env.host.input_device_capabilities() {
        Some(caps) => data.write(caps),
        None => false,
    }
}

pub(super) fn get_sensor_interface(_env: &mut Environment, data: Payload) -> bool {
    debug!("Environ GET_SENSOR_INTERFACE.");
    data.write(ffi::retro_sensor_interface {
        set_sensor_state: Some(services::set_sensor_state),
        get_sensor_input: Some(services::sensor_input),
    })
}

pub(super) fn get_camera_interface(env: &mut Environment, data: Payload) -> bool {
    let Some(cb) = data.get_mut::<ffi::retro_camera_callback>() else {
        return false;
    };
    debug!("Environ GET_CAMERA_INTERFACE.");
    cb.start = Some(services::camera_start);
    cb.stop = Some(services::camera_stop);
    env.state.camera = Some(*cb);
    env.flags.camera_active = cb.caps != 0;
    true
}

pub(super) fn get_log_interface(_env: &mut Environment, data: Payload) -> bool {
    data.write(ffi::retro_log_callback {
        log: services::log_printf(),
    })
}

pub(super) fn get_perf_interface(_env: &mut Environment, data: Payload) -> bool {
    data.write(ffi::retro_perf_callback {
        get_time_usec: Some(perf::get_time_usec),
        get_cpu_features: Some(perf::get_cpu_features),
        get_perf_counter: Some(perf::get_perf_counter),
        perf_register: Some(services::perf_register),
        perf_start: Some(perf::perf_start),
        perf_stop: Some(perf::perf_stop),
        perf_log: Some(services::perf_log),
    })
}

pub(super) fn get_location_interface(env: &mut Environment, data: Payload) -> bool {
    let Some(cb) = data.get_mut::<ffi::retro_location_callback>() else {
        return false;
    };
    debug!("Environ GET_LOCATION_INTERFACE.");
    cb.start = Some(services::location_start);
    cb.stop = Some(services::location_stop);
    cb.get_position = Some(services::location_position);
    cb.set_interval = Some(services::location_set_interval);
    env.state.location = Some(*cb);
    env.flags.location_active = true;
    true
}

pub(super) fn get_core_assets_directory(env: &mut Environment, data: Payload) -> bool {
    if data.is_null() {
        return false;
    }
    let dir = env.settings.core_assets_directory.as_deref().map(path_string);
    debug!("Environ CORE_ASSETS_DIRECTORY: {:?}.", dir);
    let dir = env.publish(ffi::RETRO_ENVIRONMENT_GET_CORE_ASSETS_DIRECTORY, dir);
    data.write(dir)
}

pub(super) fn get_save_directory(env: &mut Environment, data: Payload) -> bool {
    if data.is_null() {
        return false;
    }
    let dir = env.settings.save_directory.as_deref().map(path_string);
    debug!("Environ SAVE_DIRECTORY: {:?}.", dir);
    let dir = env.publish(ffi::RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY, dir);
    data.write(dir)
}

pub(super) fn set_system_av_info(env: &mut Environment, data: Payload) -> bool {
    let Some(av_info) = data.read::<ffi::retro_system_av_info>() else {
        return false;
    };
    debug!("Environ SET_SYSTEM_AV_INFO.");
    env.state.av_info = av_info;
    env.host.av_info_changed(&av_info);
    true
}

pub(super) fn set_proc_address_callback(env: &mut Environment, data: Payload) -> bool {
    debug!("Environ SET_PROC_ADDRESS_CALLBACK.");
    env.state.proc_address = data
        .read::<ffi::retro_get_proc_address_interface>()
        .and_then(|iface| iface.get_proc_address);
    true
}

pub(super) fn set_subsystem_info(env: &mut Environment, data: Payload) -> bool {
    let info = data.as_ptr().cast::<ffi::retro_subsystem_info>().cast_const();
    if info.is_null() {
        return false;
    }
    // SAFETY: the core passes a list terminated by an entry with a null ident.
    env.state.subsystems = unsafe { Subsystem::copy_list(info) };
    debug!("Environ SET_SUBSYSTEM_INFO:");
    for subsystem in &env.state.subsystems {
        debug!(
            "Special game type: {}\n  Ident: {}\n  ID: {}\n  Content:",
            subsystem.desc.as_deref().unwrap_or(""),
            subsystem.ident.as_deref().unwrap_or(""),
            subsystem.id
        );
        for rom in &subsystem.roms {
            debug!(
                "    {} ({})",
                rom.desc.as_deref().unwrap_or(""),
                if rom.required { "required" } else { "optional" }
            );
        }
    }
    true
}

pub(super) fn set_controller_info(env: &mut Environment, data: Payload) -> bool {
    let info = data.as_ptr().cast::<ffi::retro_controller_info>().cast_const();
    if info.is_null() {
        return false;
    }
    // SAFETY: the core passes a list terminated by an entry with null types.
    env.state.ports = unsafe { ControllerPort::copy_list(info) };
    debug!("Environ SET_CONTROLLER_INFO:");
    for (port, controllers) in env.state.ports.iter().enumerate() {
        for controller in &controllers.types {
            debug!(
                "   {} : {} (ID: {})",
                port,
                controller.desc.as_deref().unwrap_or(""),
                controller.id
            );
        }
    }
    true
}

pub(super) fn set_memory_maps(env: &mut Environment, data: Payload) -> bool {
    let Some(map) = data.get::<ffi::retro_memory_map>() else {
        return false;
    };
    // SAFETY: the descriptor array is valid for `num_descriptors` entries.
    env.state.memory_map = unsafe { MemoryDescriptor::copy_map(map) };
    debug!("Environ SET_MEMORY_MAPS: {} descriptors.", env.state.memory_map.len());
    true
}

pub(super) fn set_geometry(env: &mut Environment, data: Payload) -> bool {
    let Some(new) = data.read::<ffi::retro_game_geometry>() else {
        return false;
    };
    let geometry = &mut env.state.av_info.geometry;
    if new.base_width != geometry.base_width
        || new.base_height != geometry.base_height
        || new.aspect_ratio != geometry.aspect_ratio
    {
        geometry.base_width = new.base_width;
        geometry.base_height = new.base_height;
        geometry.aspect_ratio = new.aspect_ratio;
        let geometry = *geometry;
        debug!(
            "SET_GEOMETRY: {}x{}, aspect: {:.3}.",
            geometry.base_width, geometry.base_height, geometry.aspect_ratio
        );
        env.host.aspect_ratio_changed(&geometry);
    }
    true
}

pub(super) fn get_username(env: &mut Environment, data: Payload) -> bool {
    if data.is_null() {
        return false;
    }
    let username = env.settings.username.clone();
    debug!("Environ GET_USERNAME: \"{}\".", username.as_deref().unwrap_or(""));
    let username = env.publish(ffi::RETRO_ENVIRONMENT_GET_USERNAME, username);
    data.write(username)
}

pub(super) fn get_language(env: &mut Environment, data: Payload) -> bool {
    debug!("Environ GET_LANGUAGE: {}.", env.settings.language);
    data.write(env.settings.language)
}

pub(super) fn exec(env: &mut Environment, data: Payload) -> bool {
    request_exec(env, data, false)
}

pub(super) fn exec_escape(env: &mut Environment, data: Payload) -> bool {
    request_exec(env, data, true)
}

fn request_exec(env: &mut Environment, data: Payload, replace_process: bool) -> bool {
    let content = payload_str(data).filter(|s| !s.is_empty()).map(PathBuf::from);
    match &content {
        Some(content) => info!("Environ EXEC: {}", content.display()),
        None => info!("Environ EXEC without content."),
    }
    env.flags.exec = Some(PendingExec {
        content,
        replace_process,
    });
    env.flags.shutdown = true;
    true
}

pub(super) fn set_libretro_path(env: &mut Environment, data: Payload) -> bool {
    let Some(path) = payload_str(data).map(PathBuf::from) else {
        return false;
    };
    if !path.exists() {
        warn!("Environ SET_LIBRETRO_PATH: {} does not exist.", path.display());
        return false;
    }
    debug!("Environ SET_LIBRETRO_PATH: {}.", path.display());
    env.settings.core_path = path;
    true
}

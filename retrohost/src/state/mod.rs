//! State negotiated with the running core.
//!
//! [`SystemState`] is reset when a core is loaded, written only by environment handlers and
//! cleared again when the core is unloaded. Callback tables are stored as the core handed them
//! over; strings and descriptor arrays are copied out of core memory.
use std::ffi::{c_void, CStr};
use std::path::PathBuf;

use crate::{ffi, format::PixelFormat, options::CoreOptions};


/// Number of ports input descriptors are tracked for.
pub const MAX_USERS: usize = 16;
/// Button ids at or above this are custom binds and are not tracked.
pub const FIRST_CUSTOM_BIND: usize = 16;

/// Joypad button names indexed by `RETRO_DEVICE_ID_JOYPAD_*`.
pub const JOYPAD_BUTTON_NAMES: [&str; FIRST_CUSTOM_BIND] = [
    "B", "Y", "Select", "Start", "Up", "Down", "Left", "Right", "A", "X", "L", "R", "L2", "R2",
    "L3", "R3",
];

/// Copies a C string, mapping null to `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL terminated string.
pub(crate) unsafe fn owned_str(ptr: *const std::ffi::c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemMemory {
    pub extension: Option<String>,
    pub memory_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemRom {
    pub desc: Option<String>,
    pub valid_extensions: Option<String>,
    pub need_fullpath: bool,
    pub block_extract: bool,
    pub required: bool,
    pub memory: Vec<SubsystemMemory>,
}

/// A special content type a core can load through `retro_load_game_special`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsystem {
    pub desc: Option<String>,
    pub ident: Option<String>,
    pub id: u32,
    pub roms: Vec<SubsystemRom>,
}

impl Subsystem {
    /// Copies a subsystem list terminated by an entry with a null `ident`.
    ///
    /// # Safety
    /// `info` must point to such a list, with every nested array valid for its stated length.
    pub unsafe fn copy_list(info: *const ffi::retro_subsystem_info) -> Vec<Self> {
        let mut list = Vec::new();
        let mut cursor = info;
        while !(*cursor).ident.is_null() {
            list.push(Self::copy(&*cursor));
            cursor = cursor.add(1);
        }
        list
    }

    unsafe fn copy(raw: &ffi::retro_subsystem_info) -> Self {
        let roms = slice_or_empty(raw.roms, raw.num_roms)
            .iter()
            .map(|rom| SubsystemRom {
                desc: owned_str(rom.desc),
                valid_extensions: owned_str(rom.valid_extensions),
                need_fullpath: rom.need_fullpath,
                block_extract: rom.block_extract,
                required: rom.required,
                memory: slice_or_empty(rom.memory, rom.num_memory)
                    .iter()
                    .map(|m| SubsystemMemory {
                        extension: owned_str(m.extension),
                        memory_type: m.type_,
                    })
                    .collect(),
            })
            .collect();
        Self {
            desc: owned_str(raw.desc),
            ident: owned_str(raw.ident),
            id: raw.id,
            roms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescription {
    pub desc: Option<String>,
    pub id: u32,
}

/// The controller types a core accepts on one port.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerPort {
    pub types: Vec<ControllerDescription>,
}

impl ControllerPort {
    /// Copies a port list terminated by an entry with a null `types` pointer.
    ///
    /// # Safety
    /// `info` must point to such a list.
    pub unsafe fn copy_list(info: *const ffi::retro_controller_info) -> Vec<Self> {
        let mut ports = Vec::new();
        let mut cursor = info;
        while !(*cursor).types.is_null() {
            let raw = &*cursor;
            ports.push(Self {
                types: slice_or_empty(raw.types, raw.num_types)
                    .iter()
                    .map(|t| ControllerDescription {
                        desc: owned_str(t.desc),
                        id: t.id,
                    })
                    .collect(),
            });
            cursor = cursor.add(1);
        }
        ports
    }
}

/// One region of the emulated address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDescriptor {
    pub flags: u64,
    pub ptr: *mut c_void,
    pub offset: usize,
    pub start: usize,
    pub select: usize,
    pub disconnect: usize,
    pub len: usize,
    pub addrspace: Option<String>,
}

impl MemoryDescriptor {
    /// # Safety
    /// `map` must describe a valid descriptor array.
    pub unsafe fn copy_map(map: &ffi::retro_memory_map) -> Vec<Self> {
        slice_or_empty(map.descriptors, map.num_descriptors)
            .iter()
            .map(|d| Self {
                flags: d.flags,
                ptr: d.ptr,
                offset: d.offset,
                start: d.start,
                select: d.select,
                disconnect: d.disconnect,
                len: d.len,
                addrspace: owned_str(d.addrspace),
            })
            .collect()
    }
}

unsafe fn slice_or_empty<'a, T>(ptr: *const T, len: u32) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(ptr, len as usize)
    }
}

/// Input descriptor labels per port and joypad button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputDescriptors {
    table: [[Option<String>; FIRST_CUSTOM_BIND]; MAX_USERS],
}

impl InputDescriptors {
    pub fn get(&self, port: usize, button: usize) -> Option<&str> {
        self.table.get(port)?.get(button)?.as_deref()
    }

    /// Stores `label` unless the slot is outside the tracked table.
    pub fn set(&mut self, port: usize, button: usize, label: String) -> bool {
        match self.table.get_mut(port).and_then(|p| p.get_mut(button)) {
            Some(slot) => {
                *slot = Some(label);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Iterates over `(port, button, label)` for every stored label.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.table.iter().enumerate().flat_map(|(port, buttons)| {
            buttons
                .iter()
                .enumerate()
                .filter_map(move |(button, label)| label.as_deref().map(|l| (port, button, l)))
        })
    }
}

/// Everything the core negotiated through the environment callback.
#[derive(Default)]
pub struct SystemState {
    pub pixel_format: PixelFormat,
    pub rotation: u32,
    pub performance_level: u32,
    pub supports_no_game: bool,
    pub input_descriptors: InputDescriptors,
    pub subsystems: Vec<Subsystem>,
    pub ports: Vec<ControllerPort>,
    pub memory_map: Vec<MemoryDescriptor>,
    pub av_info: ffi::retro_system_av_info,
    pub options: Option<CoreOptions>,

    pub keyboard: Option<ffi::retro_keyboard_callback>,
    pub disk_control: Option<ffi::retro_disk_control_callback>,
    pub hw_render: Option<ffi::retro_hw_render_callback>,
    pub frame_time: Option<ffi::retro_frame_time_callback>,
    pub audio_callback: Option<ffi::retro_audio_callback>,
    pub camera: Option<ffi::retro_camera_callback>,
    pub location: Option<ffi::retro_location_callback>,
    pub proc_address: ffi::retro_get_proc_address_t,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything negotiated so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True if the core has not negotiated anything since the last reset.
    pub fn is_pristine(&self) -> bool {
        self.pixel_format == PixelFormat::default()
            && self.rotation == 0
            && self.performance_level == 0
            && !self.supports_no_game
            && self.input_descriptors.iter().next().is_none()
            && self.subsystems.is_empty()
            && self.ports.is_empty()
            && self.memory_map.is_empty()
            && self.options.is_none()
            && self.keyboard.is_none()
            && self.disk_control.is_none()
            && self.hw_render.is_none()
            && self.frame_time.is_none()
            && self.audio_callback.is_none()
            && self.camera.is_none()
            && self.location.is_none()
            && self.proc_address.is_none()
    }
}

impl std::fmt::Debug for SystemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemState")
            .field("pixel_format", &self.pixel_format)
            .field("rotation", &self.rotation)
            .field("performance_level", &self.performance_level)
            .field("supports_no_game", &self.supports_no_game)
            .field("subsystems", &self.subsystems.len())
            .field("ports", &self.ports.len())
            .field("options", &self.options.as_ref().map(CoreOptions::len))
            .field("hw_render", &self.hw_render.map(|hw| hw.context_type))
            .finish_non_exhaustive()
    }
}

/// A request from the core to restart the frontend with new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExec {
    pub content: Option<PathBuf>,
    /// Replace the running process instead of spawning a child.
    pub replace_process: bool,
}

/// Flags the main loop polls after every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunloopFlags {
    pub shutdown: bool,
    pub core_shutdown_initiated: bool,
    pub exec: Option<PendingExec>,
    pub camera_active: bool,
    pub location_active: bool,
}

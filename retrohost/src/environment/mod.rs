//! The environment callback: how a core negotiates with the frontend.
//!
//! A core reaches the frontend through a single C function pointer that takes a command code
//! and an untyped payload. [`Environment`] holds everything those commands read or write and
//! answers them through a [`CommandTable`] of independent handlers.
//!
//! Since the callback carries no context pointer, the environment serving it is registered
//! per thread with [`activate`]. [`suppress`] switches the callback to
//! [`DispatchMode::ProbeOnly`] for as long as the returned guard lives, so a core whose
//! metadata is being probed cannot reach the live session.
use log::{debug, error, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::{c_char, c_uint, c_void, CString};
use std::ptr;
use std::rc::{Rc, Weak};

use crate::{
    ffi,
    frame::VideoFrame,
    host::Host,
    message::MessageQueue,
    perf::PerfRegistry,
    settings::Settings,
    state::{RunloopFlags, SystemState},
};

mod commands;
mod handlers;
mod payload;
pub(crate) mod services;

pub use self::commands::{CommandTable, Handler};
pub use self::handlers::HW_RENDER_LEGACY_SIZE;
pub use self::payload::Payload;

#[cfg(test)]
mod tests;

/// Whether a dispatched command may act on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchMode {
    /// Commands are handled normally.
    #[default]
    Live,
    /// Every command is refused without side effects.
    ProbeOnly,
}

/// The frontend side of the environment protocol for one session.
pub struct Environment {
    pub settings: Settings,
    pub state: SystemState,
    pub flags: RunloopFlags,
    pub messages: MessageQueue,
    pub perf: PerfRegistry,
    host: Box<dyn Host>,
    /// Strings handed to the core, one slot per query command.
    strings: HashMap<u32, CString>,
    /// Option values handed to the core, by key.
    variables: HashMap<String, CString>,
    commands: CommandTable,
    frame: Option<VideoFrame>,
}

impl Environment {
    /// An environment answering the libretro command set.
    pub fn new(settings: Settings, host: impl Host + 'static) -> Self {
        Self::with_commands(settings, host, CommandTable::libretro())
    }

    pub fn with_commands(settings: Settings, host: impl Host + 'static, commands: CommandTable) -> Self {
        Self {
            settings,
            state: SystemState::new(),
            flags: RunloopFlags::default(),
            messages: MessageQueue::default(),
            perf: PerfRegistry::new(),
            host: Box::new(host),
            strings: HashMap::new(),
            variables: HashMap::new(),
            commands,
            frame: None,
        }
    }

    /// Answers command `cmd`. Returns false if the command is unknown or refused.
    pub fn dispatch(&mut self, cmd: u32, data: Payload, mode: DispatchMode) -> bool {
        if mode == DispatchMode::ProbeOnly {
            return false;
        }
        match self.commands.get(cmd) {
            Some(handler) => handler(self, data),
            None => {
                debug!("Environ UNSUPPORTED (#{}).", cmd);
                false
            }
        }
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn Host {
        self.host.as_mut()
    }

    /// The most recent frame the core rendered.
    pub fn last_frame(&self) -> Option<&VideoFrame> {
        self.frame.as_ref()
    }

    pub fn take_frame(&mut self) -> Option<VideoFrame> {
        self.frame.take()
    }

    /// Drops everything the core negotiated. Core options are flushed to disk first.
    pub fn reset(&mut self) {
        if let Some(options) = self.state.options.as_mut() {
            if let Err(e) = options.flush() {
                warn!("Failed to save core options: {}", e);
            }
        }
        self.state.reset();
        self.flags = RunloopFlags::default();
        self.messages.clear();
        self.perf.clear();
        self.strings.clear();
        self.variables.clear();
        self.frame = None;
    }

    /// Keeps `value` alive in `slot` and returns a pointer to it, or null for `None`.
    ///
    /// The pointer stays valid until the same slot is published again or the environment is
    /// reset.
    pub(crate) fn publish(&mut self, slot: u32, value: Option<String>) -> *const c_char {
        let Some(value) = value else {
            self.strings.remove(&slot);
            return ptr::null();
        };
        match CString::new(value) {
            Ok(value) => {
                let ptr = value.as_ptr();
                self.strings.insert(slot, value);
                ptr
            }
            Err(e) => {
                warn!("Cannot pass string with interior NUL to the core: {}", e);
                self.strings.remove(&slot);
                ptr::null()
            }
        }
    }

    /// Stores a frame handed to `video_refresh`.
    ///
    /// A null `data` is a dupe and keeps the previous frame. Hardware rendered frames carry no
    /// pixels and are ignored.
    ///
    /// # Safety
    /// Unless null or [`RETRO_HW_FRAME_BUFFER_VALID`](ffi::RETRO_HW_FRAME_BUFFER_VALID),
    /// `data` must describe a frame of the current pixel format.
    pub(crate) unsafe fn capture_frame(&mut self, data: *const c_void, width: u32, height: u32, pitch: usize) {
        if data.is_null() || data == ffi::RETRO_HW_FRAME_BUFFER_VALID {
            return;
        }
        self.frame = Some(VideoFrame::from_raw(data, width, height, pitch, self.state.pixel_format));
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("flags", &self.flags)
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

thread_local! {
    static ACTIVE: RefCell<Weak<RefCell<Environment>>> = RefCell::new(Weak::new());
    static MODE: Cell<DispatchMode> = const { Cell::new(DispatchMode::Live) };
}

/// Makes `env` the environment [`environment_callback`] serves on this thread.
///
/// The previously active environment is restored when the guard is dropped.
pub fn activate(env: &Rc<RefCell<Environment>>) -> ActiveGuard {
    let previous = ACTIVE.with(|active| active.replace(Rc::downgrade(env)));
    ActiveGuard { previous }
}

#[must_use = "the environment is deactivated when the guard is dropped"]
pub struct ActiveGuard {
    previous: Weak<RefCell<Environment>>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        ACTIVE.with(|active| *active.borrow_mut() = previous);
    }
}

/// Refuses every command reaching [`environment_callback`] until the guard is dropped.
pub fn suppress() -> SuppressGuard {
    let previous = MODE.with(|mode| mode.replace(DispatchMode::ProbeOnly));
    SuppressGuard { previous }
}

#[must_use = "dispatch is suppressed only while the guard lives"]
pub struct SuppressGuard {
    previous: DispatchMode,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        MODE.with(|mode| mode.set(self.previous));
    }
}

/// The mode [`environment_callback`] currently dispatches with.
pub fn current_mode() -> DispatchMode {
    MODE.with(Cell::get)
}

/// Runs `f` on the active environment, or returns `None` if there is none or it is busy.
pub(crate) fn with_active<R>(f: impl FnOnce(&mut Environment) -> R) -> Option<R> {
    let cell = ACTIVE.with(|active| active.borrow().upgrade())?;
    let result = match cell.try_borrow_mut() {
        Ok(mut env) => Some(f(&mut env)),
        Err(_) => {
            error!("Environment callback reentered while the environment is in use");
            None
        }
    };
    result
}

/// The `retro_environment_t` registered with every core.
///
/// # Safety
/// Called by cores only, with a payload matching `cmd`.
pub unsafe extern "C" fn environment_callback(cmd: c_uint, data: *mut c_void) -> bool {
    let mode = current_mode();
    if mode == DispatchMode::ProbeOnly {
        return false;
    }
    let payload = Payload::new(data);
    with_active(|env| env.dispatch(cmd, payload, mode)).unwrap_or(false)
}

//! Reading a core's metadata without making it the active core.
use log::debug;
use std::cell::Cell;
use std::ffi::{c_uint, c_void};
use std::path::Path;

use super::{ProbeError, ProbeResult, SystemInfo};
use crate::{dylib::Loader, environment, ffi};

thread_local! {
    static NO_CONTENT: Cell<bool> = const { Cell::new(false) };
}

/// Installed while probing: records `SET_SUPPORT_NO_GAME` and refuses everything else.
unsafe extern "C" fn probe_environment(cmd: c_uint, data: *mut c_void) -> bool {
    if cmd != ffi::RETRO_ENVIRONMENT_SET_SUPPORT_NO_GAME || data.is_null() {
        return false;
    }
    NO_CONTENT.with(|c| c.set(*data.cast::<bool>()));
    true
}

/// Reads the metadata of the core at `path`.
///
/// Only `retro_get_system_info` is called, plus `retro_set_environment` when
/// `want_no_content` is set. The library is closed before returning.
pub fn probe(loader: &dyn Loader, path: &Path, want_no_content: bool) -> ProbeResult<SystemInfo> {
    let library = loader.open(path)?;

    let get_system_info = library
        .symbol("retro_get_system_info")
        .ok_or_else(|| ProbeError::MissingMetadata(path.to_path_buf()))?;
    // SAFETY: the export has this type per the libretro ABI.
    let get_system_info: ffi::retro_get_system_info_t = unsafe { get_system_info.cast() };

    let mut raw = ffi::retro_system_info::default();
    // SAFETY: the core fills `raw` with pointers to its own static strings, which are copied
    // below while the library is still open.
    let mut info = unsafe {
        get_system_info(&mut raw);
        SystemInfo::from_raw(&raw)
    };

    if want_no_content {
        match library.symbol("retro_set_environment") {
            Some(set_environment) => {
                // SAFETY: as above.
                let set_environment: ffi::retro_set_environment_t = unsafe { set_environment.cast() };
                NO_CONTENT.with(|c| c.set(false));
                unsafe { set_environment(Some(probe_environment)) };
                info.supports_no_content = NO_CONTENT.with(Cell::get);

                // Opening a core that is already loaded yields the same image, so the real
                // callback is put back. Whatever the core requests while it is re-registered
                // must not reach the live session.
                let _suppress = environment::suppress();
                unsafe { set_environment(Some(environment::environment_callback)) };
            }
            None => debug!("{} has no retro_set_environment", path.display()),
        }
    }

    drop(library);
    Ok(info)
}

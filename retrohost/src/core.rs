//! Binding a libretro core's exported interface.
//!
//! A core is reached through the [`CoreApi`] trait. [`bind`] returns either a
//! [`LibretroCore`] whose every entry points into one loaded library, or the built-in
//! [`DummyCore`]. A library that lacks any export is never partially bound.
use log::{error, info};
use std::path::Path;

use crate::{dylib::Loader, settings::Settings};

mod api;
mod dummy;
mod errors;
mod info;
mod libretro;
pub mod probe;

pub use self::api::CoreApi;
pub use self::dummy::DummyCore;
pub use self::errors::{CoreError, CoreResult, ProbeError, ProbeResult};
pub use self::info::SystemInfo;
pub use self::libretro::{LibretroCore, SYMBOL_NAMES};
pub use self::probe::probe;

#[cfg(test)]
mod tests;

/// Binds the core configured in `settings`.
///
/// With `use_dummy` this returns a [`DummyCore`] and cannot fail. Otherwise the configured
/// path is made absolute and written back to `settings`, the library is opened and every
/// export is resolved.
///
/// # Errors
/// - [`CoreError::EmptyPath`] if no core path is configured
/// - [`CoreError::StaticallyLinked`] if the running process already exports the libretro
///   interface
/// - [`CoreError::Load`] if the library cannot be opened
/// - [`CoreError::MissingSymbol`] if any export is missing; the library is closed again
pub fn bind(
    loader: &dyn Loader,
    settings: &mut Settings,
    use_dummy: bool,
) -> CoreResult<Box<dyn CoreApi>> {
    if use_dummy {
        return Ok(Box::new(DummyCore));
    }

    if settings.core_path.as_os_str().is_empty() {
        error!("Frontend is built for dynamic libretro cores, but no core path is set. Cannot continue.");
        return Err(CoreError::EmptyPath);
    }

    if loader.lookup_self(SYMBOL_NAMES[0]).is_some() {
        error!("Serious problem: the libretro interface is linked into the frontend, but a dynamic core was requested.");
        return Err(CoreError::StaticallyLinked);
    }

    let path = absolute(&settings.core_path)?;
    settings.core_path = path.clone();
    info!("Loading dynamic libretro core from: \"{}\"", path.display());

    let core = LibretroCore::open(loader, &path)?;
    Ok(Box::new(core))
}

fn absolute(path: &Path) -> CoreResult<std::path::PathBuf> {
    std::path::absolute(path).map_err(|source| CoreError::ResolvePath {
        path: path.to_path_buf(),
        source,
    })
}

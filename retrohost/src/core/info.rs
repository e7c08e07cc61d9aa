use std::fmt;

use crate::{ffi, state::owned_str};

/// Static metadata of a core.
///
/// The strings are copies, so the value outlives the library it was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SystemInfo {
    pub library_name: Option<String>,
    pub library_version: Option<String>,
    /// Pipe separated content extensions, e.g. `"sfc|smc"`.
    pub valid_extensions: Option<String>,
    pub need_fullpath: bool,
    pub block_extract: bool,
    /// Whether the core can run without content. Only filled in when asked for.
    pub supports_no_content: bool,
}

impl SystemInfo {
    /// Copies `raw` out of core memory.
    ///
    /// # Safety
    /// Every string pointer in `raw` must be null or a valid C string.
    pub unsafe fn from_raw(raw: &ffi::retro_system_info) -> Self {
        Self {
            library_name: owned_str(raw.library_name),
            library_version: owned_str(raw.library_version),
            valid_extensions: owned_str(raw.valid_extensions),
            need_fullpath: raw.need_fullpath,
            block_extract: raw.block_extract,
            supports_no_content: false,
        }
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.valid_extensions
            .as_deref()
            .unwrap_or("")
            .split('|')
            .filter(|ext| !ext.is_empty())
    }

    /// Case-insensitive check against [`valid_extensions`](SystemInfo::valid_extensions).
    pub fn supports_extension(&self, ext: &str) -> bool {
        self.extensions().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Frees every string and clears every flag.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    pub fn is_released(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.library_name.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Version: {}", self.library_version.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Extensions: {}", self.valid_extensions.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Needs full path: {}", self.need_fullpath)?;
        writeln!(f, "Blocks extraction: {}", self.block_extract)?;
        write!(f, "Runs without content: {}", self.supports_no_content)
    }
}

//! Frontend settings consulted while answering a core's environment requests.
use std::path::{Path, PathBuf};

use crate::ffi;

/// Which family of hardware rendering contexts the video backend can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HwContextSupport {
    /// No hardware rendering at all.
    None,
    /// Desktop OpenGL, compatibility or core profile.
    #[default]
    OpenGl,
    /// OpenGL ES 2 only.
    OpenGles2,
    /// OpenGL ES 2 and 3.
    OpenGles3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Path of the core library. Rewritten to an absolute path when the core is bound.
    pub core_path: PathBuf,
    /// The content to load, if any.
    pub content_path: Option<PathBuf>,
    pub system_directory: Option<PathBuf>,
    pub save_directory: Option<PathBuf>,
    pub core_assets_directory: Option<PathBuf>,
    /// Where core options are persisted.
    pub core_options_path: Option<PathBuf>,
    /// The frontend's own config file. Its directory hosts the core options file when
    /// `core_options_path` is unset.
    pub config_path: Option<PathBuf>,
    pub username: Option<String>,
    pub language: ffi::retro_language,
    pub crop_overscan: bool,
    pub allow_rotate: bool,
    pub hw_context: HwContextSupport,
    pub netplay_active: bool,
    pub recording_active: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            core_path: PathBuf::new(),
            content_path: None,
            system_directory: None,
            save_directory: None,
            core_assets_directory: None,
            core_options_path: None,
            config_path: None,
            username: None,
            language: ffi::RETRO_LANGUAGE_ENGLISH,
            crop_overscan: true,
            allow_rotate: true,
            hw_context: HwContextSupport::default(),
            netplay_active: false,
            recording_active: false,
        }
    }
}

/// File name of the core options file placed next to the frontend config.
pub const CORE_OPTIONS_FILE: &str = "core-options.cfg";

impl Settings {
    pub fn with_core(core_path: impl Into<PathBuf>) -> Self {
        Self {
            core_path: core_path.into(),
            ..Self::default()
        }
    }

    /// The core options file: the configured one, else one next to the config file.
    pub fn options_path(&self) -> Option<PathBuf> {
        self.core_options_path.clone().or_else(|| {
            self.config_path
                .as_deref()
                .map(|config| config.parent().unwrap_or(Path::new("")).join(CORE_OPTIONS_FILE))
        })
    }

    /// The system directory, falling back to the directory holding the content.
    pub fn system_directory(&self) -> Option<PathBuf> {
        self.system_directory.clone().or_else(|| {
            self.content_path
                .as_deref()
                .and_then(Path::parent)
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
    }
}

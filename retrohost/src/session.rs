//! The lifecycle of one running core.
//!
//! A [`Session`] owns the bound core, the [`Environment`] answering it and the loader the core
//! came from. Only one session should be live per thread: the session's environment is the one
//! the environment callback reaches while the session exists.
use log::{error, info, warn};
use std::cell::{Ref, RefCell, RefMut};
use std::ffi::CString;
use std::fs;
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::Rc;

use crate::{
    core::{self, probe::probe, CoreApi, CoreError, CoreResult, DummyCore, ProbeResult, SystemInfo},
    dylib::Loader,
    environment::{self, services, ActiveGuard, Environment},
    ffi,
    frame::VideoFrame,
    host::Host,
    settings::Settings,
    state::PendingExec,
};


/// Content handed to `retro_load_game`, kept alive until the game is unloaded.
struct LoadedContent {
    path: CString,
    data: Option<Vec<u8>>,
}

pub struct Session {
    loader: Box<dyn Loader>,
    env: Rc<RefCell<Environment>>,
    core: Box<dyn CoreApi>,
    info: SystemInfo,
    content: Option<LoadedContent>,
    initialized: bool,
    game_loaded: bool,
    _active: ActiveGuard,
}

impl Session {
    /// A session running the dummy core.
    pub fn new(settings: Settings, loader: impl Loader + 'static, host: impl Host + 'static) -> Self {
        let env = Rc::new(RefCell::new(Environment::new(settings, host)));
        let active = environment::activate(&env);
        let mut session = Self {
            loader: Box::new(loader),
            env,
            core: Box::new(DummyCore),
            info: SystemInfo::default(),
            content: None,
            initialized: false,
            game_loaded: false,
            _active: active,
        };
        session.install(Box::new(DummyCore));
        session
    }

    /// Unloads the current core and binds the one configured in the settings.
    ///
    /// # Errors
    /// Everything [`core::bind`] reports. The session is left running the dummy core.
    pub fn load_core(&mut self) -> CoreResult<()> {
        self.unload();
        let bound = {
            let mut env = self.env.borrow_mut();
            core::bind(self.loader.as_ref(), &mut env.settings, false)
        };
        match bound {
            Ok(core) => {
                self.install(core);
                Ok(())
            }
            Err(e) => {
                self.install(Box::new(DummyCore));
                Err(e)
            }
        }
    }

    /// Like [`load_core`](Session::load_core), but logs a failure and keeps the dummy core.
    /// Returns whether the configured core was loaded.
    pub fn load_core_or_dummy(&mut self) -> bool {
        match self.load_core() {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                warn!("Falling back to the dummy core.");
                false
            }
        }
    }

    /// Registers the environment with `core` and reads its metadata. No environment borrow may
    /// be held here: the core calls back into it.
    fn install(&mut self, core: Box<dyn CoreApi>) {
        self.env.borrow_mut().reset();
        core.set_environment(Some(environment::environment_callback));

        let version = core.api_version();
        if version != ffi::RETRO_API_VERSION {
            warn!(
                "Core API version {} does not match frontend API version {}, serialization may be incompatible.",
                version,
                ffi::RETRO_API_VERSION
            );
        }

        let raw = core.get_system_info();
        // SAFETY: the strings are the core's own and are copied before anything else runs.
        self.info = unsafe { SystemInfo::from_raw(&raw) };
        self.info.supports_no_content = self.env.borrow().state.supports_no_game;
        if !core.is_dummy() {
            info!(
                "Loaded {} {}",
                self.info.library_name.as_deref().unwrap_or("core"),
                self.info.library_version.as_deref().unwrap_or("")
            );
        }
        self.core = core;
    }

    /// Calls `retro_init` and hands the core the frontend callbacks.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.core.init();
        self.core.set_video_refresh(Some(services::video_refresh));
        self.core.set_audio_sample(Some(services::audio_sample));
        self.core.set_audio_sample_batch(Some(services::audio_sample_batch));
        self.core.set_input_poll(Some(services::input_poll));
        self.core.set_input_state(Some(services::input_state));
        self.initialized = true;
    }

    /// Loads `content`, or the content configured in the settings. Without either, the core
    /// must support running without content.
    ///
    /// # Errors
    /// - [`CoreError::ContentRequired`] if there is no content and the core needs some
    /// - [`CoreError::ContentPath`] if the path cannot be passed to the core
    /// - [`CoreError::ContentRead`] if the content cannot be read
    /// - [`CoreError::LoadGame`] if the core refuses the content
    pub fn load_game(&mut self, content: Option<&Path>) -> CoreResult<()> {
        self.init();
        if self.game_loaded {
            self.core.unload_game();
            self.game_loaded = false;
            self.content = None;
        }

        let path = content
            .map(Path::to_path_buf)
            .or_else(|| self.env.borrow().settings.content_path.clone());
        let loaded = match path {
            None => {
                if !self.env.borrow().state.supports_no_game {
                    return Err(CoreError::ContentRequired);
                }
                info!("Starting core without content.");
                self.core.load_game(None)
            }
            Some(path) => {
                let content = self.read_content(&path)?;
                self.env.borrow_mut().settings.content_path = Some(path);
                let game = ffi::retro_game_info {
                    path: content.path.as_ptr(),
                    data: content
                        .data
                        .as_ref()
                        .map_or(ptr::null(), |data| data.as_ptr().cast()),
                    size: content.data.as_ref().map_or(0, Vec::len),
                    meta: ptr::null(),
                };
                let loaded = self.core.load_game(Some(&game));
                self.content = Some(content);
                loaded
            }
        };

        if !loaded {
            self.content = None;
            return Err(CoreError::LoadGame);
        }
        self.game_loaded = true;

        let av_info = self.core.get_system_av_info();
        let mut env = self.env.borrow_mut();
        env.state.av_info = av_info;
        env.host_mut().av_info_changed(&av_info);
        Ok(())
    }

    fn read_content(&self, path: &Path) -> CoreResult<LoadedContent> {
        let c_path = CString::new(path.to_string_lossy().into_owned()).map_err(|_| CoreError::ContentPath)?;
        let data = if self.info.need_fullpath {
            None
        } else {
            let data = fs::read(path).map_err(|source| CoreError::ContentRead {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Loaded {} bytes of content from {}", data.len(), path.display());
            Some(data)
        };
        Ok(LoadedContent {
            path: c_path,
            data,
        })
    }

    /// Runs the core for one frame.
    pub fn run_frame(&mut self) {
        self.core.run();
    }

    /// Takes the frame the core rendered since the last call, if any.
    pub fn take_frame(&mut self) -> Option<VideoFrame> {
        self.env.borrow_mut().take_frame()
    }

    /// Whether the core asked to shut down or to restart with other content.
    pub fn should_shutdown(&self) -> bool {
        self.env.borrow().flags.shutdown
    }

    /// Takes a pending request to restart the frontend with new content.
    pub fn take_exec(&mut self) -> Option<PendingExec> {
        self.env.borrow_mut().flags.exec.take()
    }

    /// Unloads the game and the core and clears everything the core negotiated. The session
    /// continues with the dummy core.
    pub fn unload(&mut self) {
        if self.game_loaded {
            self.core.unload_game();
            self.game_loaded = false;
        }
        if self.initialized {
            self.core.deinit();
            self.initialized = false;
        }
        self.content = None;
        self.env.borrow_mut().reset();
        self.core = Box::new(DummyCore);
        self.info.release();
    }

    /// Reads the metadata of another core without touching this session.
    pub fn probe(&self, path: &Path, want_no_content: bool) -> ProbeResult<SystemInfo> {
        probe(self.loader.as_ref(), path, want_no_content)
    }

    pub fn core(&self) -> &dyn CoreApi {
        self.core.as_ref()
    }

    pub fn system_info(&self) -> &SystemInfo {
        &self.info
    }

    pub fn av_info(&self) -> ffi::retro_system_av_info {
        self.env.borrow().state.av_info
    }

    pub fn is_game_loaded(&self) -> bool {
        self.game_loaded
    }

    /// The path of the bound core, `None` while the dummy core runs.
    pub fn core_path(&self) -> Option<PathBuf> {
        self.core.path().map(Path::to_path_buf)
    }

    /// # Panics
    /// If called while the core is calling back into the environment.
    pub fn environment(&self) -> Ref<'_, Environment> {
        self.env.borrow()
    }

    /// # Panics
    /// As [`environment`](Session::environment).
    pub fn environment_mut(&self) -> RefMut<'_, Environment> {
        self.env.borrow_mut()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.unload();
    }
}

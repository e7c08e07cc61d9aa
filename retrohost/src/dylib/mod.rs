//! Opening shared libraries and resolving their symbols.
//!
//! Everything that turns a raw address into a typed function pointer goes through
//! [`RawSymbol::cast`]; the rest of the crate never handles untyped addresses.
use log::{debug, warn};
use std::{
    ffi::c_void,
    fmt,
    path::{Path, PathBuf},
    ptr::NonNull,
};

mod errors;
pub use self::errors::{DylibError, DylibResult};


/// The address of a resolved symbol. Never null.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawSymbol(NonNull<c_void>);

impl RawSymbol {
    /// Wraps `ptr`, returning `None` if it is null.
    #[inline]
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    #[inline]
    pub fn addr(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// Reinterprets the address as a value of type `F`, normally an `extern "C"` function
    /// pointer.
    ///
    /// # Safety
    /// `F` must be pointer sized and the symbol must really have the type `F` describes.
    #[inline]
    pub unsafe fn cast<F: Copy>(&self) -> F {
        debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*mut c_void>());
        std::mem::transmute_copy(&self.0.as_ptr())
    }
}

impl fmt::Debug for RawSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawSymbol({:p})", self.0)
    }
}

/// An open shared library. Dropping it closes the handle.
pub trait Library {
    /// The path the library was opened from.
    fn path(&self) -> &Path;

    /// Looks up `name`, returning `None` when the library does not export it.
    fn symbol(&self, name: &str) -> Option<RawSymbol>;
}

/// Opens libraries. Implemented by [`NativeLoader`] for the platform loader and by test doubles.
pub trait Loader {
    fn open(&self, path: &Path) -> DylibResult<Box<dyn Library>>;

    /// Looks up `name` among the symbols exported by the running process itself.
    fn lookup_self(&self, name: &str) -> Option<RawSymbol>;
}

/// The platform dynamic loader, backed by `libloading`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLoader;

struct NativeLibrary {
    path: PathBuf,
    inner: libloading::Library,
}

impl Library for NativeLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn symbol(&self, name: &str) -> Option<RawSymbol> {
        lookup(&self.inner, name).or_else(|| {
            debug!("{}: no symbol {}", self.path.display(), name);
            None
        })
    }
}

impl Loader for NativeLoader {
    fn open(&self, path: &Path) -> DylibResult<Box<dyn Library>> {
        // SAFETY: opening a library runs its initialisers. Which libraries get opened is the
        // user's configuration.
        match unsafe { libloading::Library::new(path) } {
            Ok(inner) => Ok(Box::new(NativeLibrary {
                path: path.to_path_buf(),
                inner,
            })),
            Err(e) => {
                warn!("Failed to open library {}: {}", path.display(), e);
                Err(DylibError::Open {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn lookup_self(&self, name: &str) -> Option<RawSymbol> {
        this_process().and_then(|lib| lookup(&lib, name))
    }
}

fn lookup(lib: &libloading::Library, name: &str) -> Option<RawSymbol> {
    // SAFETY: the symbol is only read as an address here; its real type is applied later by
    // `RawSymbol::cast`.
    let symbol = unsafe { lib.get::<*mut c_void>(name.as_bytes()) }.ok()?;
    RawSymbol::new(*symbol)
}

#[cfg(unix)]
fn this_process() -> Option<libloading::Library> {
    Some(libloading::os::unix::Library::this().into())
}

#[cfg(windows)]
fn this_process() -> Option<libloading::Library> {
    libloading::os::windows::Library::this()
        .map(Into::into)
        .map_err(|e| warn!("Failed to open own process image: {}", e))
        .ok()
}

#[cfg(not(any(unix, windows)))]
fn this_process() -> Option<libloading::Library> {
    None
}

/// Returns true if `path` has a shared library extension on any supported platform.
pub fn is_library_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| matches!(ext, "so" | "dylib" | "dll"))
        .unwrap_or(false)
}

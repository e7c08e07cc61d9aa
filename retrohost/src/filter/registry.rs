use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::{builtin, FilterError, FilterImplementation, FilterResult};
use crate::{
    cpu::SimdFeatures,
    dylib::{self, Loader},
    ffi,
};

/// A softfilter factory: `softfilter_get_implementation` or a compiled-in equivalent.
pub type Factory = ffi::softfilter_get_implementation_t;

/// Where filters are discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FilterSource {
    /// The filters compiled into the host.
    #[default]
    Builtin,
    /// Every plugin library in a directory.
    Directory(PathBuf),
}

/// The filters available for selection, keyed by short identifier.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: Vec<FilterImplementation>,
}

impl FilterRegistry {
    /// Discovers the filters `source` provides.
    pub fn discover(source: &FilterSource, loader: &dyn Loader, simd: SimdFeatures) -> FilterResult<Self> {
        match source {
            FilterSource::Builtin => Self::builtin(simd),
            FilterSource::Directory(dir) => Self::discover_dir(loader, dir, simd),
        }
    }

    /// Opens every shared library in `dir` and keeps those exporting a valid softfilter.
    ///
    /// Libraries that cannot be opened, lack the factory export or declare another API
    /// version are skipped and closed.
    ///
    /// # Errors
    /// [`FilterError::Io`] if `dir` cannot be listed, [`FilterError::NoFilters`] if nothing
    /// usable was found.
    pub fn discover_dir(loader: &dyn Loader, dir: &Path, simd: SimdFeatures) -> FilterResult<Self> {
        let entries = fs::read_dir(dir).map_err(|source| FilterError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| dylib::is_library_file(path))
            .collect();
        paths.sort();

        let mut registry = Self::default();
        for path in paths {
            let library = match loader.open(&path) {
                Ok(library) => library,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };
            let Some(symbol) = library.symbol(ffi::SOFTFILTER_GET_IMPLEMENTATION_SYMBOL) else {
                debug!("{} is not a softfilter plugin", path.display());
                continue;
            };
            // SAFETY: the export has this type per the softfilter ABI.
            let factory: Factory = unsafe { symbol.cast() };
            // SAFETY: the table lives in `library`, which the implementation keeps open.
            match unsafe { FilterImplementation::from_raw(factory(simd.softfilter_mask()), Some(library)) } {
                Ok(filter) => {
                    debug!("Found softfilter \"{}\" in {}", filter.short_ident(), path.display());
                    registry.insert(filter);
                }
                Err(reason) => warn!("Softfilter {} rejected: {}", path.display(), reason),
            }
        }
        registry.finish()
    }

    /// The filters compiled into the host.
    ///
    /// # Errors
    /// [`FilterError::BuiltinUnavailable`] if any of them yields no implementation.
    pub fn builtin(simd: SimdFeatures) -> FilterResult<Self> {
        Self::from_factories(builtin::FACTORIES, simd)
    }

    /// Builds a registry from compiled-in factories. Any failure fails the whole registry.
    pub fn from_factories(factories: &[(&'static str, Factory)], simd: SimdFeatures) -> FilterResult<Self> {
        let mut registry = Self::default();
        for &(name, factory) in factories {
            // SAFETY: compiled-in tables are statics.
            let raw = unsafe { factory(simd.softfilter_mask()) };
            if raw.is_null() {
                return Err(FilterError::BuiltinUnavailable(name));
            }
            let filter = unsafe { FilterImplementation::from_raw(raw, None) }.map_err(|reason| {
                FilterError::Rejected {
                    origin: name.to_owned(),
                    reason,
                }
            })?;
            registry.insert(filter);
        }
        registry.finish()
    }

    fn insert(&mut self, filter: FilterImplementation) {
        if self.find(filter.short_ident()).is_some() {
            warn!(
                "Duplicate softfilter \"{}\"{}, keeping the first",
                filter.short_ident(),
                filter.path().map(|p| format!(" in {}", p.display())).unwrap_or_default()
            );
            return;
        }
        self.filters.push(filter);
    }

    fn finish(self) -> FilterResult<Self> {
        if self.filters.is_empty() {
            return Err(FilterError::NoFilters);
        }
        info!("Found {} softfilter(s)", self.filters.len());
        Ok(self)
    }

    pub fn find(&self, short_ident: &str) -> Option<&FilterImplementation> {
        self.filters.iter().find(|f| f.short_ident() == short_ident)
    }

    /// Removes and returns the filter named `short_ident`. The rest stay in the registry.
    pub fn take(&mut self, short_ident: &str) -> Option<FilterImplementation> {
        let index = self.filters.iter().position(|f| f.short_ident() == short_ident)?;
        Some(self.filters.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterImplementation> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

//! Core options declared by a core through `SET_VARIABLES`.
//!
//! Each declaration has the form `"Description; first|second|third"`. The first value is the
//! default; a value stored in the persisted options file takes precedence when it is one of the
//! declared values. Changing a value from the frontend side marks the set as updated until the
//! core reads the flag back through `GET_VARIABLE_UPDATE`.
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::conf::ConfigFile;

mod errors;
pub use self::errors::{OptionsError, OptionsResult};


/// A single option with its allowed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreOption {
    key: String,
    desc: String,
    values: Vec<String>,
    index: usize,
}

impl CoreOption {
    /// Parses a `"Description; a|b|c"` declaration.
    pub fn parse(key: &str, declaration: &str) -> OptionsResult<Self> {
        let (desc, values) = declaration
            .split_once(';')
            .ok_or_else(|| OptionsError::MissingSeparator(key.to_owned()))?;
        let values: Vec<String> = values
            .trim_start()
            .split('|')
            .map(str::to_owned)
            .collect();
        if values.iter().all(String::is_empty) {
            return Err(OptionsError::NoValues(key.to_owned()));
        }
        Ok(Self {
            key: key.to_owned(),
            desc: desc.to_owned(),
            values,
            index: 0,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value(&self) -> &str {
        &self.values[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn select(&mut self, value: &str) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }
}

/// The active option set of a core.
#[derive(Debug)]
pub struct CoreOptions {
    options: Vec<CoreOption>,
    conf: ConfigFile,
    path: Option<PathBuf>,
    updated: bool,
}

impl CoreOptions {
    /// Builds the option set from `(key, declaration)` pairs.
    ///
    /// When `path` is given, values persisted there override the defaults. A missing or
    /// unreadable file starts from an empty one; malformed declarations are skipped.
    pub fn new<'a, I>(path: Option<&Path>, declarations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let conf = path
            .filter(|p| p.exists())
            .and_then(|p| {
                ConfigFile::from_path(p)
                    .map_err(|e| warn!("Ignoring core options file: {}", e))
                    .ok()
            })
            .unwrap_or_default();

        let mut options = Vec::new();
        for (key, declaration) in declarations {
            match CoreOption::parse(key, declaration) {
                Ok(mut option) => {
                    if let Some(saved) = conf.get(key) {
                        if !option.select(saved) {
                            debug!("Persisted value {:?} for {} is not valid", saved, key);
                        }
                    }
                    options.push(option);
                }
                Err(e) => warn!("Skipping core option: {}", e),
            }
        }

        Self {
            options,
            conf,
            path: path.map(Path::to_path_buf),
            updated: false,
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoreOption> {
        self.options.iter()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The current value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(CoreOption::value)
    }

    fn find(&self, key: &str) -> Option<&CoreOption> {
        self.options.iter().find(|o| o.key == key)
    }

    fn option_mut(&mut self, index: usize) -> OptionsResult<&mut CoreOption> {
        let len = self.options.len();
        self.options
            .get_mut(index)
            .ok_or(OptionsError::IndexOutOfBounds { index, len })
    }

    /// Advances option `index` to its next value, wrapping around.
    pub fn next(&mut self, index: usize) -> OptionsResult<()> {
        let option = self.option_mut(index)?;
        option.index = (option.index + 1) % option.values.len();
        self.updated = true;
        Ok(())
    }

    /// Moves option `index` to its previous value, wrapping around.
    pub fn prev(&mut self, index: usize) -> OptionsResult<()> {
        let option = self.option_mut(index)?;
        let count = option.values.len();
        option.index = (option.index + count - 1) % count;
        self.updated = true;
        Ok(())
    }

    /// Resets option `index` to its default.
    pub fn set_default(&mut self, index: usize) -> OptionsResult<()> {
        self.option_mut(index)?.index = 0;
        self.updated = true;
        Ok(())
    }

    /// Sets `key` to `value`, which must be one of its declared values.
    pub fn set_value(&mut self, key: &str, value: &str) -> OptionsResult<()> {
        let option = self
            .options
            .iter_mut()
            .find(|o| o.key == key)
            .ok_or_else(|| OptionsError::UnknownKey(key.to_owned()))?;
        if !option.select(value) {
            return Err(OptionsError::InvalidValue {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        self.updated = true;
        Ok(())
    }

    /// Returns whether a value changed since the last call, clearing the flag.
    pub fn take_updated(&mut self) -> bool {
        std::mem::take(&mut self.updated)
    }

    /// Writes every current value back to the options file. Unrelated keys already in the file
    /// are kept. Without a path this only updates the in-memory copy.
    pub fn flush(&mut self) -> OptionsResult<()> {
        for option in &self.options {
            self.conf.set(&option.key, option.value());
        }
        if let Some(path) = &self.path {
            self.conf.save(path)?;
            debug!("Saved core options to {}", path.display());
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CoreOptions {
    type Item = &'a CoreOption;
    type IntoIter = std::slice::Iter<'a, CoreOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

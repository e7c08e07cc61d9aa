//! A reader and writer for `key = "value"` configuration files.
//!
//! Lines starting with `#` are comments. Values may be quoted; unquoted values end at the first
//! whitespace. Later assignments of a key replace earlier ones. Saving writes every entry back
//! in insertion order with quoted values.
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

mod errors;
pub use self::errors::{ConfError, ConfResult};


#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
}

/// An ordered set of key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    entries: Vec<Entry>,
    path: Option<PathBuf>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> ConfResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut conf: Self = text.parse()?;
        conf.path = Some(path.to_path_buf());
        Ok(conf)
    }

    /// The path the file was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key)?.trim().parse().ok()
    }

    /// Reads a hexadecimal value, with or without a `0x` prefix.
    pub fn get_hex(&self, key: &str) -> Option<u32> {
        parse_hex(self.get(key)?)
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key)?.trim().parse().ok()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    /// Sets `key`, replacing an existing value in place or appending a new entry.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value.to_owned(),
            None => self.entries.push(Entry {
                key: key.to_owned(),
                value: value.to_owned(),
            }),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(index).value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Writes the file to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| ConfError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FromStr for ConfigFile {
    type Err = ConfError;

    fn from_str(text: &str) -> ConfResult<Self> {
        let mut conf = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = parse_line(line).ok_or(ConfError::Parse {
                line: index + 1,
                content: raw.to_owned(),
            })?;
            conf.set(key, value);
        }
        Ok(conf)
    }
}

/// Parses a hexadecimal value, with or without a `0x` prefix.
pub(crate) fn parse_hex(value: &str) -> Option<u32> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).ok()
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let value = match rest.strip_prefix('"') {
        Some(quoted) => &quoted[..quoted.find('"')?],
        None => rest.split(char::is_whitespace).next().unwrap_or(""),
    };
    Some((key, value))
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} = \"{}\"", entry.key, entry.value)?;
        }
        Ok(())
    }
}

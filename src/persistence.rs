use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{DragHandleOptions, PointerHubOptions};

#[derive(Debug)]
pub enum OptionsPersistenceError {
    RonSerialize(ron::Error),
    RonDeserialize(ron::error::SpannedError),
    Io(std::io::Error),
}

impl std::fmt::Display for OptionsPersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for OptionsPersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RonSerialize(err) => Some(err),
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for OptionsPersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ron::Error> for OptionsPersistenceError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

impl From<ron::error::SpannedError> for OptionsPersistenceError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

fn to_ron_string<T: Serialize>(value: &T) -> Result<String, OptionsPersistenceError> {
    Ok(ron::ser::to_string_pretty(
        value,
        ron::ser::PrettyConfig::default(),
    )?)
}

fn from_ron_str<T: DeserializeOwned>(text: &str) -> Result<T, OptionsPersistenceError> {
    Ok(ron::from_str(text)?)
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, OptionsPersistenceError> {
    let text = std::fs::read_to_string(path)?;
    let value = from_ron_str(&text)?;
    log::debug!("loaded options from {}", path.display());
    Ok(value)
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<(), OptionsPersistenceError> {
    std::fs::write(path, to_ron_string(value)?)?;
    log::debug!("saved options to {}", path.display());
    Ok(())
}

impl DragHandleOptions {
    /// Serialize as pretty RON.
    ///
    /// # Errors
    /// If serialization fails.
    pub fn to_ron_string(&self) -> Result<String, OptionsPersistenceError> {
        to_ron_string(self)
    }

    /// Parse from RON. Missing fields keep their default values.
    ///
    /// # Errors
    /// If `text` is not valid RON for these options.
    pub fn from_ron_str(text: &str) -> Result<Self, OptionsPersistenceError> {
        from_ron_str(text)
    }

    /// # Errors
    /// If the file can't be read or parsed.
    pub fn load_ron_file(path: impl AsRef<Path>) -> Result<Self, OptionsPersistenceError> {
        load(path.as_ref())
    }

    /// # Errors
    /// If serialization or the write fails.
    pub fn save_ron_file(&self, path: impl AsRef<Path>) -> Result<(), OptionsPersistenceError> {
        save(self, path.as_ref())
    }
}

impl PointerHubOptions {
    /// Serialize as pretty RON.
    ///
    /// # Errors
    /// If serialization fails.
    pub fn to_ron_string(&self) -> Result<String, OptionsPersistenceError> {
        to_ron_string(self)
    }

    /// Parse from RON. Missing fields keep their default values.
    ///
    /// # Errors
    /// If `text` is not valid RON for these options.
    pub fn from_ron_str(text: &str) -> Result<Self, OptionsPersistenceError> {
        from_ron_str(text)
    }

    /// # Errors
    /// If the file can't be read or parsed.
    pub fn load_ron_file(path: impl AsRef<Path>) -> Result<Self, OptionsPersistenceError> {
        load(path.as_ref())
    }

    /// # Errors
    /// If serialization or the write fails.
    pub fn save_ron_file(&self, path: impl AsRef<Path>) -> Result<(), OptionsPersistenceError> {
        save(self, path.as_ref())
    }
}

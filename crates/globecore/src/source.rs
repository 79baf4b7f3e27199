use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read storage file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write storage file: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to parse storage file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize storage: {0}")]
    Serialize(#[source] toml::ser::Error),
}

/// Where the engine reads and writes the persisted pollution value.
pub trait PollutionSource {
    /// Raw stored text, if any; parsing and clamping happen in the caller
    fn read(&self) -> Option<String>;

    fn write(&mut self, value: f32);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPollutionSource {
    raw: Option<String>,
}

impl MemoryPollutionSource {
    pub fn new(raw: Option<&str>) -> Self {
        Self {
            raw: raw.map(str::to_string),
        }
    }

    pub fn with_value(value: f32) -> Self {
        Self {
            raw: Some(value.to_string()),
        }
    }

    pub fn set_raw(&mut self, raw: Option<&str>) {
        self.raw = raw.map(str::to_string);
    }
}

impl PollutionSource for MemoryPollutionSource {
    fn read(&self) -> Option<String> {
        self.raw.clone()
    }

    fn write(&mut self, value: f32) {
        self.raw = Some(value.to_string());
    }
}

/// Key/value table persisted as TOML. Each write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FilePollutionStore {
    path: PathBuf,
    key: String,
    values: BTreeMap<String, String>,
}

impl FilePollutionStore {
    /// Opens the store; a missing file starts empty.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = read_table(&path)?;

        Ok(Self {
            path,
            key: key.into(),
            values,
        })
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let content = toml::to_string(&self.values).map_err(StorageError::Serialize)?;
        std::fs::write(&self.path, content).map_err(StorageError::Write)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_table(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(StorageError::Parse),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(err) => Err(StorageError::Read(err)),
    }
}

impl PollutionSource for FilePollutionStore {
    /// Goes back to disk on every read so edits by another process show up on the next poll.
    fn read(&self) -> Option<String> {
        match read_table(&self.path) {
            Ok(values) => values.get(&self.key).cloned(),
            Err(err) => {
                log::warn!("Could not read {}: {}", self.path.display(), err);
                self.values.get(&self.key).cloned()
            }
        }
    }

    fn write(&mut self, value: f32) {
        self.values.insert(self.key.clone(), value.to_string());
        if let Err(err) = self.save() {
            log::warn!("Could not persist pollution to {}: {}", self.path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("globecore-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_memory_source_round_trip() {
        let mut source = MemoryPollutionSource::default();
        assert_eq!(source.read(), None);
        source.write(80.0);
        assert_eq!(source.read().as_deref(), Some("80"));
    }

    #[test]
    fn test_file_store_persists_between_opens() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let mut store = FilePollutionStore::open(&path, "earthPollution").unwrap();
        assert_eq!(store.read(), None);
        store.write(42.5);

        let reopened = FilePollutionStore::open(&path, "earthPollution").unwrap();
        assert_eq!(reopened.read().as_deref(), Some("42.5"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_sees_external_edit() {
        let path = temp_path("external");
        std::fs::write(&path, "earthPollution = \"10\"\n").unwrap();

        let store = FilePollutionStore::open(&path, "earthPollution").unwrap();
        assert_eq!(store.read().as_deref(), Some("10"));

        std::fs::write(&path, "earthPollution = \"95\"\n").unwrap();
        assert_eq!(store.read().as_deref(), Some("95"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let path = temp_path("malformed");
        std::fs::write(&path, "earthPollution = = 3").unwrap();

        let result = FilePollutionStore::open(&path, "earthPollution");
        assert!(matches!(result, Err(StorageError::Parse(_))));

        std::fs::remove_file(&path).unwrap();
    }
}

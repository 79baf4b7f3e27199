use bevy::log::{info, warn};
use globecore::{GlobeConfig, MemoryPollutionSource, PollutionSource};

#[cfg(not(target_arch = "wasm32"))]
use globecore::FilePollutionStore;

pub type SharedPollutionSource = Box<dyn PollutionSource + Send + Sync>;

/// Browser `localStorage` when running on the web, a TOML table next to the executable otherwise.
/// Falls back to an in-memory value so the globe still runs without persistence.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_pollution_source(config: &GlobeConfig) -> SharedPollutionSource {
    let key = config.pollution.storage_key.clone();
    match FilePollutionStore::open(&config.storage.path, key) {
        Ok(store) => {
            info!("Pollution value persisted in {}", store.path().display());
            Box::new(store)
        }
        Err(err) => {
            warn!("Pollution storage unavailable, keeping the value in memory: {}", err);
            Box::new(MemoryPollutionSource::default())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn open_pollution_source(config: &GlobeConfig) -> SharedPollutionSource {
    match LocalStoragePollutionSource::new(config.pollution.storage_key.clone()) {
        Ok(source) => {
            info!("Pollution value persisted in localStorage");
            Box::new(source)
        }
        Err(err) => {
            warn!("Pollution storage unavailable, keeping the value in memory: {}", err);
            Box::new(MemoryPollutionSource::default())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_storage::LocalStoragePollutionSource;

#[cfg(target_arch = "wasm32")]
mod web_storage {
    use bevy::log::warn;
    use globecore::PollutionSource;

    #[derive(Debug, thiserror::Error)]
    pub enum WebStorageError {
        #[error("localStorage is not available")]
        Unavailable,

        #[error("localStorage error: {0}")]
        Call(String),
    }

    /// Only the key is kept; the storage handle is looked up per call since JS values are not `Send`.
    #[derive(Debug)]
    pub struct LocalStoragePollutionSource {
        key: String,
    }

    impl LocalStoragePollutionSource {
        pub fn new(key: impl Into<String>) -> Result<Self, WebStorageError> {
            window_local_storage()?;
            Ok(Self { key: key.into() })
        }
    }

    impl PollutionSource for LocalStoragePollutionSource {
        fn read(&self) -> Option<String> {
            let storage = match window_local_storage() {
                Ok(storage) => storage,
                Err(err) => {
                    warn!("{}", err);
                    return None;
                }
            };
            match storage.get_item(&self.key) {
                Ok(value) => value,
                Err(err) => {
                    warn!("localStorage get_item({}) failed: {:?}", self.key, err);
                    None
                }
            }
        }

        fn write(&mut self, value: f32) {
            let result = window_local_storage().and_then(|storage| {
                storage
                    .set_item(&self.key, &value.to_string())
                    .map_err(|e| WebStorageError::Call(format!("{:?}", e)))
            });
            if let Err(err) = result {
                warn!("Failed to persist pollution value: {}", err);
            }
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, WebStorageError> {
        let win = web_sys::window().ok_or(WebStorageError::Unavailable)?;
        win.local_storage()
            .map_err(|e| WebStorageError::Call(format!("{:?}", e)))?
            .ok_or(WebStorageError::Unavailable)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_keeps_value_between_sessions() {
        let dir = std::env::temp_dir().join(format!("pollution-globe-storage-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = GlobeConfig::default();
        config.storage.path = dir.join("pollution.toml").to_string_lossy().into_owned();

        let mut first = open_pollution_source(&config);
        first.write(64.0);

        let second = open_pollution_source(&config);
        assert_eq!(second.read().as_deref(), Some("64"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::mesh::CapacityPolicy;

const MIN_WORKER_THREADS: usize = 1;
const MAX_WORKER_THREADS: usize = 64;

/// Runtime options for the mesher, stored as TOML.
///
/// ```toml
/// worker_threads = 4
/// atlas_manifest = "assets/atlas.toml"
///
/// [capacity]
/// mode = "fixed"
/// vertices = 12288
/// indices = 18432
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MesherSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atlas_manifest: Option<PathBuf>,
    #[serde(default)]
    pub capacity: CapacityPolicy,
}

impl MesherSettings {
    pub fn sanitize(mut self) -> Self {
        let capacity = self.capacity.sanitize();
        if capacity != self.capacity {
            warn!("Clamped mesh capacity from {:?} to {:?}", self.capacity, capacity);
            self.capacity = capacity;
        }
        if let Some(threads) = self.worker_threads {
            let clamped = threads.clamp(MIN_WORKER_THREADS, MAX_WORKER_THREADS);
            if clamped != threads {
                warn!("Clamped worker_threads from {threads} to {clamped}");
            }
            self.worker_threads = Some(clamped);
        }
        self
    }

    /// Configured worker count, or one less than the available cores kept
    /// between 2 and 8.
    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            let available = std::thread::available_parallelism()
                .map(|parallelism| parallelism.get())
                .unwrap_or(4);
            available.saturating_sub(1).clamp(2, 8)
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let parsed = toml::from_str::<Self>(contents).map_err(SettingsError::Parse)?;
        Ok(parsed.sanitize())
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&contents)?;
        info!("Loaded mesher settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let settings = self.clone().sanitize();
        let serialized = toml::to_string_pretty(&settings).map_err(SettingsError::Serialize)?;
        fs::write(path, serialized).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: io::Error },
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "settings file {}: {source}", path.display())
            }
            Self::Parse(source) => write!(f, "failed to deserialize settings: {source}"),
            Self::Serialize(source) => write!(f, "failed to serialize settings: {source}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(source) => Some(source),
            Self::Serialize(source) => Some(source),
        }
    }
}

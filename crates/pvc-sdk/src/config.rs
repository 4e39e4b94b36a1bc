use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// The only repository format this version understands.
pub const REPOSITORY_FORMAT_VERSION: u32 = 0;

/// Contents of `.pvc/config`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(default)]
    pub core: CoreConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub repositoryformatversion: u32,
    pub filemode: bool,
    pub bare: bool,
    /// zlib level for newly written objects.
    pub compression: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            repositoryformatversion: REPOSITORY_FORMAT_VERSION,
            filemode: false,
            bare: false,
            compression: pvc_store::codec::DEFAULT_COMPRESSION,
        }
    }
}

impl RepoConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| SdkError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        toml::from_str(&text).map_err(|err| SdkError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Write the config as TOML, replacing any existing file.
    pub fn save(&self, path: &Path) -> SdkResult<()> {
        let text = toml::to_string(self).map_err(|err| SdkError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Fail unless this build can read the repository.
    pub fn check_version(&self) -> SdkResult<()> {
        match self.core.repositoryformatversion {
            REPOSITORY_FORMAT_VERSION => Ok(()),
            other => Err(SdkError::UnsupportedFormatVersion(other)),
        }
    }
}

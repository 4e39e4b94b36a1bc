//! Filesystem reference store: one small text file per ref.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::RefValue;

/// Refs stored as files under the repository directory (`.pvc/HEAD`,
/// `.pvc/refs/heads/master`, ...).
#[derive(Debug, Clone)]
pub struct FsRefStore {
    root: PathBuf,
}

impl FsRefStore {
    /// `root` is the repository directory, not `root/refs`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the file backing `name`.
    pub fn ref_path(&self, name: &str) -> Result<PathBuf> {
        validate_ref_name(name)?;
        Ok(name.split('/').fold(self.root.clone(), |path, c| path.join(c)))
    }
}

impl RefStore for FsRefStore {
    fn read_value(&self, name: &str) -> Result<Option<RefValue>> {
        let path = self.ref_path(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        RefValue::parse(name, &content).map(Some)
    }

    fn write_value(&self, name: &str, value: &RefValue) -> Result<()> {
        let path = self.ref_path(name)?;
        let dir = path
            .parent()
            .ok_or_else(|| RefError::invalid_name(name, "ref has no parent directory"))?;
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(value.to_file_content().as_bytes())?;
        tmp.persist(&path).map_err(|err| err.error)?;
        debug!(reference = name, value = %value, "wrote ref");
        Ok(())
    }

    fn names_under(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = self.ref_path(prefix)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            // Lock files and other strays are not refs.
            if let Err(err) = validate_ref_name(&name) {
                warn!(path = %entry.path().display(), error = %err, "ignoring file in refs directory");
                continue;
            }
            names.push(name);
        }
        Ok(names)
    }
}

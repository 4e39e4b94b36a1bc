//! The [`RefStore`] trait defining the reference storage interface.

use pvc_types::ObjectId;

use crate::error::Result;
use crate::resolver;
use crate::types::{RefTree, RefValue};

/// Storage backend for named references.
///
/// Names are slash-separated paths relative to the repository directory:
///
/// - `HEAD` for the current branch
/// - `refs/heads/*` for branches
/// - `refs/tags/*` for tags
///
/// Implementations must be thread-safe (`Send + Sync`) and validate every
/// name with [`crate::names::validate_ref_name`] before touching storage.
pub trait RefStore: Send + Sync {
    /// Read the raw value of a single ref without following indirections.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_value(&self, name: &str) -> Result<Option<RefValue>>;

    /// Create or overwrite a ref.
    fn write_value(&self, name: &str, value: &RefValue) -> Result<()>;

    /// All ref names under the directory `prefix` (e.g. `"refs"`), sorted.
    fn names_under(&self, prefix: &str) -> Result<Vec<String>>;

    /// Follow `name` through any symbolic refs to the object it names.
    fn resolve(&self, name: &str) -> Result<ObjectId> {
        resolver::resolve(self, name)
    }

    /// Resolve every ref under `prefix` into a [`RefTree`].
    fn list(&self, prefix: &str) -> Result<RefTree> {
        resolver::list(self, prefix)
    }

    /// Point `name` directly at an object.
    fn write_ref(&self, name: &str, target: ObjectId) -> Result<()> {
        self.write_value(name, &RefValue::Direct(target))
    }

    /// Point `name` at another ref (`ref: <target>`).
    fn write_symbolic(&self, name: &str, target: &str) -> Result<()> {
        crate::names::validate_ref_name(target)?;
        self.write_value(name, &RefValue::Symbolic(target.to_string()))
    }

    /// `(id, full name)` for every ref under `refs/`, as printed by
    /// `show-ref`.
    fn show_ref(&self) -> Result<Vec<(ObjectId, String)>> {
        Ok(self.list("refs")?.flatten("refs"))
    }
}

//! Translating user-supplied names into object ids.
//!
//! A name may be `HEAD`, a full ref path (`refs/heads/master`), a short
//! branch or tag name, or a full or abbreviated (at least four hex digits)
//! object hash. Every interpretation that yields an object becomes a
//! candidate; exactly one distinct candidate must remain.

use pvc_refs::{RefError, RefStore};
use pvc_store::{Commit, ObjectStore, MIN_PREFIX_LEN};
use pvc_types::{ObjectId, ObjectKind, HEX_LEN};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Resolve `name` to a single object id.
pub fn resolve_name<S, R>(objects: &S, refs: &R, name: &str) -> SdkResult<ObjectId>
where
    S: ObjectStore + ?Sized,
    R: RefStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(SdkError::NameResolution {
            name: name.to_string(),
            reason: "empty name".into(),
        });
    }

    if name == "HEAD" {
        return Ok(refs.resolve("HEAD")?);
    }

    let mut candidates = Vec::new();

    if is_hex_prefix(name) {
        candidates.extend(objects.ids_with_prefix(&name.to_ascii_lowercase())?);
    }

    let ref_names = if name.starts_with("refs/") {
        vec![name.to_string()]
    } else {
        vec![format!("refs/tags/{name}"), format!("refs/heads/{name}")]
    };
    for ref_name in ref_names {
        match refs.resolve(&ref_name) {
            Ok(id) => candidates.push(id),
            // Not a ref by this name; other interpretations may still match.
            Err(RefError::ReferenceResolutionFailure { .. } | RefError::InvalidRefName { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }

    candidates.sort();
    candidates.dedup();
    match candidates.len() {
        0 => Err(SdkError::NameResolution {
            name: name.to_string(),
            reason: "no such reference or object".into(),
        }),
        1 => {
            debug!(input = name, id = %candidates[0].short_hex(), "resolved name");
            Ok(candidates[0])
        }
        _ => Err(SdkError::AmbiguousName {
            name: name.to_string(),
            candidates,
        }),
    }
}

/// Follow `id` until it names an object of kind `want`.
///
/// The only indirection is commit -> tree; anything else of the wrong kind
/// is an error.
pub fn peel<S: ObjectStore + ?Sized>(objects: &S, id: ObjectId, want: ObjectKind) -> SdkResult<ObjectId> {
    let mut current = id;
    loop {
        let (kind, payload) = objects.read_raw(&current)?;
        if kind == want {
            return Ok(current);
        }
        match (kind, want) {
            (ObjectKind::Commit, ObjectKind::Tree) => {
                current = Commit::parse(&payload)?.tree()?;
            }
            (actual, expected) => {
                return Err(SdkError::UnexpectedKind {
                    id: current,
                    expected,
                    actual,
                })
            }
        }
    }
}

/// Resolve `name` and, when `kind` is given, peel it to that kind.
pub fn find_object<S, R>(objects: &S, refs: &R, name: &str, kind: Option<ObjectKind>) -> SdkResult<ObjectId>
where
    S: ObjectStore + ?Sized,
    R: RefStore + ?Sized,
{
    let id = resolve_name(objects, refs, name)?;
    match kind {
        Some(kind) => peel(objects, id, kind),
        None => Ok(id),
    }
}

fn is_hex_prefix(name: &str) -> bool {
    (MIN_PREFIX_LEN..=HEX_LEN).contains(&name.len()) && name.bytes().all(|b| b.is_ascii_hexdigit())
}

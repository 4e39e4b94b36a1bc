//! Reference name validation.
//!
//! Ref names are slash-separated paths relative to the repository directory
//! (`HEAD`, `refs/heads/master`). Because they map straight onto files, a
//! valid name:
//! - Must be non-empty and relative (no leading `/`)
//! - Must not contain whitespace, control characters, `~`, `^`, `:`, `?`,
//!   `*`, `[`, `\`
//! - Must not contain `..` or `@{`
//! - Must not end with `/`, `.` or `.lock`
//! - Must have non-empty components that do not start with `.`

use crate::error::{RefError, Result};

/// Characters that are forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a ref name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use pvc_refs::names::validate_ref_name;
///
/// assert!(validate_ref_name("HEAD").is_ok());
/// assert!(validate_ref_name("refs/heads/feature/auth").is_ok());
/// assert!(validate_ref_name("").is_err());
/// assert!(validate_ref_name("refs/../../etc/passwd").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RefError::invalid_name(name, "ref name must not be empty"));
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(RefError::invalid_name(
            name,
            format!("contains control character: {ch:?}"),
        ));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(RefError::invalid_name(
                name,
                format!("contains forbidden character: {ch:?}"),
            ));
        }
    }

    if name.contains("..") {
        return Err(RefError::invalid_name(name, "must not contain '..'"));
    }

    if name.contains("@{") {
        return Err(RefError::invalid_name(name, "must not contain '@{'"));
    }

    if name.starts_with('/') {
        return Err(RefError::invalid_name(name, "must be a relative path"));
    }

    if name.ends_with('/') || name.ends_with('.') {
        return Err(RefError::invalid_name(name, "must not end with '/' or '.'"));
    }

    if name.ends_with(".lock") {
        return Err(RefError::invalid_name(name, "must not end with '.lock'"));
    }

    for component in name.split('/') {
        if component.is_empty() {
            return Err(RefError::invalid_name(
                name,
                "path components must not be empty",
            ));
        }
        if component.starts_with('.') {
            return Err(RefError::invalid_name(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_ref_name("HEAD").is_ok());
        assert!(validate_ref_name("refs/heads/master").is_ok());
        assert!(validate_ref_name("refs/tags/v1.0").is_ok());
        assert!(validate_ref_name("refs/heads/user/alice/fix-123").is_ok());
    }

    #[test]
    fn reject_empty_name() {
        assert!(validate_ref_name("").is_err());
    }

    #[test]
    fn reject_traversal() {
        assert!(validate_ref_name("refs/../config").is_err());
        assert!(validate_ref_name("..").is_err());
        assert!(validate_ref_name("refs/heads/a..b").is_err());
    }

    #[test]
    fn reject_absolute_path() {
        assert!(validate_ref_name("/etc/passwd").is_err());
    }

    #[test]
    fn reject_whitespace_and_control() {
        assert!(validate_ref_name("refs/heads/has space").is_err());
        assert!(validate_ref_name("refs/heads/has\ttab").is_err());
        assert!(validate_ref_name("refs/heads/nl\n").is_err());
        assert!(validate_ref_name("refs/heads/nul\0").is_err());
    }

    #[test]
    fn reject_forbidden_chars() {
        for bad in ["a~b", "a^b", "a:b", "a?b", "a*b", "a[b", "a\\b"] {
            let name = format!("refs/heads/{bad}");
            assert!(validate_ref_name(&name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn reject_bad_components() {
        assert!(validate_ref_name("refs//heads").is_err());
        assert!(validate_ref_name("refs/heads/").is_err());
        assert!(validate_ref_name("refs/.hidden").is_err());
        assert!(validate_ref_name("refs/heads/main.lock").is_err());
        assert!(validate_ref_name("refs/heads/main.").is_err());
        assert!(validate_ref_name("refs/@{1}").is_err());
    }

    #[test]
    fn error_carries_name_and_reason() {
        match validate_ref_name("refs/a b").unwrap_err() {
            RefError::InvalidRefName { name, reason } => {
                assert_eq!(name, "refs/a b");
                assert!(reason.contains("forbidden"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

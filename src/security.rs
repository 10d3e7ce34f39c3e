//! Security checks applied before any filesystem mutation.
//!
//! Every validator inspects a name, a path or a byte slice and either
//! accepts it or returns a [`SecurityError`].  The installer and
//! uninstaller run them to completion before writing or deleting anything,
//! so a rejection leaves the destination untouched for that chatmate.
use std::path::{Component, Path, PathBuf};

use crate::artifact::CHATMATE_SUFFIX;
use crate::error::SecurityError;

/// Default content ceiling: 10 MiB.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

/// Punctuation allowed in filenames in addition to ASCII alphanumerics.
const EXTRA_NAME_CHARS: &[char] = &[' ', '-', '_', '.', '(', ')', '\''];

/// The fixed set of rules consulted by every mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityPolicy {
    suffix: String,
    allowed_extensions: Vec<String>,
    max_content_bytes: usize,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_BYTES)
    }
}

impl SecurityPolicy {
    /// Policy for `.chatmode.md` files with the given content ceiling.
    #[must_use]
    pub fn new(max_content_bytes: usize) -> Self {
        Self {
            suffix: CHATMATE_SUFFIX.to_string(),
            allowed_extensions: vec![CHATMATE_SUFFIX.to_string()],
            max_content_bytes,
        }
    }

    /// Suffix stripped from filenames to obtain display names.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Extensions accepted by [`validate_extension`].
    #[must_use]
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Maximum content length in bytes.
    #[must_use]
    pub const fn max_content_bytes(&self) -> usize {
        self.max_content_bytes
    }

    /// Destination filename for a display name.
    #[must_use]
    pub fn file_name_for(&self, name: &str) -> String {
        format!("{name}{}", self.suffix)
    }

    /// Run the name, extension and path checks for `filename` under `root`
    /// and return the resolved destination path.
    ///
    /// # Errors
    ///
    /// Returns the first [`SecurityError`] raised by the individual checks.
    pub fn validate_target(&self, root: &Path, filename: &str) -> Result<PathBuf, SecurityError> {
        validate_name(filename)?;
        validate_extension(filename, &self.allowed_extensions)?;
        validate_destination_path(root, filename)
    }

    /// Path and extension checks for a `filename` read back from the
    /// destination listing.
    ///
    /// The character allow-list is skipped: it guards names the tool creates,
    /// and a file the user wrote by hand may use any characters.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::BadExtension`] or [`SecurityError::PathEscape`].
    pub fn validate_listed(&self, root: &Path, filename: &str) -> Result<PathBuf, SecurityError> {
        validate_extension(filename, &self.allowed_extensions)?;
        validate_destination_path(root, filename)
    }

    /// Check fetched content before it is written under `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::SizeExceeded`] or [`SecurityError::BadExtension`].
    pub fn validate_payload(&self, filename: &str, content: &[u8]) -> Result<(), SecurityError> {
        validate_content(content, self.max_content_bytes)?;
        validate_extension(filename, &self.allowed_extensions)
    }
}

/// Reject empty filenames, reserved names, and characters outside the
/// allow-list (path separators and control characters included).
///
/// # Errors
///
/// Returns [`SecurityError::InvalidName`] describing the first problem found.
pub fn validate_name(filename: &str) -> Result<(), SecurityError> {
    let reject = |reason: &str| {
        Err(SecurityError::InvalidName {
            name: filename.to_string(),
            reason: reason.to_string(),
        })
    };

    if filename.is_empty() {
        return reject("name is empty");
    }
    if filename.starts_with('.') {
        return reject("base name is empty");
    }
    if filename.trim() != filename {
        return reject("leading or trailing whitespace");
    }
    for c in filename.chars() {
        if c == '/' || c == '\\' {
            return reject("contains a path separator");
        }
        if c.is_control() {
            return reject("contains a control character");
        }
        if !c.is_ascii_alphanumeric() && !EXTRA_NAME_CHARS.contains(&c) {
            return reject(&format!("contains disallowed character '{c}'"));
        }
    }
    Ok(())
}

/// Resolve `root/filename` and require it to be a strict descendant of
/// `root` after `.` and `..` segments are resolved.
///
/// `filename` must also be a single plain path component: any `..`, `.`,
/// root or drive-prefix component is an escape attempt even when it would
/// resolve back inside the root.  An existing root is canonicalised so a
/// symlinked destination compares correctly.
///
/// # Errors
///
/// Returns [`SecurityError::PathEscape`] when the resolved path leaves the root.
pub fn validate_destination_path(root: &Path, filename: &str) -> Result<PathBuf, SecurityError> {
    let escape = || SecurityError::PathEscape {
        path: filename.to_string(),
        root: root.to_path_buf(),
    };

    let mut components = Path::new(filename).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal {
        return Err(escape());
    }

    let root = resolve_root(root);
    let resolved = normalize_lexically(&root.join(filename));
    if resolved != root && resolved.starts_with(&root) {
        Ok(resolved)
    } else {
        Err(escape())
    }
}

/// Require that nothing at `target` redirects a write elsewhere.
///
/// [`validate_destination_path`] only inspects the path text.  A symlink
/// already sitting at `target` (dangling or not) would make the write land
/// wherever the link points, so it is treated as an escape.
///
/// # Errors
///
/// Returns [`SecurityError::PathEscape`] when `target` is a symlink.
pub fn validate_no_symlink(root: &Path, target: &Path) -> Result<(), SecurityError> {
    match target.symlink_metadata() {
        Ok(meta) if meta.file_type().is_symlink() => Err(SecurityError::PathEscape {
            path: target.display().to_string(),
            root: root.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

/// Reject content longer than `max_size` bytes.
///
/// # Errors
///
/// Returns [`SecurityError::SizeExceeded`].
pub const fn validate_content(content: &[u8], max_size: usize) -> Result<(), SecurityError> {
    if content.len() > max_size {
        return Err(SecurityError::SizeExceeded {
            size: content.len(),
            max: max_size,
        });
    }
    Ok(())
}

/// Reject filenames that do not end with one of `allowed`.
///
/// # Errors
///
/// Returns [`SecurityError::BadExtension`].
pub fn validate_extension(filename: &str, allowed: &[String]) -> Result<(), SecurityError> {
    if allowed.iter().any(|ext| filename.ends_with(ext.as_str())) {
        return Ok(());
    }
    Err(SecurityError::BadExtension {
        name: filename.to_string(),
        allowed: allowed.join(", "),
    })
}

/// Absolute, normalised form of the destination root.
fn resolve_root(root: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(root) {
        return canonical;
    }
    let absolute = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    normalize_lexically(&absolute)
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` at the root stays at the root, matching how the OS resolves it.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

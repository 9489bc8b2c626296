//! Lexical path normalization.
//!
//! This module provides the purely lexical half of path handling:
//! - Expanding tilde (~) to the home directory
//! - Collapsing `.`, `..`, and duplicate separators without touching the
//!   filesystem
//! - Anchoring relative paths under a given directory
//!
//! Nothing here dereferences symlinks; see
//! [`canonicalize`](crate::path::canonicalize) for the symlink-aware half.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand tilde (~) to the home directory.
///
/// This function handles `~` and `~/path` but does not support `~user`
/// syntax. Paths that do not start with a tilde are returned unchanged.
///
/// # Errors
///
/// Returns an error if:
/// - The path contains invalid UTF-8 while starting with `~`
/// - The home directory cannot be determined
/// - The path uses `~user` syntax (not supported)
///
/// # Examples
///
/// ```
/// use reroot::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// // Expands ~/path to home/path
/// let expanded = expand_tilde(Path::new("~/project")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("project"));
///
/// // Leaves other paths unchanged
/// let expanded = expand_tilde(Path::new("/absolute")).unwrap();
/// assert_eq!(expanded, Path::new("/absolute"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let Some(path_str) = path.to_str() else {
        // non-UTF-8 paths are taken literally
        return Ok(path.to_path_buf());
    };

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::BadRoot {
        root: path.to_path_buf(),
        reason: "cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        Ok(home.join(rest))
    } else {
        Err(Error::BadRoot {
            root: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Collapse `.`, `..`, and duplicate separators lexically.
///
/// `..` pops the previously pushed component; at the root of an absolute
/// path it is dropped (`/..` is `/`, matching chroot semantics where the
/// root is its own parent), while a relative path keeps leading `..`
/// components. Symlinks are not resolved.
///
/// # Examples
///
/// ```
/// use reroot::path::normalize::clean;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(clean(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
/// assert_eq!(clean(Path::new("/a/../..")), PathBuf::from("/"));
/// assert_eq!(clean(Path::new("a/../../b")), PathBuf::from("../b"));
/// ```
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    let mut has_root = false;
    // components already popped below the start of a relative path
    let mut escapes = 0usize;

    for component in path.components() {
        match component {
            Component::RootDir => {
                result.push(component);
                has_root = true;
            }
            Component::Prefix(prefix) => {
                result.push(prefix.as_os_str());
                has_root = true;
            }
            Component::Normal(c) => {
                result.push(c);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let poppable =
                    matches!(result.components().next_back(), Some(Component::Normal(_)));
                if poppable {
                    result.pop();
                } else if !has_root {
                    escapes += 1;
                }
            }
        }
    }

    if escapes > 0 {
        let mut escaped = PathBuf::new();
        for _ in 0..escapes {
            escaped.push("..");
        }
        escaped.push(result);
        result = escaped;
    }

    if result.as_os_str().is_empty() {
        if has_root {
            result.push(Component::RootDir);
        } else {
            result.push(Component::CurDir);
        }
    }

    result
}

/// Anchor a path under `cwd` and clean it.
///
/// Absolute paths are cleaned as-is; relative paths are joined onto `cwd`
/// first. `cwd` is expected to be absolute.
///
/// # Examples
///
/// ```
/// use reroot::path::normalize::make_absolute;
/// use std::path::{Path, PathBuf};
///
/// let abs = make_absolute(Path::new("../b"), Path::new("/home/user/a"));
/// assert_eq!(abs, PathBuf::from("/home/user/b"));
///
/// let abs = make_absolute(Path::new("/x/./y"), Path::new("/home/user"));
/// assert_eq!(abs, PathBuf::from("/x/y"));
/// ```
#[must_use]
pub fn make_absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&cwd.join(path))
    }
}

/// Check whether a path is already in lexically clean form.
///
/// A clean path has no `.` or `..` components, no duplicate separators, and
/// no trailing separator. Used to validate the `PWD` environment variable
/// before trusting it.
///
/// # Examples
///
/// ```
/// use reroot::path::normalize::is_lexically_clean;
/// use std::path::Path;
///
/// assert!(is_lexically_clean(Path::new("/a/b")));
/// assert!(!is_lexically_clean(Path::new("/a/./b")));
/// assert!(!is_lexically_clean(Path::new("/a/b/")));
/// ```
#[must_use]
pub fn is_lexically_clean(path: &Path) -> bool {
    clean(path).as_os_str() == path.as_os_str()
}

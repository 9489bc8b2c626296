//! Path relationship checking.
//!
//! This module provides functionality to determine the relationship between
//! two paths, such as whether one is an ancestor or descendant of the other,
//! and to compute their shared prefix. Comparisons are lexical and
//! exact-byte at component boundaries; no symlinks are resolved and no case
//! folding is applied.

use std::path::{Path, PathBuf};

/// Relationship between two paths.
///
/// # Examples
///
/// ```
/// use reroot::path::PathRelationship;
/// use std::path::Path;
///
/// let root = Path::new("/scan/root");
/// let cwd = Path::new("/scan/root/path/to");
///
/// assert_eq!(
///     PathRelationship::between(root, cwd),
///     PathRelationship::Ancestor
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The first path is an ancestor of the second.
    Ancestor,

    /// The first path is a descendant of the second.
    Descendant,

    /// The paths are the same.
    Same,

    /// Neither path contains the other.
    Unrelated,
}

impl PathRelationship {
    /// Determine the relationship between two paths.
    ///
    /// Both paths are expected to be lexically clean; trailing separators
    /// and `.`/`..` components are not reconciled here.
    ///
    /// # Examples
    ///
    /// ```
    /// use reroot::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a"), Path::new("/a/b")),
    ///     PathRelationship::Ancestor
    /// );
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a/b"), Path::new("/a")),
    ///     PathRelationship::Descendant
    /// );
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a"), Path::new("/a")),
    ///     PathRelationship::Same
    /// );
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a"), Path::new("/b")),
    ///     PathRelationship::Unrelated
    /// );
    /// ```
    #[must_use]
    pub fn between(path1: &Path, path2: &Path) -> Self {
        if path1 == path2 {
            return Self::Same;
        }

        if path2.starts_with(path1) {
            return Self::Ancestor;
        }

        if path1.starts_with(path2) {
            return Self::Descendant;
        }

        Self::Unrelated
    }

    /// Check if the relationship is hierarchical (not unrelated).
    ///
    /// # Examples
    ///
    /// ```
    /// use reroot::path::PathRelationship;
    ///
    /// assert!(PathRelationship::Ancestor.is_hierarchical());
    /// assert!(!PathRelationship::Unrelated.is_hierarchical());
    /// ```
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        !matches!(self, Self::Unrelated)
    }
}

/// Compute the longest shared component prefix of two paths.
///
/// For two absolute paths the result is at least `/`. Used to decide how
/// much of a user-spelled path is vouched for by the working directory they
/// stand in.
///
/// # Examples
///
/// ```
/// use reroot::path::relationship::common_prefix;
/// use std::path::{Path, PathBuf};
///
/// let prefix = common_prefix(Path::new("/a/b/c"), Path::new("/a/b/d"));
/// assert_eq!(prefix, PathBuf::from("/a/b"));
///
/// let prefix = common_prefix(Path::new("/a"), Path::new("/x/y"));
/// assert_eq!(prefix, PathBuf::from("/"));
/// ```
#[must_use]
pub fn common_prefix(path1: &Path, path2: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    for (c1, c2) in path1.components().zip(path2.components()) {
        if c1 == c2 {
            prefix.push(c1.as_os_str());
        } else {
            break;
        }
    }
    prefix
}

//! Error types for the reroot library.
//!
//! This module provides the error hierarchy for path translation and
//! chroot-context construction, using `thiserror` for ergonomic error
//! handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a reroot error.
///
/// # Examples
///
/// ```
/// use reroot::{Error, Result};
///
/// fn example_operation() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the reroot library.
///
/// Construction of a [`ChrootContext`](crate::ChrootContext) surfaces every
/// variant; the translation operations themselves are purely lexical and can
/// only fail with [`Error::EmptyPath`].
#[derive(Debug, Error)]
pub enum Error {
    /// An empty path was given where a concrete path was required.
    #[error("empty path given")]
    EmptyPath,

    /// The root could not be resolved to an absolute path.
    #[error("invalid root {}: {reason}", root.display())]
    BadRoot {
        /// The root as it was supplied.
        root: PathBuf,
        /// The reason the root could not be resolved.
        reason: String,
    },

    /// A symlink in non-leaf position points at something that does not
    /// exist, so the components behind it cannot be resolved.
    #[error("broken path: non-leaf component {} cannot be resolved", path.display())]
    BrokenPath {
        /// The dangling component.
        path: PathBuf,
    },

    /// The symlink-hop budget was exceeded while resolving a path.
    #[error("symlink loop detected: {}", path.display())]
    SymlinkLoop {
        /// The path at which the budget ran out.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error indicates a symlink loop.
    ///
    /// # Examples
    ///
    /// ```
    /// use reroot::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::SymlinkLoop { path: PathBuf::from("/spin") };
    /// assert!(err.is_symlink_loop());
    /// ```
    #[must_use]
    pub fn is_symlink_loop(&self) -> bool {
        matches!(self, Self::SymlinkLoop { .. })
    }

    /// Check if error indicates a dangling non-leaf component.
    ///
    /// # Examples
    ///
    /// ```
    /// use reroot::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::BrokenPath { path: PathBuf::from("/gone") };
    /// assert!(err.is_broken_path());
    /// ```
    #[must_use]
    pub fn is_broken_path(&self) -> bool {
        matches!(self, Self::BrokenPath { .. })
    }
}

//! Chroot-relative path translation.
//!
//! A [`ChrootContext`] anchors a virtual filesystem view at a logical root
//! directory: callers name paths as if that root were `/`, and the context
//! translates between that view and real filesystem paths. The filesystem
//! is consulted once, at construction, to disambiguate the root's own
//! symlink layers; every translation afterwards is pure string work.
//!
//! # Root spelling
//!
//! The context goes out of its way to answer in the spelling the user can
//! see. A root reached through a symlink alias keeps the alias: standing in
//! `/scans/alias` (a link to `/scans/real`) and building a context over
//! `./` yields native paths under `/scans/alias`, not `/scans/real`. Only
//! the *parents* of the root are canonicalized, so that equivalent roots
//! compare equal; the final component is never dereferenced unless a base
//! is in play.
//!
//! # Base
//!
//! Reflective roots like `/proc/<pid>/root` introduce a second prefix that
//! is part of the native filesystem but not of the chroot view. When a base
//! is set, reported chroot paths are expressed relative to the base rather
//! than the root, and symlinks inside the root whose absolute targets only
//! make sense inside the base are resolved against it.

use std::path::{Path, PathBuf};

use crate::cwd;
use crate::error::{Error, Result};
use crate::logging::Trace;
use crate::path::canonicalize;
use crate::path::normalize;
use crate::path::relationship::PathRelationship;

/// Translates paths between a chroot-style view and the native filesystem.
///
/// Immutable once constructed; freely shareable across threads.
///
/// # Examples
///
/// ```no_run
/// use reroot::ChrootContext;
/// use std::path::Path;
///
/// let context = ChrootContext::from_cwd(Path::new("./fixtures"), None)?;
///
/// // chroot view -> native filesystem
/// let native = context.to_native_path(Path::new("/path/to/file.txt"))?;
///
/// // native filesystem -> chroot view, for reporting
/// let reported = context.to_chroot_path(&native);
/// assert_eq!(reported, Path::new("path/to/file.txt"));
/// # Ok::<(), reroot::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChrootContext {
    /// Absolute, lexically clean logical root; parents canonicalized, the
    /// final component preserved unless a base forced full resolution.
    root: PathBuf,
    /// Native prefix under which the root lives, when the chroot view
    /// should report paths relative to it.
    base: Option<PathBuf>,
    /// Capture-time working directory expressed relative to the root;
    /// empty when the cwd was the root or outside it.
    cwd_relative_to_root: PathBuf,
}

impl ChrootContext {
    /// Build a context, capturing the current process working directory.
    ///
    /// The logical working directory (symlink aliases preserved, see
    /// [`cwd::logical_cwd`]) is captured once; later `chdir` calls do not
    /// affect the context.
    ///
    /// # Errors
    ///
    /// Everything [`ChrootContext::new`] returns, plus [`Error::Io`] when
    /// the working directory cannot be read.
    pub fn from_cwd(root: &Path, base: Option<&Path>) -> Result<Self> {
        let current = cwd::logical_cwd()?;
        Self::new(root, base, &current)
    }

    /// Build a context against an explicit working directory.
    ///
    /// `root` may be empty (meaning `cwd`), relative (resolved against
    /// `cwd`), or absolute, and may name or traverse symlinks. `base`, when
    /// given, is the native prefix under which the root lives. `cwd` must
    /// be absolute and should be the *logical* working directory if
    /// symlink-preserving output is wanted.
    ///
    /// # Errors
    ///
    /// - [`Error::BadRoot`] when the root cannot be resolved to an
    ///   absolute path (unknown home directory, relative `cwd`, ...)
    /// - [`Error::BrokenPath`] / [`Error::SymlinkLoop`] from symlink
    ///   resolution of the root or base
    /// - [`Error::Io`] for other syscall failures
    pub fn new(root: &Path, base: Option<&Path>, cwd: &Path) -> Result<Self> {
        let trace = Trace::from_env();

        if !cwd.is_absolute() {
            return Err(Error::BadRoot {
                root: root.to_path_buf(),
                reason: format!("working directory {} is not absolute", cwd.display()),
            });
        }
        let cwd = normalize::clean(cwd);

        let base = match base {
            None => None,
            Some(b) if b.as_os_str().is_empty() => None,
            Some(b) => Some(normalize_base(b, &cwd)?),
        };

        let given = normalize::expand_tilde(root)?;
        let root_lex = if given.as_os_str().is_empty() {
            cwd.clone()
        } else {
            normalize::make_absolute(&given, &cwd)
        };

        // A root spelled relative to the cwd inherits the cwd's
        // symlink-preserving prefix; an absolute spelling gets its parents
        // canonicalized outright. With a base, the root's own symlink
        // layers are collapsed so equivalent roots translate identically.
        let spelled_from_cwd = !given.is_absolute();
        let root = match &base {
            Some(base) => canonicalize::canonicalize_under_base(&root_lex, base)?,
            None if spelled_from_cwd => {
                canonicalize::canonicalize_parents(&root_lex, Some(cwd.as_path()))?
            }
            None => canonicalize::canonicalize_parents(&root_lex, None)?,
        };

        if !root.is_absolute() {
            return Err(Error::BadRoot {
                root: root_lex,
                reason: "could not be resolved to an absolute path".to_string(),
            });
        }

        let cwd_relative_to_root = match PathRelationship::between(&root, &cwd) {
            PathRelationship::Ancestor => cwd
                .strip_prefix(&root)
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            PathRelationship::Same
            | PathRelationship::Descendant
            | PathRelationship::Unrelated => PathBuf::new(),
        };

        trace.decision(&format!(
            "root {} (spelled {}), base {}, cwd at {}",
            root.display(),
            root_lex.display(),
            base.as_deref().unwrap_or(Path::new("<none>")).display(),
            cwd_relative_to_root.display(),
        ));

        Ok(Self {
            root,
            base,
            cwd_relative_to_root,
        })
    }

    /// The logical root of the chroot view.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The native prefix under which the root lives, if any.
    #[must_use]
    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// The capture-time working directory, relative to the root.
    ///
    /// Empty when the working directory was the root itself or outside it.
    #[must_use]
    pub fn cwd_relative_to_root(&self) -> &Path {
        &self.cwd_relative_to_root
    }

    /// Convert a chroot-view path into a native path.
    ///
    /// An absolute input is anchored at the root; a relative input is
    /// anchored at the capture-time working directory's position inside the
    /// root. The result is absolute and lexically clean; symlinks along it
    /// are deliberately *not* dereferenced, so a path naming a symlink
    /// keeps naming it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPath`] when the input is empty; nothing else.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reroot::ChrootContext;
    /// use std::path::Path;
    ///
    /// let context = ChrootContext::from_cwd(Path::new("/scans/image"), None)?;
    /// let native = context.to_native_path(Path::new("/etc/passwd"))?;
    /// assert_eq!(native, Path::new("/scans/image/etc/passwd"));
    /// # Ok::<(), reroot::Error>(())
    /// ```
    pub fn to_native_path(&self, chroot_path: &Path) -> Result<PathBuf> {
        if chroot_path.as_os_str().is_empty() {
            return Err(Error::EmptyPath);
        }

        let joined = if chroot_path.is_absolute() {
            let inside = chroot_path.strip_prefix("/").unwrap_or(chroot_path);
            self.root.join(inside)
        } else {
            self.anchor().join(chroot_path)
        };
        let mut native = normalize::clean(&joined);

        if let Some(base) = &self.base {
            if !native.starts_with(base) {
                let inside = native.strip_prefix("/").unwrap_or(&native).to_path_buf();
                native = normalize::clean(&base.join(inside));
            }
        }

        Ok(native)
    }

    /// Convert a native path into its chroot-view spelling.
    ///
    /// Without a base, paths under the root are reported relative to it
    /// (the root itself becomes `/`), and paths escaping the root are
    /// returned unchanged; a symlink pointing outside the root is still
    /// *reported* by its name inside the root. With a base, paths under the
    /// base are reported as absolute chroot paths (`/` + remainder), which
    /// lets the view describe locations between the base and the root.
    ///
    /// A relative input is first anchored the same way
    /// [`to_native_path`](Self::to_native_path) anchors relative requests.
    /// An empty input stays empty.
    #[must_use]
    pub fn to_chroot_path(&self, native: &Path) -> PathBuf {
        if native.as_os_str().is_empty() {
            return PathBuf::new();
        }

        let native = if native.is_absolute() {
            normalize::clean(native)
        } else {
            normalize::clean(&self.anchor().join(native))
        };

        if let Some(base) = &self.base {
            return match native.strip_prefix(base) {
                Ok(remainder) if remainder.as_os_str().is_empty() => PathBuf::from("/"),
                Ok(remainder) => Path::new("/").join(remainder),
                Err(_) => native,
            };
        }

        match native.strip_prefix(&self.root) {
            Ok(remainder) if remainder.as_os_str().is_empty() => PathBuf::from("/"),
            Ok(remainder) => remainder.to_path_buf(),
            Err(_) => native,
        }
    }

    /// Adjust a glob pattern so it matches under the native layout.
    ///
    /// This is prefix adjustment, not a full translation: a pattern
    /// beginning with a glob metacharacter (`*`, `?`, `[`) is returned
    /// unchanged, since no anchor can be chosen for it. Metacharacters in
    /// later positions are preserved literally, and metacharacters
    /// appearing literally in the root itself are *not* escaped, so a root
    /// directory named `*` will over-match.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` mirrors
    /// [`to_native_path`](Self::to_native_path), whose anchoring rules
    /// non-glob inputs follow.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reroot::ChrootContext;
    /// use std::path::Path;
    ///
    /// let context = ChrootContext::from_cwd(Path::new("/scans/image"), None)?;
    /// assert_eq!(context.to_native_glob("/etc/*.conf")?, "/scans/image/etc/*.conf");
    /// assert_eq!(context.to_native_glob("**/*.log")?, "**/*.log");
    /// # Ok::<(), reroot::Error>(())
    /// ```
    pub fn to_native_glob(&self, pattern: &str) -> Result<String> {
        if pattern.is_empty() {
            return Ok(String::new());
        }
        if pattern.starts_with(['*', '?', '[']) {
            return Ok(pattern.to_owned());
        }

        let anchored = if let Some(inside) = pattern.strip_prefix('/') {
            self.root.join(inside)
        } else {
            self.anchor().join(pattern)
        };

        Ok(anchored.to_string_lossy().into_owned())
    }

    /// Anchor point for relative requests.
    fn anchor(&self) -> PathBuf {
        if self.cwd_relative_to_root.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(&self.cwd_relative_to_root)
        }
    }
}

/// Normalize a base directory: absolutize and canonicalize its parents,
/// keeping the final component literal so reflective prefixes like
/// `/proc/<pid>/root` survive.
fn normalize_base(base: &Path, cwd: &Path) -> Result<PathBuf> {
    let expanded = normalize::expand_tilde(base)?;
    let lex = normalize::make_absolute(&expanded, cwd);
    let trusted = if expanded.is_absolute() {
        None
    } else {
        Some(cwd)
    };
    canonicalize::canonicalize_parents(&lex, trusted)
}

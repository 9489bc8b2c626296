//! Symlink-aware path canonicalization.
//!
//! This module provides the filesystem-touching half of path handling:
//! component-wise symlink resolution with a hop budget, support for leaving
//! a trusted prefix or a literal final component untouched, and base-aware
//! interpretation of absolute symlink targets (for `/proc/<pid>/root` style
//! reflective roots).
//!
//! All functions here operate on absolute, lexically clean inputs.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::Trace;
use crate::path::normalize;
use crate::path::relationship;

/// Maximum number of symlinks followed while resolving a single path.
///
/// Exceeding the budget fails with [`Error::SymlinkLoop`], which also covers
/// genuine link cycles.
pub const MAX_LINK_HOPS: usize = 255;

/// Canonicalize the parent of a path, leaving the final component literal.
///
/// Every symlink among the parent components is resolved; the final
/// component is rejoined verbatim, so a path naming a symlink keeps naming
/// that symlink. Components covered by the optional `trusted` prefix are
/// taken as-is without inspecting the filesystem, which preserves a
/// symlink-containing spelling the caller has already vouched for (such as
/// the logical working directory).
///
/// Non-existent tails are allowed: once a component is missing, the
/// remainder is kept literally.
///
/// # Errors
///
/// Returns an error if:
/// - A symlink in non-leaf position dangles (`BrokenPath`)
/// - The hop budget is exceeded (`SymlinkLoop`)
/// - `lstat` or `readlink` fail for other reasons (`Io`)
///
/// # Examples
///
/// ```no_run
/// use reroot::path::canonicalize::canonicalize_parents;
/// use std::path::Path;
///
/// // /var is a symlink on some systems; the leaf "log" stays literal
/// let canonical = canonicalize_parents(Path::new("/var/log"), None).unwrap();
/// assert!(canonical.ends_with("log"));
/// ```
pub fn canonicalize_parents(path: &Path, trusted: Option<&Path>) -> Result<PathBuf> {
    debug_assert!(path.is_absolute(), "input must be absolute");

    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        // the filesystem root has no parent to resolve
        return Ok(path.to_path_buf());
    };

    let trusted = trusted.map_or_else(
        || PathBuf::from("/"),
        |t| relationship::common_prefix(t, parent),
    );

    let resolved = resolve(parent, &trusted, None, false)?;
    Ok(resolved.join(name))
}

/// Fully canonicalize a path whose symlinks may be expressed relative to a
/// base directory.
///
/// Unlike [`canonicalize_parents`], the final component is resolved too. An
/// absolute symlink target that does not exist on the real filesystem is
/// retried underneath `base`; this is how a link to `/to/the` inside a
/// scanned tree rooted at `base` finds its actual target. A leading `base`
/// prefix of `path` is kept verbatim, so reflective prefixes like
/// `/proc/<pid>/root` are never dereferenced away.
///
/// # Errors
///
/// Same error conditions as [`canonicalize_parents`].
pub fn canonicalize_under_base(path: &Path, base: &Path) -> Result<PathBuf> {
    debug_assert!(path.is_absolute(), "input must be absolute");

    let trusted = if path.starts_with(base) {
        base.to_path_buf()
    } else {
        PathBuf::from("/")
    };

    resolve(path, &trusted, Some(base), true)
}

/// Resolve every component of `path` after the `trusted` prefix.
///
/// `allow_dangling_leaf` controls whether a symlink in final position may
/// point at nothing: parent canonicalization forbids it (there is always a
/// leaf beneath the components being resolved), full resolution keeps the
/// link itself literally.
fn resolve(
    path: &Path,
    trusted: &Path,
    base: Option<&Path>,
    allow_dangling_leaf: bool,
) -> Result<PathBuf> {
    let trace = Trace::from_env();
    let mut resolved = trusted.to_path_buf();
    let mut pending = match path.strip_prefix(trusted) {
        Ok(rest) => queue_components(rest),
        Err(_) => {
            resolved = PathBuf::from("/");
            queue_components(path)
        }
    };

    let mut hops = 0usize;
    while let Some(name) = pending.pop_front() {
        if name == "." {
            continue;
        }
        if name == ".." {
            if matches!(
                resolved.components().next_back(),
                Some(Component::Normal(_))
            ) {
                resolved.pop();
            }
            continue;
        }

        let candidate = resolved.join(&name);
        let meta = match fs::symlink_metadata(&candidate) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // nothing can exist under a missing directory; keep the
                // whole remaining tail literal
                let mut rest = candidate;
                for name in pending {
                    rest.push(name);
                }
                return Ok(rest);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        if !meta.file_type().is_symlink() {
            resolved = candidate;
            continue;
        }

        hops += 1;
        if hops > MAX_LINK_HOPS {
            return Err(Error::SymlinkLoop { path: candidate });
        }

        let target = fs::read_link(&candidate)?;
        let next = if target.is_absolute() {
            match base {
                Some(base) if !exists_lstat(&target)? => {
                    let reanchored = join_under(base, &target);
                    trace.step(&format!(
                        "target {} re-anchored under {}",
                        target.display(),
                        base.display(),
                    ));
                    reanchored
                }
                _ => normalize::clean(&target),
            }
        } else {
            normalize::clean(&resolved.join(&target))
        };
        trace.step(&format!(
            "symlink {} -> {}",
            candidate.display(),
            next.display(),
        ));

        if !exists_lstat(&next)? {
            if pending.is_empty() && allow_dangling_leaf {
                return Ok(candidate);
            }
            return Err(Error::BrokenPath { path: candidate });
        }

        // restart from the target, keeping the unvisited tail queued
        if let Some(base) = base.filter(|b| next.starts_with(b)) {
            resolved = base.to_path_buf();
            splice_front(&mut pending, next.strip_prefix(base).unwrap_or(&next));
        } else {
            resolved = PathBuf::from("/");
            splice_front(&mut pending, &next);
        }
    }

    Ok(resolved)
}

/// Queue the normal components of a path, skipping any root.
fn queue_components(path: &Path) -> VecDeque<OsString> {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir))
        .map(|c| c.as_os_str().to_os_string())
        .collect()
}

/// Push the components of `head` onto the front of the queue, in order.
fn splice_front(pending: &mut VecDeque<OsString>, head: &Path) {
    for component in head
        .components()
        .filter(|c| !matches!(c, Component::RootDir))
        .rev()
    {
        pending.push_front(component.as_os_str().to_os_string());
    }
}

/// Re-anchor an absolute path underneath `base`.
fn join_under(base: &Path, target: &Path) -> PathBuf {
    let rel = target.strip_prefix("/").unwrap_or(target);
    normalize::clean(&base.join(rel))
}

/// `lstat`-based existence check that does not follow a trailing symlink.
fn exists_lstat(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().canonicalize().unwrap();
        (dir, path)
    }

    #[test]
    fn test_parents_of_root() {
        let result = canonicalize_parents(Path::new("/"), None).unwrap();
        assert_eq!(result, PathBuf::from("/"));
    }

    #[test]
    fn test_parents_missing_tail_kept_literal() {
        let (_dir, root) = canonical_tempdir();
        let path = root.join("missing/deeper/leaf");
        let result = canonicalize_parents(&path, None).unwrap();
        assert_eq!(result, path);
    }

    #[cfg(unix)]
    #[test]
    fn test_parents_resolve_symlink_keep_leaf() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("alias")).unwrap();

        let result = canonicalize_parents(&root.join("alias/leaf"), None).unwrap();
        assert_eq!(result, root.join("real/leaf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_parents_leaf_symlink_preserved() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("alias")).unwrap();

        let result = canonicalize_parents(&root.join("alias"), None).unwrap();
        assert_eq!(result, root.join("alias"));
    }

    #[cfg(unix)]
    #[test]
    fn test_parents_trusted_prefix_not_inspected() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("alias")).unwrap();

        let spelled = root.join("alias/leaf");
        let result = canonicalize_parents(&spelled, Some(&root.join("alias"))).unwrap();
        assert_eq!(result, spelled);
    }

    #[cfg(unix)]
    #[test]
    fn test_parents_relative_link_target() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir_all(root.join("a/b")).unwrap();
        symlink("../a/b", root.join("a/up")).unwrap();

        let result = canonicalize_parents(&root.join("a/up/leaf"), None).unwrap();
        assert_eq!(result, root.join("a/b/leaf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_parents_detect_loop() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        symlink(root.join("two"), root.join("one")).unwrap();
        symlink(root.join("one"), root.join("two")).unwrap();

        let result = canonicalize_parents(&root.join("one/leaf"), None);
        assert!(result.unwrap_err().is_symlink_loop());
    }

    #[cfg(unix)]
    #[test]
    fn test_parents_dangling_non_leaf_is_broken() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        symlink(root.join("nowhere"), root.join("dangling")).unwrap();

        let result = canonicalize_parents(&root.join("dangling/leaf"), None);
        assert!(result.unwrap_err().is_broken_path());
    }

    #[cfg(unix)]
    #[test]
    fn test_under_base_resolves_leaf() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("alias")).unwrap();

        let result = canonicalize_under_base(&root.join("alias"), &root).unwrap();
        assert_eq!(result, root.join("real"));
    }

    #[cfg(unix)]
    #[test]
    fn test_under_base_absolute_target_reanchored() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir_all(root.join("to/the")).unwrap();
        // an absolute target that only makes sense inside the base
        symlink("/to/the", root.join("reflect")).unwrap();

        let result = canonicalize_under_base(&root.join("reflect"), &root).unwrap();
        assert_eq!(result, root.join("to/the"));
    }

    #[cfg(unix)]
    #[test]
    fn test_under_base_real_absolute_target_wins() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("elsewhere")).unwrap();
        symlink(root.join("elsewhere"), root.join("jump")).unwrap();

        // the target exists on the real filesystem, so it is not re-anchored
        let result = canonicalize_under_base(&root.join("jump"), &root.join("elsewhere")).unwrap();
        assert_eq!(result, root.join("elsewhere"));
    }

    #[test]
    fn test_under_base_keeps_base_prefix_verbatim() {
        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("inner")).unwrap();

        let result = canonicalize_under_base(&root.join("inner"), &root).unwrap();
        assert_eq!(result, root.join("inner"));
    }
}

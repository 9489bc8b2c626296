//! Logical working directory capture.
//!
//! The kernel's `getcwd` returns a fully symlink-dereferenced path, but
//! shells preserve the path the user actually typed in the `PWD`
//! environment variable. Translation outputs should match the user's mental
//! model, so the resolver captures the *logical* working directory: `PWD`
//! when it verifiably names the same directory as the kernel's answer, the
//! kernel's answer otherwise.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::Trace;
use crate::path::normalize;

/// Capture the logical working directory of the current process.
///
/// Reads the kernel cwd and reconciles it with the `PWD` environment
/// variable: `PWD` wins iff it is non-empty, absolute, lexically clean, and
/// names the same filesystem object (same device and inode) as the kernel
/// cwd. The value is captured once; later `chdir` or environment changes do
/// not affect paths already derived from it.
///
/// # Errors
///
/// Returns [`Error::Io`] when the kernel cwd cannot be read.
///
/// # Examples
///
/// ```no_run
/// use reroot::cwd::logical_cwd;
///
/// let cwd = logical_cwd().unwrap();
/// assert!(cwd.is_absolute());
/// ```
pub fn logical_cwd() -> Result<PathBuf> {
    let kernel = env::current_dir().map_err(Error::Io)?;
    let logical = reconcile_pwd(env::var_os("PWD"), &kernel);
    if logical != kernel {
        Trace::from_env().decision(&format!(
            "cwd: trusting PWD spelling {} over {}",
            logical.display(),
            kernel.display(),
        ));
    }
    Ok(logical)
}

/// Read the working directory as seen through a procfs process root.
///
/// `proc_root` is a reflective root like `/proc/<pid>/root`. The kernel
/// exposes the process working directory as the sibling link
/// `/proc/<pid>/cwd`; its target is read and re-anchored underneath
/// `proc_root`, producing a path that stays inside the reflective mount.
///
/// # Errors
///
/// Returns [`Error::Io`] when the `cwd` link cannot be read.
///
/// # Examples
///
/// ```no_run
/// use reroot::cwd::procfs_cwd;
/// use std::path::Path;
///
/// let proc_root = format!("/proc/{}/root", std::process::id());
/// let cwd = procfs_cwd(Path::new(&proc_root)).unwrap();
/// assert!(cwd.starts_with(&proc_root));
/// ```
pub fn procfs_cwd(proc_root: &Path) -> Result<PathBuf> {
    let parent = proc_root.parent().unwrap_or(proc_root);
    let target = fs::read_link(parent.join("cwd")).map_err(Error::Io)?;
    let rel = target.strip_prefix("/").unwrap_or(&target);
    Ok(normalize::clean(&proc_root.join(rel)))
}

/// Pick between `PWD` and the kernel cwd.
fn reconcile_pwd(pwd: Option<OsString>, kernel: &Path) -> PathBuf {
    let Some(pwd) = pwd else {
        return kernel.to_path_buf();
    };
    if pwd.is_empty() {
        return kernel.to_path_buf();
    }

    let pwd = PathBuf::from(pwd);
    if !pwd.is_absolute() || !normalize::is_lexically_clean(&pwd) {
        return kernel.to_path_buf();
    }

    match same_file(&pwd, kernel) {
        Ok(true) => pwd,
        // an unverifiable PWD is advisory at best
        _ => kernel.to_path_buf(),
    }
}

/// Check whether two paths name the same filesystem object.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let meta_a = fs::metadata(a)?;
    let meta_b = fs::metadata(b)?;
    Ok(meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino())
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # reroot
//!
//! Chroot-relative path resolution: a virtual filesystem view anchored at a
//! logical root directory, in which callers manipulate paths as if that
//! root were `/`.
//!
//! The resolver translates an arbitrary user-supplied path (relative or
//! absolute, possibly reaching through symlinks) into both a native path
//! suitable for system calls and a canonical chroot-relative path suitable
//! for reporting. Symlink identities are preserved in reported paths (a
//! link pointing outside the root is still reported as living inside it),
//! while the root's own symlink layers are canonicalized so that equivalent
//! roots produce equivalent outputs. Reflective roots like
//! `/proc/<pid>/root` are supported through an optional base prefix.
//!
//! This is not a sandbox: symlinks escaping the root are followed, merely
//! *reported* relative to it.
//!
//! ## Core Types
//!
//! - [`ChrootContext`]: the resolver; built once, then purely lexical
//! - [`Error`] and [`Result`]: error handling types
//! - [`PathRelationship`]: lexical containment checks between paths
//! - [`Trace`] and [`TraceLevel`]: opt-in tracing of root resolution,
//!   driven by the `REROOT_TRACE` environment variable
//!
//! ## Examples
//!
//! ```no_run
//! use reroot::ChrootContext;
//! use std::path::Path;
//!
//! // "./image" resolved against the logical working directory
//! let context = ChrootContext::from_cwd(Path::new("./image"), None)?;
//!
//! let native = context.to_native_path(Path::new("/etc/os-release"))?;
//! let reported = context.to_chroot_path(&native);
//! assert_eq!(reported, Path::new("etc/os-release"));
//! # Ok::<(), reroot::Error>(())
//! ```

pub mod context;
pub mod cwd;
pub mod error;
pub mod logging;
pub mod path;

// Re-export key types at crate root for convenience
pub use context::ChrootContext;
pub use error::{Error, Result};
pub use logging::{Trace, TraceLevel};
pub use path::PathRelationship;

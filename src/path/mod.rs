//! Path handling for chroot-relative resolution.
//!
//! This module splits path work into a purely lexical half and a
//! filesystem-touching half:
//!
//! # Normalization
//!
//! [`normalize`] converts paths to clean absolute form by:
//! - Expanding tilde (~) to the home directory
//! - Anchoring relative paths under a given directory
//! - Collapsing `.`, `..`, and duplicate separators
//!
//! Normalization never resolves symlinks; it is safe on paths that do not
//! exist.
//!
//! # Canonicalization
//!
//! [`canonicalize`] resolves symlinks with more control than
//! `std::fs::canonicalize`: it can leave a trusted prefix or the final
//! component untouched, and can interpret absolute symlink targets relative
//! to a base directory. This is what lets a chroot root keep its
//! user-visible spelling while its parents are made unambiguous.
//!
//! # Relationships
//!
//! [`relationship`] answers containment questions between paths
//! (ancestor/descendant/same/unrelated) and computes shared prefixes, all
//! lexically and byte-exact.
//!
//! # Examples
//!
//! ```
//! use reroot::path::PathRelationship;
//! use std::path::Path;
//!
//! let root = Path::new("/scan/root");
//! let inside = Path::new("/scan/root/etc");
//!
//! let rel = PathRelationship::between(root, inside);
//! assert_eq!(rel, PathRelationship::Ancestor);
//! assert!(rel.is_hierarchical());
//! ```

pub mod canonicalize;
pub mod normalize;
pub mod relationship;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types
pub use relationship::PathRelationship;

//! Common test utilities for integration tests.
//!
//! This module provides the fixture tree used by the request/response
//! tests. The layout mirrors a scanned directory with every flavor of
//! symlink the resolver has to cope with:
//!
//! ```text
//! <tmp>/fixtures/
//!   somewhere/
//!     outside.txt
//!     abs-to-path -> <tmp>/fixtures/path            # absolute link to the chroot
//!   root-link -> ./                                 # alias of the fixture root
//!   path/
//!     to/
//!       abs-inside.txt -> <tmp>/fixtures/path/to/the/file.txt
//!       rel-inside.txt -> ./the/file.txt
//!       chroot-abs-symlink-to-dir -> /to/the        # absolute link, chroot-relative
//!       the/
//!         file.txt
//!         abs-outside.txt -> <tmp>/fixtures/somewhere/outside.txt
//!         rel-outside.txt -> ../../../somewhere/outside.txt
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

/// A materialized fixture tree in a temporary directory.
///
/// `parent` is the canonicalized temporary directory (so expectations are
/// not thrown off by a symlinked temp location) and `fixtures` is the tree
/// root underneath it. The directory is removed on drop.
pub struct FixtureTree {
    _dir: tempfile::TempDir,
    /// Canonicalized directory containing `fixtures/`.
    pub parent: PathBuf,
    /// The fixture root, `<parent>/fixtures`.
    pub fixtures: PathBuf,
}

impl FixtureTree {
    /// Build the fixture tree.
    #[cfg(unix)]
    pub fn new() -> io::Result<Self> {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir()?;
        let parent = dir.path().canonicalize()?;
        let fixtures = parent.join("fixtures");

        fs::create_dir_all(fixtures.join("path/to/the"))?;
        fs::create_dir_all(fixtures.join("somewhere"))?;
        fs::write(fixtures.join("path/to/the/file.txt"), "file contents\n")?;
        fs::write(fixtures.join("somewhere/outside.txt"), "outside\n")?;

        symlink(".", fixtures.join("root-link"))?;
        symlink(
            fixtures.join("path/to/the/file.txt"),
            fixtures.join("path/to/abs-inside.txt"),
        )?;
        symlink("./the/file.txt", fixtures.join("path/to/rel-inside.txt"))?;
        symlink(
            fixtures.join("somewhere/outside.txt"),
            fixtures.join("path/to/the/abs-outside.txt"),
        )?;
        symlink(
            "../../../somewhere/outside.txt",
            fixtures.join("path/to/the/rel-outside.txt"),
        )?;
        symlink("/to/the", fixtures.join("path/to/chroot-abs-symlink-to-dir"))?;
        symlink(fixtures.join("path"), fixtures.join("somewhere/abs-to-path"))?;

        Ok(Self {
            _dir: dir,
            parent,
            fixtures,
        })
    }
}

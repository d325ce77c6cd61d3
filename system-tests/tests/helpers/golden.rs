// system-tests/tests/helpers/golden.rs
// ============================================================================
// Module: Scratch Golden Trees
// Description: Copies and edits golden trees inside temporary directories.
// Purpose: Let drift scenarios perturb golden docs without touching the repo.
// Dependencies: system-tests, meshdoc-config, tempfile
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use meshdoc_config::HarnessConfig;
use system_tests::config::golden_root;
use tempfile::TempDir;

/// Scratch copy of a golden root.
pub struct ScratchGolden {
    /// Temporary directory holding `golden/`.
    dir: TempDir,
}

impl ScratchGolden {
    /// Creates an empty scratch golden root.
    pub fn empty() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("golden"))?;
        Ok(Self {
            dir,
        })
    }

    /// Creates a scratch copy of the checked-in golden root.
    pub fn copy_checked_in() -> io::Result<Self> {
        let scratch = Self::empty()?;
        copy_tree(&golden_root(), &scratch.root())?;
        Ok(scratch)
    }

    /// Returns the scratch golden root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("golden")
    }

    /// Returns the path of a document relative to the golden root.
    pub fn doc(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Returns harness settings pointing at the scratch root.
    pub fn harness(&self, refresh: bool) -> HarnessConfig {
        HarnessConfig {
            golden_root: self.root(),
            refresh_golden: refresh,
            ..HarnessConfig::default()
        }
    }

    /// Replaces the first occurrence of `from` with `to` in a document.
    pub fn edit(&self, relative: &str, from: &str, to: &str) -> io::Result<()> {
        let path = self.doc(relative);
        let text = fs::read_to_string(&path)?;
        if !text.contains(from) {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("`{from}` not in {relative}")));
        }
        fs::write(&path, text.replacen(from, to, 1))
    }
}

/// Recursively copies regular files from `from` into `to`.
fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let kind = entry.file_type()?;
        let target = to.join(entry.file_name());
        if kind.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else if kind.is_file() {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

// crates/meshdoc-docs/src/golden.rs
// ============================================================================
// Module: Golden Tree Access
// Description: No-follow capability access to the golden documentation tree.
// Purpose: Read, list, write, and prune golden docs without escaping the root.
// Dependencies: cap-std, cap-primitives
// ============================================================================

//! ## Overview
//! Every directory below the ambient anchor is opened as a capability handle
//! with symlink following disabled. Writes land in a temporary sibling and are
//! renamed into place so readers never observe partial documents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;

use crate::DocsError;

// ============================================================================
// SECTION: Directories
// ============================================================================

/// Opens the golden root as a capability handle.
///
/// The ambient authority is used only for the filesystem anchor; every named
/// component below it is descended without following symlinks.
///
/// # Errors
///
/// Returns [`DocsError::GoldenRoot`] when the path is empty, traverses upward,
/// crosses a symlink, or does not exist and `create_missing` is false.
pub(crate) fn open_root(root: &Path, create_missing: bool) -> Result<Dir, DocsError> {
    if root.as_os_str().is_empty() {
        return Err(DocsError::GoldenRoot(root.to_path_buf()));
    }
    let absolute = absolute_root(root)?;
    let mut anchor = PathBuf::new();
    let mut current: Option<Dir> = None;
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => return Err(DocsError::GoldenRoot(root.to_path_buf())),
            Component::Normal(name) => {
                let parent = match current.take() {
                    Some(dir) => dir,
                    None if anchor.as_os_str().is_empty() => {
                        return Err(DocsError::GoldenRoot(root.to_path_buf()));
                    }
                    None => Dir::open_ambient_dir(&anchor, ambient_authority())
                        .map_err(|err| DocsError::Io(err.to_string()))?,
                };
                let next = descend(&parent, Path::new(name), create_missing)
                    .map_err(|err| map_root_error(&err, root))?;
                current = Some(next);
            }
        }
    }
    current.ok_or_else(|| DocsError::GoldenRoot(root.to_path_buf()))
}

/// Opens a profile directory under the golden root.
///
/// Returns `Ok(None)` when the directory is absent and `create_missing` is
/// false.
pub(crate) fn open_profile_dir(
    root: &Dir,
    name: &str,
    create_missing: bool,
) -> Result<Option<Dir>, DocsError> {
    match descend(root, Path::new(name), create_missing) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(map_path_error(&err, Path::new(name))),
    }
}

/// Makes a relative root absolute against the current directory.
fn absolute_root(root: &Path) -> Result<PathBuf, DocsError> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(root))
        .map_err(|err| DocsError::Io(err.to_string()))
}

/// Read-only open options that refuse symlinks.
fn nofollow_read() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    options
}

/// Steps into directory `child` of `parent`, creating it when allowed.
fn descend(parent: &Dir, child: &Path, create_missing: bool) -> std::io::Result<Dir> {
    let handle = match parent.open_with(child, &nofollow_read()) {
        Ok(handle) => handle,
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(child)?;
            parent.open_with(child, &nofollow_read())?
        }
        Err(err) => return Err(err),
    };
    if !handle.metadata()?.is_dir() {
        return Err(std::io::Error::new(ErrorKind::NotADirectory, "golden path is not a directory"));
    }
    Ok(Dir::from_std_file(handle.into_std()))
}

/// Returns true for errors caused by the shape of the path itself.
fn is_path_fault(err: &std::io::Error) -> bool {
    if matches!(
        err.kind(),
        ErrorKind::NotFound
            | ErrorKind::InvalidInput
            | ErrorKind::PermissionDenied
            | ErrorKind::NotADirectory
            | ErrorKind::Unsupported
    ) {
        return true;
    }
    // ELOOP: refused to follow a symlink.
    #[cfg(unix)]
    if err.raw_os_error() == Some(40) {
        return true;
    }
    false
}

/// Maps root open failures into [`DocsError::GoldenRoot`].
fn map_root_error(err: &std::io::Error, root: &Path) -> DocsError {
    if is_path_fault(err) {
        return DocsError::GoldenRoot(root.to_path_buf());
    }
    DocsError::Io(err.to_string())
}

/// Maps in-tree open failures into [`DocsError::UnsafePath`].
fn map_path_error(err: &std::io::Error, path: &Path) -> DocsError {
    if is_path_fault(err) {
        return DocsError::UnsafePath(path.to_path_buf());
    }
    DocsError::Io(err.to_string())
}

// ============================================================================
// SECTION: Files
// ============================================================================

/// Reads a golden document, returning `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns [`DocsError`] when the entry is a symlink or non-file, or exceeds
/// `limit` bytes.
pub(crate) fn read_doc(
    dir: &Dir,
    file_name: &str,
    display_path: &Path,
    limit: u64,
) -> Result<Option<Vec<u8>>, DocsError> {
    let file = match dir.open_with(file_name, &nofollow_read()) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(map_path_error(&err, display_path)),
    };
    let metadata = file.metadata().map_err(|err| DocsError::Io(err.to_string()))?;
    if !metadata.is_file() {
        return Err(DocsError::UnsafePath(display_path.to_path_buf()));
    }
    if metadata.len() > limit {
        return Err(DocsError::TooLarge {
            path: display_path.to_path_buf(),
            limit,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| DocsError::Io(err.to_string()))?;
    if !u64::try_from(bytes.len()).is_ok_and(|len| len <= limit) {
        return Err(DocsError::TooLarge {
            path: display_path.to_path_buf(),
            limit,
        });
    }
    Ok(Some(bytes))
}

/// Lists regular files directly inside `dir`.
///
/// # Errors
///
/// Returns [`DocsError::UnsafePath`] when an entry is a symlink.
pub(crate) fn list_files(dir: &Dir, prefix: &str) -> Result<BTreeSet<String>, DocsError> {
    let mut files = BTreeSet::new();
    let entries = dir.entries().map_err(|err| DocsError::Io(err.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|err| DocsError::Io(err.to_string()))?;
        let file_name = entry.file_name();
        let relative = Path::new(prefix).join(&file_name);
        let file_type = entry.file_type().map_err(|err| DocsError::Io(err.to_string()))?;
        if file_type.is_symlink() {
            return Err(DocsError::UnsafePath(relative));
        }
        if file_type.is_file() {
            let name = file_name.into_string().map_err(|_| DocsError::UnsafePath(relative))?;
            if !name.starts_with(".tmp-") {
                files.insert(name);
            }
        }
    }
    Ok(files)
}

/// Writes file bytes using a temporary sibling and atomic rename.
///
/// # Errors
///
/// Returns [`DocsError`] when the temporary file cannot be created or renamed.
pub(crate) fn write_doc_atomic(
    dir: &Dir,
    file_name: &str,
    display_path: &Path,
    bytes: &[u8],
) -> Result<(), DocsError> {
    for attempt in 0 .. 64_u32 {
        let temp_name = format!(".tmp-{file_name}.{}.{attempt}", std::process::id());
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        match dir.open_with(&temp_name, &options) {
            Ok(mut temp_file) => {
                let written = temp_file
                    .write_all(bytes)
                    .and_then(|()| temp_file.sync_all())
                    .and_then(|()| dir.rename(&temp_name, dir, file_name));
                if let Err(err) = written {
                    let _ = dir.remove_file(&temp_name);
                    return Err(DocsError::Io(err.to_string()));
                }
                return Ok(());
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(map_path_error(&err, display_path)),
        }
    }
    Err(DocsError::Io(format!("unable to allocate temporary file for {}", display_path.display())))
}

/// Removes a golden document.
pub(crate) fn remove_doc(dir: &Dir, file_name: &str) -> Result<(), DocsError> {
    dir.remove_file(file_name).map_err(|err| DocsError::Io(err.to_string()))
}

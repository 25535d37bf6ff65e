//! Capability-based file helpers for configuration, series, and ledger
//! files.
//!
//! Every path is a UTF-8 [`camino`] path. Directories are opened with
//! ambient authority once, and all further access goes through `cap-std`
//! handles relative to them.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a file for reading.
///
/// # Errors
/// Returns the I/O error raised when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file as UTF-8 text.
///
/// # Errors
/// Returns the I/O error raised while opening or reading the file,
/// including invalid UTF-8.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut text = String::new();
    open_utf8_file(path)?.read_to_string(&mut text)?;
    Ok(text)
}

/// Open the directory holding `path` and return it with the file name.
///
/// # Errors
/// Returns an error when `path` has no file name or its directory cannot be
/// opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Report whether `path` exists and is a regular file.
///
/// A missing file or directory yields `Ok(false)`.
///
/// # Errors
/// Returns other I/O errors, such as permission failures.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create the parent directory of `path` and any missing ancestors.
///
/// Paths without a parent, or whose parent is the root, need nothing.
///
/// # Errors
/// Returns the I/O error raised while opening the anchor directory or
/// creating the missing ones.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (anchor, relative) = split_anchor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&relative)
}

/// Replace the file at `path` with `contents`.
///
/// The bytes go to a hidden sibling first, are synced, and then renamed
/// over `path`, so an interrupted write leaves the previous file intact.
///
/// # Errors
/// Returns the I/O error raised while opening the directory, writing the
/// staging file, or renaming it into place.
pub fn replace_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let (dir, name) = open_dir_and_file(path)?;
    let staging = format!(".{name}.tmp");
    let written = dir.create(&staging).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    written
        .and_then(|()| dir.rename(&staging, &dir, &name))
        .map_err(|err| {
            drop(dir.remove_file(&staging));
            err
        })
}

/// Split `dir` into the directory `cap-std` may open ambiently (the root,
/// a Windows drive prefix, or `.`) and the path below it.
///
/// # Errors
/// Returns an error when a prefix cannot be stripped or is not UTF-8.
pub fn split_anchor(dir: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let std_dir = dir.as_std_path();
    let anchor = match std_dir.components().next() {
        Some(Component::Prefix(prefix)) => {
            let text = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(text).join(std::path::MAIN_SEPARATOR.to_string())
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
        _ => return Ok((Utf8PathBuf::from("."), dir.to_path_buf())),
    };
    let relative = dir
        .strip_prefix(&anchor)
        .map_err(|_| io::Error::other(format!("cannot strip {anchor} from {dir}")))?;
    Ok((anchor, relative.to_path_buf()))
}

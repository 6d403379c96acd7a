// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of plsdata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::StoreError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Replaces `path` with `contents` via temp file + rename, so readers see either the old or the
/// new file and never a truncated one.
pub(crate) fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".plsdata.tmp.{}.{}.{}",
        file_name.to_string_lossy(),
        std::process::id(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    if let Err(source) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{write_atomic, WriteDurability};

    #[test]
    fn replaces_contents_and_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("ADA.json");
        fs::write(&path, "old").expect("seed");

        write_atomic(&path, b"new", WriteDurability::BestEffort).expect("write");
        write_atomic(&path, b"newer", WriteDurability::Durable).expect("write durable");

        assert_eq!(fs::read_to_string(&path).expect("read"), "newer");
        let names = fs::read_dir(tmp.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect::<Vec<_>>();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("nested").join("state.json");
        write_atomic(&path, b"{}", WriteDurability::BestEffort).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn refuses_to_write_through_symlinks() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let target = tmp.path().join("target.json");
        fs::write(&target, "keep").expect("seed");
        let link = tmp.path().join("link.json");
        std::os::unix::fs::symlink(&target, &link).expect("symlink");

        let err = write_atomic(&link, b"clobber", WriteDurability::BestEffort).unwrap_err();
        assert!(matches!(err, super::StoreError::SymlinkRefused { .. }));
        assert_eq!(fs::read_to_string(&target).expect("read"), "keep");
    }
}

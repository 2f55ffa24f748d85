// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local persistence: editor settings and source file ingestion.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod settings;
pub mod source_file;

pub use settings::{
    restore_panel_width, Settings, SettingsError, SettingsStore, MAX_PANEL_WIDTH_RATIO,
    MIN_PANEL_WIDTH, PANEL_WIDTH_KEY,
};
pub use source_file::{
    is_source_file, read_source_file, write_source_file, SourceFileError, SOURCE_EXTENSIONS,
};

static TMP_SERIAL: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync.
    #[default]
    BestEffort,

    /// Also syncs the file and, on unix, its directory.
    Durable,
}

/// `fs::rename` that replaces an existing target on every platform.
fn replace_file(tmp: &Path, target: &Path) -> io::Result<()> {
    let first = fs::rename(tmp, target);
    if cfg!(windows) {
        if let Err(err) = &first {
            if matches!(err.kind(), io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied) {
                let _ = fs::remove_file(target);
                return fs::rename(tmp, target);
            }
        }
    }
    first
}

/// Writes `contents` next to `path` under a temp name, then renames it into place.
///
/// Errors carry the path that failed.
pub(crate) fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), (PathBuf, io::Error)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err((path.to_path_buf(), io::Error::other("path has no file name")));
    };
    fs::create_dir_all(parent).map_err(|source| (parent.to_path_buf(), source))?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let serial = TMP_SERIAL.fetch_add(1, Ordering::Relaxed);
    let tmp_path = parent.join(format!(
        ".{}.seqsync-{}-{nanos}-{serial}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| (tmp_path.clone(), source))?;
    file.write_all(contents).map_err(|source| (tmp_path.clone(), source))?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| (tmp_path.clone(), source))?;
    }
    drop(file);

    if let Err(source) = replace_file(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err((path.to_path_buf(), source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| (parent.to_path_buf(), source))?;
            dir.sync_all().map_err(|source| (parent.to_path_buf(), source))?;
        }
    }

    Ok(())
}

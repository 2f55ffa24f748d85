// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{write_atomic, WriteDurability};

/// File extensions accepted as diagram source, compared case-insensitively.
pub const SOURCE_EXTENSIONS: [&str; 4] = ["mmd", "mermaid", "txt", "md"];

#[derive(Debug)]
pub enum SourceFileError {
    Unsupported { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SourceFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { path } => write!(
                f,
                "unsupported source file {path:?} (expected .{})",
                SOURCE_EXTENSIONS.join(", .")
            ),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for SourceFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Whether a file looks like diagram source, by extension or by a `text/*` media type.
pub fn is_source_file(path: &Path, media_type: Option<&str>) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)));
    by_extension || media_type.is_some_and(|media_type| media_type.starts_with("text/"))
}

/// Reads a diagram source file as UTF-8.
pub fn read_source_file(path: &Path, media_type: Option<&str>) -> Result<String, SourceFileError> {
    if !is_source_file(path, media_type) {
        return Err(SourceFileError::Unsupported { path: path.to_path_buf() });
    }
    let text = fs::read_to_string(path)
        .map_err(|source| SourceFileError::Io { path: path.to_path_buf(), source })?;
    log::info!("loaded {} bytes of source from {path:?}", text.len());
    Ok(text)
}

/// Replaces a text file atomically.
pub fn write_source_file(
    path: &Path,
    text: &str,
    durability: WriteDurability,
) -> Result<(), SourceFileError> {
    write_atomic(path, text.as_bytes(), durability)
        .map_err(|(path, source)| SourceFileError::Io { path, source })?;
    log::info!("wrote {} bytes to {path:?}", text.len());
    Ok(())
}

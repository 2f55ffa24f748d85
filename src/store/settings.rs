// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Key-value editor settings persisted as one JSON object.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{write_atomic, WriteDurability};

pub const PANEL_WIDTH_KEY: &str = "editorPanelWidth";
pub const MIN_PANEL_WIDTH: f64 = 250.0;
pub const MAX_PANEL_WIDTH_RATIO: f64 = 0.8;

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    NotAnObject { path: PathBuf },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::NotAnObject { path } => write!(f, "settings at {path:?} are not a JSON object"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::NotAnObject { .. } => None,
        }
    }
}

/// Clamps a stored panel width into `[MIN_PANEL_WIDTH, MAX_PANEL_WIDTH_RATIO * viewport]`.
///
/// The minimum wins on viewports too narrow for both bounds. Missing or non-positive values
/// restore nothing.
pub fn restore_panel_width(stored: Option<f64>, viewport_width: f64) -> Option<f64> {
    let stored = stored.filter(|width| width.is_finite() && *width > 0.0)?;
    let max = viewport_width * MAX_PANEL_WIDTH_RATIO;
    Some(stored.min(max).max(MIN_PANEL_WIDTH))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Settings {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn panel_width(&self) -> Option<f64> {
        self.get(PANEL_WIDTH_KEY).and_then(Value::as_f64)
    }

    pub fn set_panel_width(&mut self, width: f64) {
        self.set(PANEL_WIDTH_KEY, width);
    }
}

/// JSON settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    durability: WriteDurability,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), durability: WriteDurability::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings; a missing file is an empty set.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => return Err(SettingsError::Io { path: self.path.clone(), source }),
        };
        let value = serde_json::from_str::<Value>(&raw)
            .map_err(|source| SettingsError::Json { path: self.path.clone(), source })?;
        match value {
            Value::Object(values) => Ok(Settings { values }),
            _ => Err(SettingsError::NotAnObject { path: self.path.clone() }),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let mut json = serde_json::to_vec_pretty(&settings.values)
            .map_err(|source| SettingsError::Json { path: self.path.clone(), source })?;
        json.push(b'\n');
        write_atomic(&self.path, &json, self.durability)
            .map_err(|(path, source)| SettingsError::Io { path, source })?;
        log::debug!("saved settings to {:?}", self.path);
        Ok(())
    }

    /// Loads, applies `update`, saves.
    pub fn update(&self, update: impl FnOnce(&mut Settings)) -> Result<Settings, SettingsError> {
        let mut settings = self.load()?;
        update(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}

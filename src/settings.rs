// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::word::Level;

const SETTINGS_KEY: &str = "kotobako-settings";

/// User preferences. The stored JSON keeps the original field names, so an
/// existing settings blob keeps working; fields added later default-fill on
/// load and unknown stored fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Invariant: never empty.
    pub selected_levels: Vec<Level>,
    pub is_shuffle_on: bool,
    pub is_auto_speak_on: bool,
    pub is_furigana_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_levels: vec![Level::N5],
            is_shuffle_on: false,
            is_auto_speak_on: false,
            is_furigana_on: true,
        }
    }
}

impl Settings {
    pub fn is_level_selected(&self, level: Level) -> bool {
        self.selected_levels.contains(&level)
    }
}

/// Owns the current settings and writes every accepted change through to
/// storage before returning.
pub struct SettingsStore {
    db: Database,
    settings: Settings,
}

impl SettingsStore {
    /// Restore settings from storage, merged over the defaults. A missing
    /// or unparseable blob yields the defaults.
    pub fn load(db: Database) -> Self {
        let mut settings = match db.get(SETTINGS_KEY) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Corrupt settings blob, using defaults: {e}");
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Could not read settings blob, using defaults: {e}");
                Settings::default()
            }
        };
        // A stored blob must not be able to violate the invariant.
        if settings.selected_levels.is_empty() {
            settings.selected_levels = vec![Level::N5];
        }
        Self { db, settings }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Select or deselect one level. Deselecting the last remaining level
    /// is rejected (a no-op): at least one level is always selected.
    pub fn toggle_level(&mut self, level: Level) -> Fallible<()> {
        if self.settings.is_level_selected(level) {
            if self.settings.selected_levels.len() == 1 {
                return Ok(());
            }
            self.settings.selected_levels.retain(|l| *l != level);
        } else {
            self.settings.selected_levels.push(level);
            // Keep the stored order stable, easiest level first.
            self.settings
                .selected_levels
                .sort_by_key(|l| Level::ALL.iter().position(|a| a == l));
        }
        self.persist()
    }

    pub fn toggle_shuffle(&mut self) -> Fallible<()> {
        self.settings.is_shuffle_on = !self.settings.is_shuffle_on;
        self.persist()
    }

    pub fn toggle_auto_speak(&mut self) -> Fallible<()> {
        self.settings.is_auto_speak_on = !self.settings.is_auto_speak_on;
        self.persist()
    }

    pub fn toggle_furigana(&mut self) -> Fallible<()> {
        self.settings.is_furigana_on = !self.settings.is_furigana_on;
        self.persist()
    }

    fn persist(&self) -> Fallible<()> {
        let blob = serde_json::to_string(&self.settings)?;
        self.db.put(SETTINGS_KEY, &blob)
    }
}

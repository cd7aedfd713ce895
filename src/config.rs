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

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::source::WordSource;
use crate::types::word::Level;

const CONFIG_FILE: &str = "kotobako.toml";
const DEFAULT_PORT: u16 = 8000;

const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vT2CWn9q2XNeUxnQ3dHtMwCZqzwOe0-FAHq88A7Dqt0E7RM-XQsbks_Hndeu1kPs9D5IWBTAGsNmcgt/pub";

/// The published sheet tab for each level.
const SHEET_GIDS: [(Level, &str); 5] = [
    (Level::N5, "1658326102"),
    (Level::N4, "1753638656"),
    (Level::N3, "881281312"),
    (Level::N2, "2022905187"),
    (Level::N1, "639967534"),
];

/// Resolved configuration: the data directory, the server port, and the
/// vocabulary sources. Values come from `kotobako.toml` in the data
/// directory when it exists, with compiled-in defaults otherwise.
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub sources: Vec<WordSource>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    port: Option<u16>,
    sources: Vec<SourceEntry>,
}

#[derive(Deserialize)]
struct SourceEntry {
    level: String,
    url: String,
}

impl Config {
    pub fn load(data_dir: Option<PathBuf>) -> Fallible<Config> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir)?;
        let config_path = data_dir.join(CONFIG_FILE);
        let file: ConfigFile = if config_path.exists() {
            log::debug!("Reading configuration from {config_path:?}");
            toml::from_str(&std::fs::read_to_string(&config_path)?)?
        } else {
            ConfigFile::default()
        };
        let sources = if file.sources.is_empty() {
            default_sources()
        } else {
            let mut sources = Vec::new();
            for entry in file.sources {
                let level = match Level::parse(&entry.level) {
                    Some(level) => level,
                    // A bad config file is a user error; fail loudly rather
                    // than silently dropping a source.
                    None => return fail(format!("unknown level in {CONFIG_FILE}: {}", entry.level)),
                };
                sources.push(WordSource {
                    level,
                    url: entry.url,
                });
            }
            sources
        };
        Ok(Config {
            data_dir,
            port: file.port.unwrap_or(DEFAULT_PORT),
            sources,
        })
    }

    /// Where `kotobako fetch` caches sheets and `--offline` reads them.
    pub fn sheets_dir(&self) -> PathBuf {
        self.data_dir.join("sheets")
    }

    /// The store database lives alongside the cached sheets.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("kotobako.sqlite3")
    }
}

fn default_data_dir() -> Fallible<PathBuf> {
    match dirs::data_dir() {
        Some(dir) => Ok(dir.join("kotobako")),
        None => fail("could not determine the user data directory."),
    }
}

fn default_sources() -> Vec<WordSource> {
    SHEET_GIDS
        .iter()
        .map(|(level, gid)| WordSource {
            level: *level,
            url: format!("{SHEET_BASE}?gid={gid}&single=true&output=csv"),
        })
        .collect()
}

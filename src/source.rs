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

use std::path::Path;

use walkdir::WalkDir;

use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_sheet;
use crate::types::word::Level;
use crate::types::word::Word;

/// One remote vocabulary sheet and the level its rows belong to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordSource {
    pub level: Level,
    pub url: String,
}

/// Fetch every configured sheet and parse the lot. All-or-nothing: a
/// transport error or non-success status on any one sheet fails the whole
/// load. Callers treat a failed load as "no data available".
pub async fn fetch_all(sources: &[WordSource]) -> Fallible<Vec<Word>> {
    let mut words = Vec::new();
    for source in sources {
        log::debug!("Fetching the {} sheet from {}", source.level, source.url);
        let response = reqwest::get(&source.url).await?;
        if !response.status().is_success() {
            return fail(format!(
                "fetching the {} sheet failed with status {}.",
                source.level,
                response.status()
            ));
        }
        let text = response.text().await?;
        words.extend(parse_sheet(source.level, &text));
    }
    log::debug!("Loaded {} words.", words.len());
    Ok(words)
}

/// Load words from sheets cached on disk by `kotobako fetch`. Cached
/// sheets are named after their level (`N5.csv`); other files are ignored.
/// Returns an empty list when nothing is cached.
pub fn load_cached(dir: &Path) -> Fallible<Vec<Word>> {
    let mut words = Vec::new();
    if !dir.exists() {
        return Ok(words);
    }
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            let level = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(Level::parse);
            match level {
                Some(level) => {
                    let contents = std::fs::read_to_string(path)?;
                    words.extend(parse_sheet(level, &contents));
                }
                None => {
                    log::debug!("Ignoring {path:?}: file name is not a level.");
                }
            }
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_cached_missing_directory() -> Fallible<()> {
        let dir = tempfile::tempdir().unwrap();
        let words = load_cached(&dir.path().join("sheets"))?;
        assert!(words.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_cached_reads_level_named_sheets() -> Fallible<()> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("N5.csv"),
            "word,reading,meaning\n食べる,食[た]べる,to eat\n",
        )?;
        std::fs::write(
            dir.path().join("N4.csv"),
            "word,reading,meaning\n走る,走[はし]る,to run\n",
        )?;
        std::fs::write(dir.path().join("notes.txt"), "not a sheet")?;
        std::fs::write(dir.path().join("N9.csv"), "word\nゴミ\n")?;
        let mut words = load_cached(dir.path())?;
        words.sort_by(|a, b| a.word.cmp(&b.word));
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "走る");
        assert_eq!(words[0].level, Level::N4);
        assert_eq!(words[1].word, "食べる");
        assert_eq!(words[1].level, Level::N5);
        Ok(())
    }
}

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

use std::collections::HashMap;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::difficulty::Difficulty;

const PROGRESS_KEY: &str = "kotobako-progress";

/// Per-word difficulty classifications. Words the user has never classified
/// are `Normal`. Every accepted mutation is persisted before returning, so
/// the in-memory map never diverges from storage.
pub struct DifficultyLedger {
    db: Database,
    map: HashMap<String, Difficulty>,
}

impl DifficultyLedger {
    /// Restore the ledger from storage. A missing or unparseable blob
    /// yields an empty ledger; initialization never fails on bad data.
    pub fn load(db: Database) -> Self {
        let map = match db.get(PROGRESS_KEY) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Corrupt difficulty blob, starting empty: {e}");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                log::warn!("Could not read difficulty blob, starting empty: {e}");
                HashMap::new()
            }
        };
        Self { db, map }
    }

    pub fn get(&self, word: &str) -> Difficulty {
        self.map.get(word).copied().unwrap_or_default()
    }

    /// Classify a word. Rejected (a no-op, not an error) when the word key
    /// is empty or the difficulty is outside {easy, normal, hard}.
    pub fn classify(&mut self, word: &str, difficulty: &str) -> Fallible<()> {
        if word.is_empty() {
            return Ok(());
        }
        let difficulty = match Difficulty::parse(difficulty) {
            Some(difficulty) => difficulty,
            None => return Ok(()),
        };
        self.map.insert(word.to_string(), difficulty);
        self.persist()
    }

    fn persist(&self) -> Fallible<()> {
        let blob = serde_json::to_string(&self.map)?;
        self.db.put(PROGRESS_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotobako.sqlite3");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_unseen_word_is_normal() {
        let (_dir, db) = temp_db();
        let ledger = DifficultyLedger::load(db);
        assert_eq!(ledger.get("食べる"), Difficulty::Normal);
    }

    #[test]
    fn test_classify_and_get() -> Fallible<()> {
        let (_dir, db) = temp_db();
        let mut ledger = DifficultyLedger::load(db);
        ledger.classify("食べる", "hard")?;
        assert_eq!(ledger.get("食べる"), Difficulty::Hard);
        ledger.classify("食べる", "easy")?;
        assert_eq!(ledger.get("食べる"), Difficulty::Easy);
        Ok(())
    }

    #[test]
    fn test_invalid_difficulty_is_rejected() -> Fallible<()> {
        let (_dir, db) = temp_db();
        let mut ledger = DifficultyLedger::load(db);
        ledger.classify("食べる", "hard")?;
        ledger.classify("食べる", "super-hard")?;
        assert_eq!(ledger.get("食べる"), Difficulty::Hard);
        Ok(())
    }

    #[test]
    fn test_empty_word_is_rejected() -> Fallible<()> {
        let (_dir, db) = temp_db();
        let mut ledger = DifficultyLedger::load(db);
        ledger.classify("", "hard")?;
        assert_eq!(db_blob(&ledger.db), None);
        Ok(())
    }

    #[test]
    fn test_classification_survives_reload() -> Fallible<()> {
        let (_dir, db) = temp_db();
        {
            let mut ledger = DifficultyLedger::load(db.clone());
            ledger.classify("走る", "hard")?;
        }
        let ledger = DifficultyLedger::load(db);
        assert_eq!(ledger.get("走る"), Difficulty::Hard);
        Ok(())
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_empty() -> Fallible<()> {
        let (_dir, db) = temp_db();
        db.put(PROGRESS_KEY, "not json")?;
        let ledger = DifficultyLedger::load(db);
        assert_eq!(ledger.get("食べる"), Difficulty::Normal);
        Ok(())
    }

    fn db_blob(db: &Database) -> Option<String> {
        db.get(PROGRESS_KEY).unwrap()
    }
}

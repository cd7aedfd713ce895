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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::ledger::DifficultyLedger;
use crate::settings::Settings;
use crate::types::word::Word;

/// The ordered sequence of words for one study session, with a current
/// position. Ephemeral: rebuilt from the word list, the difficulty ledger,
/// and the settings whenever any of the inputs that shape it change.
///
/// With shuffle on, the sequence is a uniform permutation of the filtered
/// words, each appearing exactly once. With shuffle off, each word is
/// replicated by its difficulty weight before shuffling, so harder words
/// come around more often within the session.
pub struct StudySession {
    /// The filtered words, one copy each.
    words: Vec<Word>,
    /// The session sequence, as indices into `words`. Indices repeat under
    /// weighted replication. Empty when no words match the level filter.
    order: Vec<usize>,
    index: usize,
}

impl StudySession {
    pub fn empty() -> Self {
        Self {
            words: Vec::new(),
            order: Vec::new(),
            index: 0,
        }
    }

    /// Build a fresh session. Difficulty weights are read from the live
    /// ledger here, at build time, so classifications made mid-session
    /// take effect on the next rebuild.
    pub fn build<R: Rng>(
        all_words: &[Word],
        settings: &Settings,
        ledger: &DifficultyLedger,
        rng: &mut R,
    ) -> Self {
        let words: Vec<Word> = all_words
            .iter()
            .filter(|word| settings.is_level_selected(word.level))
            .cloned()
            .collect();
        if words.is_empty() {
            return Self::empty();
        }
        let mut order: Vec<usize> = if settings.is_shuffle_on {
            (0..words.len()).collect()
        } else {
            let mut order = Vec::new();
            for (i, word) in words.iter().enumerate() {
                let weight = ledger.get(&word.word).weight();
                order.extend(std::iter::repeat_n(i, weight));
            }
            order
        };
        order.shuffle(rng);
        log::debug!(
            "Built session: {} words, {} cards, shuffle={}",
            words.len(),
            order.len(),
            settings.is_shuffle_on
        );
        Self {
            words,
            order,
            index: 0,
        }
    }

    /// True when no words matched the level filter (or no data loaded).
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The number of cards in the session sequence.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// The current 0-based position in the sequence.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Word> {
        self.order.get(self.index).map(|&i| &self.words[i])
    }

    /// Step the current position by `step` (+1 or -1), wrapping in both
    /// directions. Returns false (and does nothing) on an empty session.
    /// Callers record a card view for each successful advance.
    pub fn advance(&mut self, step: i64) -> bool {
        if self.order.is_empty() {
            return false;
        }
        let len = self.order.len() as i64;
        self.index = (self.index as i64 + step).rem_euclid(len) as usize;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::db::Database;
    use crate::types::word::Level;

    fn word(word: &str, level: Level) -> Word {
        Word {
            word: word.to_string(),
            reading: String::new(),
            meaning: String::new(),
            level,
        }
    }

    fn settings(levels: &[Level], shuffle: bool) -> Settings {
        Settings {
            selected_levels: levels.to_vec(),
            is_shuffle_on: shuffle,
            ..Settings::default()
        }
    }

    fn empty_ledger() -> (tempfile::TempDir, DifficultyLedger) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotobako.sqlite3");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, DifficultyLedger::load(db))
    }

    fn occurrence_counts(session: &StudySession) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        let mut probe = StudySession {
            words: session.words.clone(),
            order: session.order.clone(),
            index: 0,
        };
        for _ in 0..probe.len() {
            *counts
                .entry(probe.current().unwrap().word.clone())
                .or_insert(0) += 1;
            probe.advance(1);
        }
        counts
    }

    #[test]
    fn test_empty_when_no_words_match_filter() {
        let (_dir, ledger) = empty_ledger();
        let words = vec![word("走る", Level::N4)];
        let mut rng = StdRng::seed_from_u64(0);
        let session = StudySession::build(&words, &settings(&[Level::N5], false), &ledger, &mut rng);
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_advance_is_a_noop_on_empty_session() {
        let mut session = StudySession::empty();
        assert!(!session.advance(1));
        assert!(!session.advance(-1));
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_shuffle_mode_is_a_permutation() {
        let (_dir, ledger) = empty_ledger();
        let words: Vec<Word> = (0..50)
            .map(|i| word(&format!("word-{i}"), Level::N5))
            .collect();
        let mut rng = StdRng::seed_from_u64(1);
        let session = StudySession::build(&words, &settings(&[Level::N5], true), &ledger, &mut rng);
        assert_eq!(session.len(), 50);
        let counts = occurrence_counts(&session);
        assert_eq!(counts.len(), 50);
        assert!(counts.values().all(|&count| count == 1));
    }

    #[test]
    fn test_weighted_mode_replicates_by_difficulty() {
        let (_dir, mut ledger) = empty_ledger();
        ledger.classify("易しい", "easy").unwrap();
        ledger.classify("難しい", "hard").unwrap();
        let words = vec![
            word("易しい", Level::N5),
            word("普通", Level::N5),
            word("難しい", Level::N5),
        ];
        let mut rng = StdRng::seed_from_u64(2);
        let session = StudySession::build(&words, &settings(&[Level::N5], false), &ledger, &mut rng);
        assert_eq!(session.len(), 1 + 2 + 4);
        let counts = occurrence_counts(&session);
        assert_eq!(counts["易しい"], 1);
        assert_eq!(counts["普通"], 2);
        assert_eq!(counts["難しい"], 4);
    }

    #[test]
    fn test_weighted_default_scenario() {
        // W = {食べる N5, 飲む N5, 走る N4}, levels = {N5}, shuffle off,
        // everything at the default difficulty.
        let (_dir, ledger) = empty_ledger();
        let words = vec![
            word("食べる", Level::N5),
            word("飲む", Level::N5),
            word("走る", Level::N4),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let session = StudySession::build(&words, &settings(&[Level::N5], false), &ledger, &mut rng);
        assert_eq!(session.len(), 4);
        let counts = occurrence_counts(&session);
        assert_eq!(counts["食べる"], 2);
        assert_eq!(counts["飲む"], 2);
        assert!(!counts.contains_key("走る"));
    }

    #[test]
    fn test_rebuild_picks_up_reclassification() {
        let (_dir, mut ledger) = empty_ledger();
        let words = vec![word("食べる", Level::N5)];
        let mut rng = StdRng::seed_from_u64(4);
        let session = StudySession::build(&words, &settings(&[Level::N5], false), &ledger, &mut rng);
        assert_eq!(session.len(), 2);
        ledger.classify("食べる", "hard").unwrap();
        let session = StudySession::build(&words, &settings(&[Level::N5], false), &ledger, &mut rng);
        assert_eq!(session.len(), 4);
    }

    #[test]
    fn test_wrap_around_both_directions() {
        let (_dir, ledger) = empty_ledger();
        let words: Vec<Word> = (0..3)
            .map(|i| word(&format!("word-{i}"), Level::N5))
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            StudySession::build(&words, &settings(&[Level::N5], true), &ledger, &mut rng);
        assert_eq!(session.position(), 0);
        assert!(session.advance(-1));
        assert_eq!(session.position(), 2);
        assert!(session.advance(1));
        assert_eq!(session.position(), 0);
        assert!(session.advance(1));
        assert!(session.advance(1));
        assert_eq!(session.position(), 2);
        assert!(session.advance(1));
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_identical_seeds_reproduce_the_ordering() {
        let (_dir, ledger) = empty_ledger();
        let words: Vec<Word> = (0..20)
            .map(|i| word(&format!("word-{i}"), Level::N5))
            .collect();
        let spec = settings(&[Level::N5], true);
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = StudySession::build(&words, &spec, &ledger, &mut rng_a);
        let b = StudySession::build(&words, &spec, &ledger, &mut rng_b);
        assert_eq!(a.order, b.order);
    }

    #[test]
    fn test_multiple_levels_are_merged() {
        let (_dir, ledger) = empty_ledger();
        let words = vec![
            word("食べる", Level::N5),
            word("走る", Level::N4),
            word("政治", Level::N1),
        ];
        let mut rng = StdRng::seed_from_u64(6);
        let session = StudySession::build(
            &words,
            &settings(&[Level::N5, Level::N4], true),
            &ledger,
            &mut rng,
        );
        assert_eq!(session.len(), 2);
        let counts = occurrence_counts(&session);
        assert!(counts.contains_key("食べる"));
        assert!(counts.contains_key("走る"));
        assert!(!counts.contains_key("政治"));
    }
}

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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// A vocabulary entry. The `word` field is the citation form and serves as
/// the entry's identity; entries are immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    /// The citation form, e.g. `食べる`.
    pub word: String,
    /// The annotated phonetic form, e.g. `食[た]べる`. May be empty.
    pub reading: String,
    /// The meaning in the learner's language. May be empty.
    pub meaning: String,
    /// The JLPT level this word belongs to.
    pub level: Level,
}

/// A JLPT vocabulary level, from N5 (easiest) to N1 (hardest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl Level {
    /// All levels, easiest first. This is the display order of the level
    /// selector.
    pub const ALL: [Level; 5] = [Level::N5, Level::N4, Level::N3, Level::N2, Level::N1];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::N5 => "N5",
            Level::N4 => "N4",
            Level::N3 => "N3",
            Level::N2 => "N2",
            Level::N1 => "N1",
        }
    }

    /// Parse a level name, tolerating case and surrounding whitespace.
    /// Returns None for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N5" => Some(Level::N5),
            "N4" => Some(Level::N4),
            "N3" => Some(Level::N3),
            "N2" => Some(Level::N2),
            "N1" => Some(Level::N1),
            _ => None,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

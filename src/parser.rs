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

use csv::ReaderBuilder;
use csv::StringRecord;
use csv::Trim;

use crate::types::word::Level;
use crate::types::word::Word;

/// Parse one vocabulary sheet. The first row is the header; the columns of
/// interest are `word`, `reading`, `meaning`, and (optionally) `level`.
/// Rows without a `level` column get `sheet_level`.
///
/// Parsing never fails: rows with no usable `word` field, or that the CSV
/// reader rejects, are skipped. Quoted fields may contain the delimiter.
pub fn parse_sheet(sheet_level: Level, content: &str) -> Vec<Word> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            log::debug!("Unreadable sheet header: {e}");
            return Vec::new();
        }
    };
    let columns = Columns::from_headers(&headers);

    let mut words = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping malformed row: {e}");
                continue;
            }
        };
        if let Some(word) = columns.extract(sheet_level, &record) {
            words.push(word);
        }
    }
    words
}

/// The column positions of the fields we care about, resolved from the
/// header row. Header names are matched case-insensitively.
struct Columns {
    word: Option<usize>,
    reading: Option<usize>,
    meaning: Option<usize>,
    level: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };
        Self {
            word: find("word"),
            reading: find("reading"),
            meaning: find("meaning"),
            level: find("level"),
        }
    }

    fn extract(&self, sheet_level: Level, record: &StringRecord) -> Option<Word> {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .trim()
                .to_string()
        };
        let word = field(self.word);
        if word.is_empty() {
            return None;
        }
        // A per-row level overrides the sheet's level when parseable.
        let level = self
            .level
            .and_then(|i| record.get(i))
            .and_then(Level::parse)
            .unwrap_or(sheet_level);
        Some(Word {
            word,
            reading: field(self.reading),
            meaning: field(self.meaning),
            level,
        })
    }
}

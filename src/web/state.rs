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

use std::sync::Arc;
use std::sync::Mutex;

use rand::rngs::StdRng;

use crate::journal::UsageJournal;
use crate::ledger::DifficultyLedger;
use crate::session::StudySession;
use crate::settings::SettingsStore;
use crate::types::word::Word;

#[derive(Clone)]
pub struct ServerState {
    pub mutable: Arc<Mutex<MutableState>>,
}

/// Everything the handlers read and mutate. The UI thread model is one
/// request at a time over this lock; the stores inside write through to
/// the database on every accepted mutation.
pub struct MutableState {
    /// The full imported word list. Empty when the load failed.
    pub words: Vec<Word>,
    pub session: StudySession,
    pub settings: SettingsStore,
    pub ledger: DifficultyLedger,
    pub journal: UsageJournal,
    /// Whether the current card shows its back face.
    pub flipped: bool,
    pub rng: StdRng,
}

impl MutableState {
    /// Rebuild the session sequence from the current filter, shuffle flag,
    /// and difficulty weights, and reset to the front face of card 0.
    pub fn rebuild_session(&mut self) {
        self.session = StudySession::build(
            &self.words,
            self.settings.get(),
            &self.ledger,
            &mut self.rng,
        );
        self.flipped = false;
    }
}

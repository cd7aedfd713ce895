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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use crate::types::word::Level;
use crate::web::state::ServerState;

#[derive(Debug, Deserialize)]
enum Action {
    Flip,
    Next,
    Prev,
    Easy,
    Normal,
    Hard,
    Shuffle,
    Furigana,
    Autospeak,
    Level,
    Rename,
}

impl Action {
    fn difficulty(&self) -> Option<&'static str> {
        match self {
            Action::Easy => Some("easy"),
            Action::Normal => Some("normal"),
            Action::Hard => Some("hard"),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<FormData>) -> Redirect {
    let target = match form.action {
        Action::Rename => "/stats",
        _ => "/",
    };
    match action_handler(state, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to(target)
}

fn action_handler(state: ServerState, form: FormData) -> Fallible<()> {
    let mut mutable = state.mutable.lock().unwrap();
    let mutable = &mut *mutable;
    match form.action {
        Action::Flip => {
            if !mutable.session.is_empty() {
                mutable.flipped = !mutable.flipped;
            }
        }
        Action::Next | Action::Prev => {
            let step = match form.action {
                Action::Next => 1,
                _ => -1,
            };
            // Card views are recorded on transitions only, never for the
            // initially displayed card.
            if mutable.session.advance(step) {
                mutable.flipped = false;
                let today = Timestamp::now().local_date();
                mutable.journal.record_view(today)?;
            }
        }
        Action::Easy | Action::Normal | Action::Hard => {
            if let Some(word) = mutable.session.current() {
                let key = word.word.clone();
                if let Some(difficulty) = form.action.difficulty() {
                    mutable.ledger.classify(&key, difficulty)?;
                }
            }
        }
        Action::Shuffle => {
            mutable.settings.toggle_shuffle()?;
            mutable.rebuild_session();
        }
        Action::Furigana => {
            mutable.settings.toggle_furigana()?;
        }
        Action::Autospeak => {
            mutable.settings.toggle_auto_speak()?;
        }
        Action::Level => {
            if let Some(level) = form.level.as_deref().and_then(Level::parse) {
                // The store keeps the last remaining level selected; the
                // session is rebuilt either way, as the original app did.
                mutable.settings.toggle_level(level)?;
                mutable.rebuild_session();
            }
        }
        Action::Rename => {
            if let Some(name) = &form.name {
                mutable.journal.set_user_name(name)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_difficulty() {
        assert_eq!(Action::Easy.difficulty(), Some("easy"));
        assert_eq!(Action::Normal.difficulty(), Some("normal"));
        assert_eq!(Action::Hard.difficulty(), Some("hard"));
        assert_eq!(Action::Flip.difficulty(), None);
    }
}

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
use std::sync::Arc;
use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::journal::UsageJournal;
use crate::ledger::DifficultyLedger;
use crate::session::StudySession;
use crate::settings::SettingsStore;
use crate::source;
use crate::web::server::start_server;
use crate::web::state::MutableState;
use crate::web::state::ServerState;

pub async fn study(
    data_dir: Option<PathBuf>,
    offline: bool,
    seed: Option<u64>,
    port: Option<u16>,
) -> Fallible<()> {
    let config = Config::load(data_dir)?;
    let db_path = config.database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?,
    )?;
    let settings = SettingsStore::load(db.clone());
    let ledger = DifficultyLedger::load(db.clone());
    let journal = UsageJournal::load(db);

    let words = if offline {
        source::load_cached(&config.sheets_dir())?
    } else {
        // A failed load degrades to the explicit no-data state; the server
        // still starts so the stats page stays reachable.
        match source::fetch_all(&config.sources).await {
            Ok(words) => words,
            Err(e) => {
                log::error!("{e}");
                Vec::new()
            }
        }
    };
    println!("Loaded {} words.", words.len());

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let session = StudySession::build(&words, settings.get(), &ledger, &mut rng);
    let state = ServerState {
        mutable: Arc::new(Mutex::new(MutableState {
            words,
            session,
            settings,
            ledger,
            journal,
            flipped: false,
            rng,
        })),
    };
    let port = port.unwrap_or(config.port);
    start_server(state, port, true).await
}

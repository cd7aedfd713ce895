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

mod post;
pub mod server;
pub mod state;
mod template;
mod view;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use reqwest::StatusCode;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::db::Database;
    use crate::error::Fallible;
    use crate::journal::UsageJournal;
    use crate::ledger::DifficultyLedger;
    use crate::session::StudySession;
    use crate::settings::SettingsStore;
    use crate::types::word::Level;
    use crate::types::word::Word;
    use crate::web::server::start_server;
    use crate::web::state::MutableState;
    use crate::web::state::ServerState;

    fn test_state(words: Vec<Word>) -> (tempfile::TempDir, ServerState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotobako.sqlite3");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        let settings = SettingsStore::load(db.clone());
        let ledger = DifficultyLedger::load(db.clone());
        let journal = UsageJournal::load(db);
        let mut rng = StdRng::seed_from_u64(0);
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
        (dir, state)
    }

    /// Start a server on a free port and return its base URL once it
    /// accepts connections.
    async fn serve(words: Vec<Word>) -> (tempfile::TempDir, String) {
        let (dir, state) = test_state(words);
        let port = portpicker::pick_unused_port().unwrap();
        spawn(async move { start_server(state, port, false).await });
        let bind = format!("0.0.0.0:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        (dir, format!("http://{bind}"))
    }

    fn sample_words() -> Vec<Word> {
        vec![Word {
            word: "食べる".to_string(),
            reading: "食[た]べる".to_string(),
            meaning: "to eat".to_string(),
            level: Level::N5,
        }]
    }

    #[tokio::test]
    async fn test_static_assets_and_fallback() -> Fallible<()> {
        let (_dir, base) = serve(sample_words()).await;

        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        let response = reqwest::get(format!("{base}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_card_flow() -> Fallible<()> {
        let (_dir, base) = serve(sample_words()).await;
        let client = reqwest::Client::new();

        // The front face shows the furigana-annotated reading. The default
        // difficulty replicates the single word twice.
        let html = reqwest::get(format!("{base}/")).await?.text().await?;
        assert!(html.contains("<ruby>食<rt>た</rt></ruby>べる"));
        assert!(html.contains("1 / 2"));
        assert!(!html.contains("is-flipped"));

        // Flip: the card now shows its back face.
        let response = client
            .post(format!("{base}/"))
            .form(&[("action", "Flip")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("is-flipped"));
        assert!(html.contains("to eat"));

        // Advancing resets to the front face and records a view.
        let response = client
            .post(format!("{base}/"))
            .form(&[("action", "Next")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("2 / 2"));
        assert!(!html.contains("is-flipped"));

        let html = reqwest::get(format!("{base}/stats")).await?.text().await?;
        assert!(html.contains("Hello, Learner"));
        assert!(html.contains("<div class=\"stat-value\">1</div>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_difficulty_classification() -> Fallible<()> {
        let (_dir, base) = serve(sample_words()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/"))
            .form(&[("action", "Hard")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        // The hard button is now the active classification, and the next
        // rebuild (toggling shuffle off and on) weights the word at 4.
        assert!(html.contains(
            "class=\"diff-btn active\" type=\"submit\" name=\"action\" value=\"Hard\""
        ));
        for _ in 0..2 {
            client
                .post(format!("{base}/"))
                .form(&[("action", "Shuffle")])
                .send()
                .await?;
        }
        let html = reqwest::get(format!("{base}/")).await?.text().await?;
        assert!(html.contains("1 / 4"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_filter_and_level_invariant() -> Fallible<()> {
        // A word outside the default N5 selection.
        let words = vec![Word {
            word: "走る".to_string(),
            reading: String::new(),
            meaning: "to run".to_string(),
            level: Level::N4,
        }];
        let (_dir, base) = serve(words).await;
        let client = reqwest::Client::new();

        let html = reqwest::get(format!("{base}/")).await?.text().await?;
        assert!(html.contains("No words match the selected levels."));

        // Deselecting the last remaining level is rejected.
        let html = client
            .post(format!("{base}/"))
            .form(&[("action", "Level"), ("level", "N5")])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("No words match the selected levels."));

        // Selecting N4 brings the word in.
        let html = client
            .post(format!("{base}/"))
            .form(&[("action", "Level"), ("level", "N4")])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("走る"));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_data_message() -> Fallible<()> {
        let (_dir, base) = serve(Vec::new()).await;
        let html = reqwest::get(format!("{base}/")).await?.text().await?;
        assert!(html.contains("No word data could be loaded"));
        Ok(())
    }
}

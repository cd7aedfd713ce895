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

use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_sheet;

/// Download every configured sheet into the local cache for offline study.
/// All-or-nothing, like the live load: a failed sheet aborts the fetch.
pub async fn fetch_sheets(data_dir: Option<PathBuf>) -> Fallible<()> {
    let config = Config::load(data_dir)?;
    let sheets_dir = config.sheets_dir();
    std::fs::create_dir_all(&sheets_dir)?;
    for source in &config.sources {
        println!("Fetching {}...", source.level);
        let response = reqwest::get(&source.url).await?;
        if !response.status().is_success() {
            return fail(format!(
                "fetching the {} sheet failed with status {}.",
                source.level,
                response.status()
            ));
        }
        let text = response.text().await?;
        let count = parse_sheet(source.level, &text).len();
        let path = sheets_dir.join(format!("{}.csv", source.level));
        std::fs::write(&path, &text)?;
        println!("Cached {count} words to {path:?}.");
    }
    Ok(())
}

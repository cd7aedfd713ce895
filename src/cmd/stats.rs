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
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::journal::DaySample;
use crate::journal::UsageJournal;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(data_dir: Option<PathBuf>, format: StatsFormat) -> Fallible<()> {
    let config = Config::load(data_dir)?;
    let db_path = config.database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?,
    )?;
    let journal = UsageJournal::load(db);
    let today = Timestamp::now().local_date();
    let cumulative = journal.cumulative_stats();

    let stats = Stats {
        user_name: journal.user_name().to_string(),
        cards_viewed_today: journal.today_view_count(today),
        consecutive_days: journal.consecutive_day_streak(today),
        cards_viewed: cumulative.cards_viewed,
        study_days: cumulative.study_days,
        quizzes_played: cumulative.quizzes_played,
        last_seven_days: journal.last_n_days_series(today, 7),
    };

    match format {
        StatsFormat::Text => {
            println!("User:            {}", stats.user_name);
            println!("Cards today:     {}", stats.cards_viewed_today);
            println!("Day streak:      {}", stats.consecutive_days);
            println!("Cards viewed:    {}", stats.cards_viewed);
            println!("Study days:      {}", stats.study_days);
            println!("Last seven days:");
            for sample in &stats.last_seven_days {
                println!("  {}  {}", sample.label, sample.cards_viewed);
            }
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    user_name: String,
    cards_viewed_today: u64,
    consecutive_days: u64,
    cards_viewed: u64,
    study_days: u64,
    quizzes_played: u64,
    last_seven_days: Vec<DaySample>,
}

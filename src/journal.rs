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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::date::Date;

const STATS_KEY: &str = "kotobako-stats";
const DEFAULT_USER_NAME: &str = "Learner";

/// Per-day view counts and cumulative usage counters. Every mutation is
/// persisted before returning. The stored JSON keeps the original field
/// names (`statsByDate`, `cumulativeStats`, ...), so an existing stats
/// blob keeps working.
pub struct UsageJournal {
    db: Database,
    stats: StatsBlob,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatsBlob {
    user_name: String,
    stats_by_date: BTreeMap<String, DayRecord>,
    cumulative_stats: CumulativeStats,
}

impl Default for StatsBlob {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            stats_by_date: BTreeMap::new(),
            cumulative_stats: CumulativeStats::default(),
        }
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DayRecord {
    cards_viewed: u64,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CumulativeStats {
    pub cards_viewed: u64,
    /// The number of distinct dates with at least one view. Recomputed
    /// whenever a new date key is first created.
    pub study_days: u64,
    /// Carried for storage compatibility; nothing increments it.
    pub quizzes_played: u64,
}

/// One point of the recent-days chart series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySample {
    pub label: String,
    pub cards_viewed: u64,
}

impl UsageJournal {
    /// Restore the journal from storage. A missing or unparseable blob
    /// yields fresh stats; initialization never fails on bad data.
    pub fn load(db: Database) -> Self {
        let stats = match db.get(STATS_KEY) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(stats) => stats,
                Err(e) => {
                    log::warn!("Corrupt stats blob, starting fresh: {e}");
                    StatsBlob::default()
                }
            },
            Ok(None) => StatsBlob::default(),
            Err(e) => {
                log::warn!("Could not read stats blob, starting fresh: {e}");
                StatsBlob::default()
            }
        };
        Self { db, stats }
    }

    /// Record one card view on `today`. The first view on a new date
    /// creates the date key and recomputes `studyDays`.
    pub fn record_view(&mut self, today: Date) -> Fallible<()> {
        let key = today.key();
        if !self.stats.stats_by_date.contains_key(&key) {
            self.stats.stats_by_date.insert(key.clone(), DayRecord::default());
            self.stats.cumulative_stats.study_days = self.stats.stats_by_date.len() as u64;
        }
        if let Some(record) = self.stats.stats_by_date.get_mut(&key) {
            record.cards_viewed += 1;
        }
        self.stats.cumulative_stats.cards_viewed += 1;
        self.persist()
    }

    pub fn today_view_count(&self, today: Date) -> u64 {
        self.stats
            .stats_by_date
            .get(&today.key())
            .map(|record| record.cards_viewed)
            .unwrap_or(0)
    }

    pub fn cumulative_stats(&self) -> CumulativeStats {
        self.stats.cumulative_stats
    }

    /// The number of consecutive recorded days, counted backward from
    /// `today` inclusive. Counting only begins when today or yesterday has
    /// a record; a record for yesterday alone still yields 0, because the
    /// walk itself starts at today. This matches the app's historical
    /// behavior.
    pub fn consecutive_day_streak(&self, today: Date) -> u64 {
        let yesterday_recorded = today
            .pred()
            .is_some_and(|d| self.stats.stats_by_date.contains_key(&d.key()));
        if !self.stats.stats_by_date.contains_key(&today.key()) && !yesterday_recorded {
            return 0;
        }
        let mut streak = 0;
        let mut date = today;
        while self.stats.stats_by_date.contains_key(&date.key()) {
            streak += 1;
            match date.pred() {
                Some(pred) => date = pred,
                None => break,
            }
        }
        streak
    }

    /// The last `n` days ending at `today`, oldest first, zero-filled for
    /// days with no record.
    pub fn last_n_days_series(&self, today: Date, n: usize) -> Vec<DaySample> {
        let mut series = Vec::with_capacity(n);
        let mut date = today;
        for _ in 0..n {
            series.push(DaySample {
                label: date.label(),
                cards_viewed: self
                    .stats
                    .stats_by_date
                    .get(&date.key())
                    .map(|record| record.cards_viewed)
                    .unwrap_or(0),
            });
            match date.pred() {
                Some(pred) => date = pred,
                None => break,
            }
        }
        series.reverse();
        series
    }

    pub fn user_name(&self) -> &str {
        &self.stats.user_name
    }

    /// Rename the user. Blank names are rejected (a no-op); the stored
    /// name is trimmed.
    pub fn set_user_name(&mut self, name: &str) -> Fallible<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.stats.user_name = name.to_string();
        self.persist()
    }

    fn persist(&self) -> Fallible<()> {
        let blob = serde_json::to_string(&self.stats)?;
        self.db.put(STATS_KEY, &blob)
    }
}

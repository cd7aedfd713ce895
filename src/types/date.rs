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

use chrono::NaiveDate;

/// A calendar date in the user's local time zone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    #[cfg(test)]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    /// The `YYYY-MM-DD` form used as the key in the usage journal.
    pub fn key(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// The short `MM-DD` form used as a chart label.
    pub fn label(self) -> String {
        self.0.format("%m-%d").to_string()
    }

    /// The previous calendar day, or None at the calendar's lower bound.
    pub fn pred(self) -> Option<Date> {
        self.0.pred_opt().map(Date)
    }
}

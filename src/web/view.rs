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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::furigana;
use crate::journal::DaySample;
use crate::ledger::DifficultyLedger;
use crate::settings::Settings;
use crate::types::difficulty::Difficulty;
use crate::types::timestamp::Timestamp;
use crate::types::word::Level;
use crate::types::word::Word;
use crate::web::state::MutableState;
use crate::web::state::ServerState;
use crate::web::template::page_template;

const THEMES: [&str; 4] = ["aetherial-light", "aetherial-dark", "sakura", "matcha"];

pub async fn root_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = state.mutable.lock().unwrap();
    let settings = mutable.settings.get();
    let body = html! {
        (header_nav())
        div.level-selector {
            @for level in Level::ALL {
                form action="/" method="post" {
                    input type="hidden" name="level" value=(level.as_str());
                    button.level-btn.active[settings.is_level_selected(level)]
                        type="submit" name="action" value="Level" { (level.as_str()) }
                }
            }
        }
        div.study { (study_area(&mutable)) }
        (controls_markup(settings))
    };
    let page = page_template("kotobako", body);
    (StatusCode::OK, Html(page.into_string()))
}

fn study_area(mutable: &MutableState) -> Markup {
    if mutable.words.is_empty() {
        return html! {
            div.flashcard-message {
                "No word data could be loaded. Check the connection and restart, "
                "or run " code { "kotobako fetch" } " and study offline."
            }
        };
    }
    match mutable.session.current() {
        None => html! {
            div.flashcard-message { "No words match the selected levels." }
        },
        Some(word) => card_markup(
            word,
            mutable.flipped,
            mutable.settings.get(),
            &mutable.ledger,
            mutable.session.position(),
            mutable.session.len(),
        ),
    }
}

fn card_markup(
    word: &Word,
    flipped: bool,
    settings: &Settings,
    ledger: &DifficultyLedger,
    position: usize,
    len: usize,
) -> Markup {
    let display: Markup = if word.reading.is_empty() {
        html! { (word.word) }
    } else if settings.is_furigana_on {
        furigana::ruby_markup(&word.reading)
    } else {
        html! { (furigana::surface_text(&word.reading)) }
    };
    let speech = if word.reading.is_empty() {
        word.word.clone()
    } else {
        furigana::speech_text(&word.reading)
    };
    let difficulty = ledger.get(&word.word);
    html! {
        form id="flip-form" action="/" method="post" {
            button.flashcard type="submit" name="action" value="Flip"
                data-speech=(speech) data-autospeak=(settings.is_auto_speak_on) {
                div.flashcard-inner.is-flipped[flipped] {
                    div.flashcard-front {
                        div.flashcard-word.no-furigana[!settings.is_furigana_on] { (display) }
                    }
                    div.flashcard-back {
                        div.flashcard-meaning { (word.meaning) }
                    }
                }
            }
        }
        div.card-nav {
            form id="prev-form" action="/" method="post" {
                button.nav-btn type="submit" name="action" value="Prev" { "←" }
            }
            div.position { (position + 1) " / " (len) }
            form id="next-form" action="/" method="post" {
                button.nav-btn type="submit" name="action" value="Next" { "→" }
            }
        }
        div.difficulty {
            form action="/" method="post" {
                @for d in Difficulty::ALL {
                    button.diff-btn.active[d == difficulty]
                        type="submit" name="action" value=(action_value(d)) { (d.as_str()) }
                }
            }
        }
    }
}

fn action_value(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Normal => "Normal",
        Difficulty::Hard => "Hard",
    }
}

fn controls_markup(settings: &Settings) -> Markup {
    html! {
        div.study-controls {
            form action="/" method="post" {
                button.control-btn.active[settings.is_furigana_on]
                    type="submit" name="action" value="Furigana" { "Furigana" }
            }
            form action="/" method="post" {
                button.control-btn.active[settings.is_shuffle_on]
                    type="submit" name="action" value="Shuffle" { "Shuffle" }
            }
            form action="/" method="post" {
                button.control-btn.active[settings.is_auto_speak_on]
                    type="submit" name="action" value="Autospeak" { "Speak" }
            }
        }
    }
}

pub async fn stats_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = state.mutable.lock().unwrap();
    let today = Timestamp::now().local_date();
    let journal = &mutable.journal;
    let cumulative = journal.cumulative_stats();
    let series = journal.last_n_days_series(today, 7);
    let body = html! {
        (header_nav())
        section.stats {
            h1 { "Hello, " (journal.user_name()) }
            form.rename action="/" method="post" {
                input type="text" name="name" maxlength="40" placeholder="Your name";
                button type="submit" name="action" value="Rename" { "Rename" }
            }
            div.stat-grid {
                (stat_tile("today", "Cards today", journal.today_view_count(today)))
                (stat_tile("streak", "Day streak", journal.consecutive_day_streak(today)))
                (stat_tile("total", "Cards viewed", cumulative.cards_viewed))
                (stat_tile("days", "Study days", cumulative.study_days))
            }
            h2 { "Last 7 days" }
            (chart_markup(&series))
        }
    };
    let page = page_template("kotobako stats", body);
    (StatusCode::OK, Html(page.into_string()))
}

fn stat_tile(key: &str, label: &str, value: u64) -> Markup {
    html! {
        div.stat-tile data-stat=(key) {
            div.stat-value { (value) }
            div.stat-label { (label) }
        }
    }
}

/// A small server-rendered bar chart of the last week's card views.
fn chart_markup(series: &[DaySample]) -> Markup {
    let max = series
        .iter()
        .map(|sample| sample.cards_viewed)
        .max()
        .unwrap_or(0)
        .max(1);
    html! {
        svg.chart viewBox="0 0 298 144" role="img" aria-label="Cards viewed per day" {
            @for (i, sample) in series.iter().enumerate() {
                @let height = sample.cards_viewed * 100 / max;
                @let x = i * 42 + 4;
                @let y = 112 - height;
                rect.bar x=(x) y=(y) width="34" height=(height.max(1)) {}
                @if sample.cards_viewed > 0 {
                    text.bar-value x=(x + 17) y=(y - 5) text-anchor="middle" {
                        (sample.cards_viewed)
                    }
                }
                text.bar-label x=(x + 17) y="134" text-anchor="middle" { (sample.label) }
            }
        }
    }
}

fn header_nav() -> Markup {
    html! {
        header {
            a.logo href="/" { "言葉箱" span.logo-sub { "kotobako" } }
            nav {
                a href="/" { "Study" }
                a href="/stats" { "Stats" }
            }
            div.theme-switcher {
                @for theme in THEMES {
                    button.theme-btn data-theme=(theme) title=(theme) {}
                }
            }
        }
    }
}

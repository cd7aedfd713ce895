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

use maud::Markup;
use maud::html;

/// Readings are annotated per kanji run: `食[た]べる`, `勉強[べんきょう]する`.
/// The annotation applies to the contiguous run of kanji immediately before
/// the bracket. Brackets with no preceding kanji are left alone.
#[derive(Debug, PartialEq, Eq)]
enum Segment {
    /// Unannotated text, passed through.
    Plain(String),
    /// A kanji run with its reading.
    Annotated { base: String, reading: String },
    /// A bracketed reading with no kanji to attach to.
    Orphan(String),
}

fn is_kanji(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '々' | '〆' | '〇')
}

fn tokenize(annotated: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut chars = annotated.chars();
    while let Some(c) = chars.next() {
        if c != '[' {
            plain.push(c);
            continue;
        }
        let mut reading = String::new();
        let mut closed = false;
        for inner in chars.by_ref() {
            if inner == ']' {
                closed = true;
                break;
            }
            reading.push(inner);
        }
        if !closed {
            // Unterminated bracket: keep it verbatim.
            plain.push('[');
            plain.push_str(&reading);
            continue;
        }
        // Split the trailing kanji run off the text seen so far.
        let split_at = plain
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_kanji(*c))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(plain.len());
        let base = plain.split_off(split_at);
        if !plain.is_empty() {
            segments.push(Segment::Plain(std::mem::take(&mut plain)));
        }
        if base.is_empty() {
            segments.push(Segment::Orphan(reading));
        } else {
            segments.push(Segment::Annotated { base, reading });
        }
    }
    if !plain.is_empty() {
        segments.push(Segment::Plain(plain));
    }
    segments
}

/// Render an annotated reading as `<ruby>` markup for the card front.
pub fn ruby_markup(annotated: &str) -> Markup {
    let segments = tokenize(annotated);
    html! {
        @for segment in &segments {
            @match segment {
                Segment::Plain(text) => { (text) }
                Segment::Annotated { base, reading } => {
                    ruby { (base) rt { (reading) } }
                }
                Segment::Orphan(reading) => { "[" (reading) "]" }
            }
        }
    }
}

/// The surface text with all annotations stripped: `食[た]べる` → `食べる`.
pub fn surface_text(annotated: &str) -> String {
    let mut out = String::new();
    for segment in tokenize(annotated) {
        match segment {
            Segment::Plain(text) => out.push_str(&text),
            Segment::Annotated { base, .. } => out.push_str(&base),
            Segment::Orphan(_) => {}
        }
    }
    out
}

/// The spoken form, with each kanji run replaced by its reading:
/// `食[た]べる` → `たべる`. Fed to the browser's speech synthesis.
pub fn speech_text(annotated: &str) -> String {
    let mut out = String::new();
    for segment in tokenize(annotated) {
        match segment {
            Segment::Plain(text) => out.push_str(&text),
            Segment::Annotated { reading, .. } => out.push_str(&reading),
            Segment::Orphan(reading) => {
                out.push('[');
                out.push_str(&reading);
                out.push(']');
            }
        }
    }
    out
}

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

use clap::Parser;

use crate::cmd::fetch::fetch_sheets;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::study::study;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Study vocabulary flip-cards in the browser.
    Study {
        /// Load words from the local sheet cache instead of the network.
        #[arg(long)]
        offline: bool,
        /// Seed the session shuffle, for reproducible orderings.
        #[arg(long)]
        seed: Option<u64>,
        /// Port for the local web server.
        #[arg(long)]
        port: Option<u16>,
        /// Override the data directory.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print usage statistics.
    Stats {
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Override the data directory.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Download the vocabulary sheets into the local cache.
    Fetch {
        /// Override the data directory.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Study {
            offline,
            seed,
            port,
            data_dir,
        } => study(data_dir, offline, seed, port).await,
        Command::Stats { format, data_dir } => print_stats(data_dir, format),
        Command::Fetch { data_dir } => fetch_sheets(data_dir).await,
    }
}

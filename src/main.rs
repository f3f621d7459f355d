// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use costbook::{cli, commands, ledger};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("costbook=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let ledger = ledger::shared()?;

    match matches.subcommand() {
        Some(("add", sub)) => commands::costs::handle(&ledger, sub)?,
        Some(("report", sub)) => commands::reports::report(&ledger, sub)?,
        Some(("chart", sub)) => commands::reports::chart(&ledger, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&ledger, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: print the quotation report of a saved design
//!
//! Usage:
//!   layout-report <design.json> [--summary] [--compact]

use planlite_layout::Design;
use std::env;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: layout-report <design.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --summary   Print design totals instead of per-wall reports");
    eprintln!("  --compact   Single-line JSON output");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace lattice regeneration.");
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let path = &args[1];
    let mut summary = false;
    let mut compact = false;
    for arg in &args[2..] {
        match arg.as_str() {
            "--summary" => summary = true,
            "--compact" => compact = true,
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    }

    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "failed to read design");
            return ExitCode::FAILURE;
        }
    };

    let design = match Design::from_json(&json) {
        Ok(design) => design,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "failed to load design");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        tier = %design.tier(),
        nodes = design.nodes().len(),
        walls = design.wall_count(),
        "loaded design"
    );

    let output = if summary {
        render(&design.summary(), compact)
    } else {
        render(&design.wall_reports(), compact)
    };

    match output {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize report");
            ExitCode::FAILURE
        }
    }
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Demo Runner
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Runs the closure-capture scenario suite and reports each scenario
//! independently.
//!
//! Exit codes: 0 when every executed scenario passes, 1 when any
//! fails, 2 on a usage or configuration error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use capture_core::ScenarioSuite;
use capture_types::{CaptureResult, HarnessConfig, SuiteReport};

#[derive(Parser, Debug)]
#[command(name = "capture-demo", version, about = "Closure capture scenario runner")]
struct Cli {
    /// JSON harness config (probe, increase, stream_text)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run only the named scenario (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// List scenarios and exit
    #[arg(long)]
    list: bool,

    /// Print the suite report as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> CaptureResult<HarnessConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            HarnessConfig::from_json(&text)
        }
        None => Ok(HarnessConfig::default()),
    }
}

fn print_list(suite: &ScenarioSuite) {
    for scenario in suite.iter() {
        println!(
            "{:<28} {:<15} {:<19} {}",
            scenario.name, scenario.mode, scenario.style, scenario.description
        );
    }
}

fn print_report(report: &SuiteReport) {
    for r in &report.reports {
        if r.passed {
            println!("PASS  {}", r.name);
        } else {
            println!(
                "FAIL  {}: {}",
                r.name,
                r.error.as_deref().unwrap_or("no detail")
            );
        }
    }
    println!("{} passed, {} failed", report.passed, report.failed);
}

fn execute(cli: &Cli) -> CaptureResult<bool> {
    let config = load_config(cli.config.as_ref())?;
    let suite = ScenarioSuite::standard(config)?;
    log::debug!("suite loaded: {} scenarios, probe={}", suite.len(), suite.invoker().probe());

    if cli.list {
        print_list(&suite);
        return Ok(true);
    }

    let report = if cli.only.is_empty() {
        suite.run_all()
    } else {
        suite.run_selected(cli.only.as_slice())?
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("failed to serialize report: {e}"),
        }
    } else {
        print_report(&report);
    }
    Ok(report.all_passed())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

//! CLI probe for the question bank core.
//!
//! # Responsibility
//! - Resolve editor config, start logging and load the configured bank.
//! - Print a deterministic per-stage summary for quick sanity checks.
//!
//! Usage: `persona_questions_cli [config.toml]`

use persona_questions_core::{core_version, init_from_config, EditorConfig, QuestionBank};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match EditorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is optional for the probe; report and keep going.
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let bank = match QuestionBank::load_with_policy(&config.bank_path, config.load_policy()) {
        Ok(bank) => bank,
        Err(err) => {
            log::error!("event=cli_load module=cli status=error error={err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("persona_questions_core version={}", core_version());
    println!("bank={} stages={}", config.bank_path.display(), bank.len());
    if bank.is_empty() {
        println!("no stages yet");
    }
    for stage in bank.stages() {
        println!(
            "stage={:?} status={:?} questions={}",
            stage.name(),
            stage.status(),
            stage.len()
        );
    }
    ExitCode::SUCCESS
}

//! Build command implementation.

use rhizome_prebuild_core::{Package, PreBuildTask, RunOutcome, UserConfig};
use std::io;
use std::path::Path;
use std::process::ExitCode;

pub fn run(root: &Path, config: &UserConfig) -> ExitCode {
    let Some(registry) = super::registry() else {
        return ExitCode::FAILURE;
    };

    let package = match Package::load(root) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut task = PreBuildTask::new(io::stdout().lock()).with_layout(config.layout.clone());
    match task.execute(&package, &registry) {
        Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
        Ok(RunOutcome::ToolNotFound(tool)) => {
            tracing::debug!(%tool, "pre-build run ended at unknown tool");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

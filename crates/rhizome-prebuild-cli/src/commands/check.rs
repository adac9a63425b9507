//! Check command implementation.

use rhizome_prebuild_core::{OptionsValidator, Package, ToolRegistry};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub fn run(root: &Path) -> ExitCode {
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

    match check(&package, &registry, &mut io::stdout().lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints what a build would report before executing tools. Returns whether
/// a build would pass those checks.
///
/// Like a build, an unregistered tool type ends the check without failing it.
fn check(package: &Package, registry: &ToolRegistry, out: &mut impl Write) -> io::Result<bool> {
    let mut ok = !package.manifest().diagnostics.has_errors();
    for diagnostic in &package.manifest().diagnostics {
        writeln!(out, "{diagnostic}")?;
    }

    if package.tools().is_empty() {
        writeln!(out, "no tools configured")?;
        return Ok(ok);
    }

    let validator = OptionsValidator::new();
    for tool in package.tools() {
        if registry.lookup(&tool.type_name).is_none() {
            writeln!(out, "Command not found: {}", tool.type_name)?;
            tracing::debug!(tool = %tool.type_name, "check ended at unknown tool");
            break;
        }

        match validator.validate(tool.options.as_ref(), &tool.type_name, registry) {
            Ok(diagnostics) if diagnostics.is_empty() => {
                writeln!(out, "validated: {} ({})", tool.id, tool.type_name)?;
            }
            Ok(diagnostics) => {
                for diagnostic in &diagnostics {
                    writeln!(out, "{diagnostic}")?;
                }
                ok &= !diagnostics.iter().any(|d| d.is_error());
            }
            Err(e) => {
                writeln!(out, "skipped: {} ({}): {e}", tool.id, tool.type_name)?;
            }
        }
    }

    Ok(ok)
}

//! Tools command implementation.

use std::process::ExitCode;

pub fn list() -> ExitCode {
    let Some(registry) = super::registry() else {
        return ExitCode::FAILURE;
    };

    println!("Available tools:");
    for name in registry.names() {
        let schema = registry
            .lookup(name)
            .and_then(|t| t.options_schema())
            .map_or("", |_| " (validated options)");
        println!("  {name}{schema}");
    }
    ExitCode::SUCCESS
}

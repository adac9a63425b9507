pub mod build;
pub mod check;
pub mod tools;

use rhizome_prebuild_core::ToolRegistry;

/// Registry of every tool this binary ships with.
fn registry() -> Option<ToolRegistry> {
    match rhizome_prebuild_tools::builtin_registry() {
        Ok(registry) => Some(registry),
        Err(e) => {
            eprintln!("error: {e}");
            None
        }
    }
}

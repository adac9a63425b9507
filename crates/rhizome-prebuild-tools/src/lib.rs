//! Built-in code generation tools.

mod codes;
mod template;
mod version_info;

use rhizome_prebuild_core::{CodeGeneratorTool, RegistryError, ToolRegistry};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use codes::BuiltinDiagnosticCode;
pub use template::TemplateTool;
pub use version_info::{OutputFormat, VersionInfoTool};

/// All built-in tools.
pub fn builtin_tools() -> Vec<Box<dyn CodeGeneratorTool>> {
    vec![Box::new(TemplateTool), Box::new(VersionInfoTool)]
}

/// A registry holding the built-in tools.
pub fn builtin_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::from_tools(builtin_tools())
}

/// Replaces `{{key}}` placeholders with their values in one left-to-right
/// pass. Inserted values are not scanned again; unknown placeholders are
/// left as they are.
pub fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after
            .find("}}")
            .and_then(|end| vars.get(&after[..end]).map(|v| (end, v)));
        match value {
            Some((end, value)) => {
                result.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                result.push_str("{{");
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_prebuild_core::{Manifest, Package, PreBuildTask, RunOutcome};

    #[test]
    fn substitute_vars() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "my-project".to_string());
        vars.insert("version".to_string(), "1.0.0".to_string());

        let result = substitute("name = \"{{name}}\"\nversion = \"{{version}}\"", &vars);
        assert_eq!(result, "name = \"my-project\"\nversion = \"1.0.0\"");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let mut vars = HashMap::new();
        vars.insert("greeting".to_string(), "hello {{who}}".to_string());
        vars.insert("who".to_string(), "world".to_string());

        for _ in 0..32 {
            assert_eq!(
                substitute("{{greeting}}, {{who}}!", &vars),
                "hello {{who}}, world!"
            );
        }
    }

    #[test]
    fn unknown_and_unterminated_placeholders_are_kept() {
        let mut vars = HashMap::new();
        vars.insert("a".to_string(), "1".to_string());

        assert_eq!(substitute("{{b}} {{ {{a}} {{a", &vars), "{{b}} {{ 1 {{a");
    }

    #[test]
    fn registry_contains_builtins() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            ["template", "version-info"]
        );
    }

    #[test]
    fn builtins_run_through_the_pre_build_task() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("banner.txt.in"), "{{name}} v{{version}}\n").unwrap();

        let manifest = Manifest::from_str(
            r#"
            [package]
            name = "petstore"
            version = "2.1.0"

            [[tool.template]]
            id = "banner"
            filePath = "banner.txt.in"
            options = {}

            [[tool.version-info]]
            id = "version"
            filePath = "prebuild.toml"
            targetModule = "meta"
            options = { format = "toml", file = "version.toml" }
            "#,
        )
        .unwrap();
        let package = Package::new(dir.path(), manifest);
        let registry = builtin_registry().unwrap();

        let mut task = PreBuildTask::new(Vec::new());
        let outcome = task.execute(&package, &registry).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert!(task.into_inner().is_empty());

        let banner = fs::read_to_string(dir.path().join("generated/banner.txt")).unwrap();
        assert_eq!(banner, "petstore v2.1.0\n");
        let version = fs::read_to_string(dir.path().join("generated/meta/version.toml")).unwrap();
        assert!(version.contains("version = \"2.1.0\""));
    }

    #[test]
    fn repeated_template_runs_produce_identical_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt.in"), "{{greeting}} {{missing}}\n").unwrap();

        let manifest = Manifest::from_str(
            r#"
            [package]
            name = "petstore"
            version = "2.1.0"

            [[tool.template]]
            id = "hello"
            filePath = "hello.txt.in"
            options = { vars = { greeting = "hello {{who}}", who = "world" } }
            "#,
        )
        .unwrap();
        let package = Package::new(dir.path(), manifest);
        let registry = builtin_registry().unwrap();

        let mut runs = Vec::new();
        for _ in 0..64 {
            let mut task = PreBuildTask::new(Vec::new());
            assert_eq!(task.execute(&package, &registry).unwrap(), RunOutcome::Completed);
            let transcript = String::from_utf8(task.into_inner()).unwrap();
            let output = fs::read_to_string(dir.path().join("generated/hello.txt")).unwrap();
            runs.push((output, transcript));
        }

        assert_eq!(runs[0].0, "hello {{who}} {{missing}}\n");
        assert!(runs[0].1.contains("'{{missing}}'"));
        assert!(!runs[0].1.contains("'{{who}}'"));
        assert!(runs.iter().all(|run| *run == runs[0]));
    }
}

//! Diagnostics reported by manifest loading, options validation and tools.

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Upper-case label used in printed output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stable diagnostic code.
///
/// Each producer (the project itself, every tool) defines a closed enum of
/// its codes and implements this trait for it.
pub trait DiagnosticCode {
    /// Stable identifier, e.g. `BCE5400`.
    fn diagnostic_id(&self) -> &str;
    /// Dotted message key, e.g. `missing.tool.properties`.
    fn message_key(&self) -> &str;
    /// Default severity for diagnostics carrying this code.
    fn severity(&self) -> Severity;
}

/// Project-level diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectDiagnosticCode {
    InvalidBalaFile,
    OldDependenciesToml,
    LocalPackagesInDependenciesToml,
    CorruptedDependenciesToml,
    IncompatibleDependencyVersions,
    PackageNotFound,
    MissingPkgInfoInManifest,
    DeprecatedPackage,
    BuiltWithOlderSlUpdateDistribution,
    CustomRepositoryNotFound,
    MissingToolProperties,
    IncompatibleTypeForToolProperty,
    EmptyToolProperty,
    ToolOptionsValidationSkipped,
    RecurringToolProperties,
    InvalidToolOptions,
    ModuleNotFound,
    UnsupportedCompilerPluginType,
    ConflictingPlatformJarFiles,
}

impl ProjectDiagnosticCode {
    fn descriptor(self) -> (&'static str, &'static str) {
        use ProjectDiagnosticCode::*;
        match self {
            InvalidBalaFile => ("BCE5000", "invalid.bala.file"),
            OldDependenciesToml => ("BCE5001", "old.dependencies.toml"),
            LocalPackagesInDependenciesToml => ("BCE5002", "local.packages.in.dependencies.toml"),
            CorruptedDependenciesToml => ("BCE5003", "corrupted.dependencies.toml"),
            IncompatibleDependencyVersions => ("BCE5004", "incompatible.dependency.versions"),
            PackageNotFound => ("BCE5005", "package.not.found"),
            MissingPkgInfoInManifest => ("BCE5006", "missing.package.info"),
            DeprecatedPackage => ("BCE5007", "deprecated.package"),
            BuiltWithOlderSlUpdateDistribution => {
                ("BCE5008", "built.with.older.sl.update.distribution")
            }
            CustomRepositoryNotFound => ("BCE5009", "custom.repository.not.found"),
            MissingToolProperties => ("BCE5400", "missing.tool.properties"),
            IncompatibleTypeForToolProperty => ("BCE5401", "incompatible.tool.properties"),
            EmptyToolProperty => ("BCE5402", "empty.tool.properties"),
            ToolOptionsValidationSkipped => ("BCE5403", "tool.options.validation.skipped"),
            RecurringToolProperties => ("BCE5404", "recurring.tool.properties"),
            InvalidToolOptions => ("BCE5405", "invalid.tool.options"),
            ModuleNotFound => ("BCE5100", "module.not.found"),
            UnsupportedCompilerPluginType => ("BCE5200", "unsupported.compiler.plugin.type"),
            ConflictingPlatformJarFiles => ("BCE5300", "conflicting.platform.jars.type"),
        }
    }
}

impl DiagnosticCode for ProjectDiagnosticCode {
    fn diagnostic_id(&self) -> &str {
        self.descriptor().0
    }

    fn message_key(&self) -> &str {
        self.descriptor().1
    }

    fn severity(&self) -> Severity {
        match self {
            ProjectDiagnosticCode::ToolOptionsValidationSkipped => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single reported issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: String,
    message_key: String,
    severity: Severity,
    message: String,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity.
    pub fn new(code: &dyn DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(code, code.severity(), message)
    }

    /// Create a diagnostic with an explicit severity.
    pub fn with_severity(
        code: &dyn DiagnosticCode,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.diagnostic_id().to_string(),
            message_key: code.message_key().to_string(),
            severity,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this diagnostic carries the given code (compared by message key).
    pub fn has_code(&self, code: &dyn DiagnosticCode) -> bool {
        self.message_key == code.message_key()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code, self.message)
    }
}

/// An ordered, append-only list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.is_error())
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

//! Diagnostic codes reported by the built-in tools.

use rhizome_prebuild_core::{DiagnosticCode, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinDiagnosticCode {
    MissingFilePath,
    InputNotFound,
    InputUnreadable,
    UnresolvedPlaceholder,
    InvalidOptions,
    SerializeFailed,
    WriteFailed,
}

impl DiagnosticCode for BuiltinDiagnosticCode {
    fn diagnostic_id(&self) -> &str {
        match self {
            Self::MissingFilePath => "PBT1000",
            Self::InputNotFound => "PBT1001",
            Self::InputUnreadable => "PBT1002",
            Self::UnresolvedPlaceholder => "PBT1003",
            Self::InvalidOptions => "PBT1100",
            Self::SerializeFailed => "PBT1101",
            Self::WriteFailed => "PBT1200",
        }
    }

    fn message_key(&self) -> &str {
        match self {
            Self::MissingFilePath => "builtin.missing.file.path",
            Self::InputNotFound => "builtin.input.not.found",
            Self::InputUnreadable => "builtin.input.unreadable",
            Self::UnresolvedPlaceholder => "builtin.unresolved.placeholder",
            Self::InvalidOptions => "builtin.invalid.options",
            Self::SerializeFailed => "builtin.serialize.failed",
            Self::WriteFailed => "builtin.write.failed",
        }
    }

    fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedPlaceholder => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

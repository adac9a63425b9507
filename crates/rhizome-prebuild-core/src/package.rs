//! The package a pre-build run works on.

use crate::manifest::{MANIFEST_FILE, Manifest, ManifestError, PackageDescriptor, ToolDeclaration};
use std::path::{Path, PathBuf};

/// A loaded package: its root directory and parsed manifest.
///
/// Nothing in a pre-build run mutates the package; tools only see it
/// through a shared reference.
#[derive(Debug, Clone)]
pub struct Package {
    root: PathBuf,
    manifest: Manifest,
}

impl Package {
    /// Load the package rooted at `root` by reading its `prebuild.toml`.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let root = root.into();
        let manifest = Manifest::from_path(root.join(MANIFEST_FILE))?;
        Ok(Self { root, manifest })
    }

    /// Wrap an already parsed manifest.
    pub fn new(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn descriptor(&self) -> &PackageDescriptor {
        &self.manifest.package
    }

    pub fn name(&self) -> &str {
        &self.manifest.package.name
    }

    /// Declared tools, in declaration order.
    pub fn tools(&self) -> &[ToolDeclaration] {
        &self.manifest.tools
    }
}

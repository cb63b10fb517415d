//! Package descriptors and precomputed lazy-load artifacts.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::registry::{Known, KnownEntry, Types};
use crate::{ArtifactError, LoaderError};

/// File name of the package descriptor inside a package directory.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";

/// Known-index of nodes, relative to the package directory.
pub const KNOWN_NODES: &str = "dist/known/nodes.json";
/// Known-index of credentials, relative to the package directory.
pub const KNOWN_CREDENTIALS: &str = "dist/known/credentials.json";
/// Node descriptors, relative to the package directory.
pub const NODE_TYPES: &str = "dist/types/nodes.json";
/// Credential descriptors, relative to the package directory.
pub const CREDENTIAL_TYPES: &str = "dist/types/credentials.json";

/// The package descriptor: identity plus an optional capability block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name; used as the loader namespace.
    pub name: String,
    /// Package version, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Component files the package contributes. Absent means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nebula: Option<CapabilityBlock>,
}

/// Component files listed by a package, relative to the package directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityBlock {
    /// Node files.
    pub nodes: Vec<PathBuf>,
    /// Credential files.
    pub credentials: Vec<PathBuf>,
}

impl PackageDescriptor {
    /// Read `package.json` from a package directory.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::Io`] if the file cannot be read.
    /// - [`LoaderError::MalformedManifest`] if it cannot be parsed or has
    ///   an empty name.
    pub async fn read(directory: &Path) -> Result<Self, LoaderError> {
        let path = directory.join(PACKAGE_DESCRIPTOR);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| LoaderError::Io {
                path: path.clone(),
                source,
            })?;
        Self::parse(&bytes, &path)
    }

    /// Parse descriptor bytes; `path` is only used in errors.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<Self, LoaderError> {
        let malformed = |reason: String| LoaderError::MalformedManifest {
            artifact: "package descriptor",
            path: path.to_path_buf(),
            reason,
        };
        let descriptor: Self = serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
        if descriptor.name.trim().is_empty() {
            return Err(malformed("package name is empty".into()));
        }
        Ok(descriptor)
    }

    /// Node files, empty without a capability block.
    pub fn node_files(&self) -> &[PathBuf] {
        self.nebula
            .as_ref()
            .map(|b| b.nodes.as_slice())
            .unwrap_or_default()
    }

    /// Credential files, empty without a capability block.
    pub fn credential_files(&self) -> &[PathBuf] {
        self.nebula
            .as_ref()
            .map(|b| b.credentials.as_slice())
            .unwrap_or_default()
    }
}

/// The four lazy-load artifacts, read and validated together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LazyArtifacts {
    /// Known-index from `dist/known/`.
    pub known: Known,
    /// Descriptors from `dist/types/`.
    pub types: Types,
}

impl LazyArtifacts {
    /// Read all four artifacts under `directory`.
    ///
    /// # Errors
    ///
    /// The first [`ArtifactError`] met; any failure invalidates the set.
    pub async fn read(directory: &Path) -> Result<Self, ArtifactError> {
        let known_nodes: IndexMap<String, KnownEntry> =
            read_artifact(&directory.join(KNOWN_NODES)).await?;
        let known_credentials: IndexMap<String, KnownEntry> =
            read_artifact(&directory.join(KNOWN_CREDENTIALS)).await?;
        let node_types = read_artifact(&directory.join(NODE_TYPES)).await?;
        let credential_types = read_artifact(&directory.join(CREDENTIAL_TYPES)).await?;

        let artifacts = Self {
            known: Known {
                nodes: known_nodes,
                credentials: known_credentials,
            },
            types: Types {
                nodes: node_types,
                credentials: credential_types,
            },
        };
        artifacts.validate(directory)?;
        Ok(artifacts)
    }

    /// Check the minimal shape the registry relies on.
    pub fn validate(&self, directory: &Path) -> Result<(), ArtifactError> {
        validate_known(&directory.join(KNOWN_NODES), &self.known.nodes)?;
        validate_known(&directory.join(KNOWN_CREDENTIALS), &self.known.credentials)?;

        let nodes_path = directory.join(NODE_TYPES);
        for description in &self.types.nodes {
            if description.name.is_empty() {
                return Err(invalid(&nodes_path, "node descriptor without a name".into()));
            }
            if !self.known.nodes.contains_key(&description.name) {
                return Err(invalid(
                    &nodes_path,
                    format!("node '{}' is missing from the known-index", description.name),
                ));
            }
        }

        let credentials_path = directory.join(CREDENTIAL_TYPES);
        for description in &self.types.credentials {
            if description.name.is_empty() {
                return Err(invalid(
                    &credentials_path,
                    "credential descriptor without a name".into(),
                ));
            }
            if !self.known.credentials.contains_key(&description.name) {
                return Err(invalid(
                    &credentials_path,
                    format!(
                        "credential '{}' is missing from the known-index",
                        description.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

async fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_known(path: &Path, entries: &IndexMap<String, KnownEntry>) -> Result<(), ArtifactError> {
    for (name, entry) in entries {
        if name.is_empty() {
            return Err(invalid(path, "entry with an empty name".into()));
        }
        if entry.class_name.is_empty() {
            return Err(invalid(path, format!("'{name}' has an empty className")));
        }
        if entry.source_path.as_os_str().is_empty() {
            return Err(invalid(path, format!("'{name}' has an empty sourcePath")));
        }
    }
    Ok(())
}

fn invalid(path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

//! Codex (categorization) enrichment.

use std::path::{Path, PathBuf};

use nebula_node::Codex;

use crate::ArtifactError;

/// Category added to every node loaded under the custom namespace.
pub const CUSTOM_NODES_CATEGORY: &str = "Custom Nodes";

/// Picks the codex recorded for a node.
///
/// Precedence: codex declared on the component, then the sidecar file next
/// to it. A missing or unreadable sidecar is logged at debug level and
/// leaves the node without codex. Custom-namespace loaders always add
/// [`CUSTOM_NODES_CATEGORY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CodexEnricher {
    custom: bool,
}

impl CodexEnricher {
    /// Enricher for a loader; `custom` marks the custom namespace.
    pub fn new(custom: bool) -> Self {
        Self { custom }
    }

    /// Sidecar location for a component file: same stem, `.json` extension.
    pub fn sidecar_path(source: &Path) -> PathBuf {
        source.with_extension("json")
    }

    /// Read and parse the sidecar of `source`.
    pub async fn read_sidecar(source: &Path) -> Result<Codex, ArtifactError> {
        let path = Self::sidecar_path(source);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ArtifactError::Read {
                path: path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path, source })
    }

    /// The codex to record for the component at `source`.
    pub async fn resolve(&self, declared: Option<&Codex>, source: &Path) -> Option<Codex> {
        let codex = match declared {
            Some(codex) => Some(codex.clone()),
            None => match Self::read_sidecar(source).await {
                Ok(codex) => Some(codex),
                Err(e) => {
                    tracing::debug!(source = %source.display(), error = %e, "no codex sidecar");
                    None
                }
            },
        };

        if self.custom {
            let mut codex = codex.unwrap_or_default();
            codex.add_category(CUSTOM_NODES_CATEGORY);
            Some(codex)
        } else {
            codex
        }
    }
}

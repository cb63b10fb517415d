//! Eager discovery over a custom directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use walkdir::{DirEntry, WalkDir};

use crate::base::{BaseRegistry, CUSTOM_NAMESPACE};
use crate::loader::ComponentLoader;
use crate::resolver::ComponentResolver;
use crate::{LoaderConfig, LoaderError};

/// Suffix of node component files.
pub const NODE_FILE_SUFFIX: &str = ".node.wasm";
/// Suffix of credential component files.
pub const CREDENTIAL_FILE_SUFFIX: &str = ".credentials.wasm";

const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Loads every `*.node.wasm` and `*.credentials.wasm` file under a
/// directory, in the [`CUSTOM_NAMESPACE`].
///
/// Nodes are loaded before credentials; files of one kind load in
/// file-name order. Hidden directories are not descended into.
#[derive(Debug)]
pub struct DirectoryScanLoader {
    base: BaseRegistry,
}

impl DirectoryScanLoader {
    /// Create a loader for `directory`.
    pub fn new(
        directory: impl Into<PathBuf>,
        config: LoaderConfig,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Self {
        Self {
            base: BaseRegistry::new(directory, CUSTOM_NAMESPACE, config, resolver),
        }
    }
}

#[async_trait]
impl ComponentLoader for DirectoryScanLoader {
    async fn load_all(&mut self) -> Result<(), LoaderError> {
        let directory = self.base.directory().to_path_buf();

        let nodes = scan(directory.clone(), NODE_FILE_SUFFIX).await?;
        for path in &nodes {
            self.base.load_node_file(path).await?;
        }

        let credentials = scan(directory.clone(), CREDENTIAL_FILE_SUFFIX).await?;
        for path in &credentials {
            self.base.load_credential_file(path).await?;
        }

        tracing::info!(
            directory = %directory.display(),
            nodes = self.base.registry().node_types.len(),
            credentials = self.base.registry().credential_types.len(),
            "custom directory loaded"
        );
        Ok(())
    }

    fn base(&self) -> &BaseRegistry {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.base
    }
}

/// Files under `root` whose name ends with `suffix`, sorted by path.
pub async fn scan(root: PathBuf, suffix: &'static str) -> Result<Vec<PathBuf>, LoaderError> {
    tokio::task::spawn_blocking(move || scan_blocking(&root, suffix)).await?
}

fn scan_blocking(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, LoaderError> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| LoaderError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if entry.file_type().is_file() && matches {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

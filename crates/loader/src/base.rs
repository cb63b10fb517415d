//! Shared per-file loading and registry bookkeeping.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nebula_node::{Credential, NodeDescription, NodeType};

use crate::codex::CodexEnricher;
use crate::icon::IconPathResolver;
use crate::registry::{CredentialRecord, Known, LoadedNode, NodeRecord, Registry, Types};
use crate::resolver::{ComponentResolver, ResolveError};
use crate::{LoaderConfig, LoaderError};

/// Namespace reserved for user components loaded from a custom directory.
pub const CUSTOM_NAMESPACE: &str = "CUSTOM";

/// State and per-file logic shared by every loader.
///
/// Owns one [`Registry`]. Loading a component is all-or-nothing: every
/// check runs before the registry is touched.
pub struct BaseRegistry {
    directory: PathBuf,
    namespace: String,
    config: LoaderConfig,
    resolver: Arc<dyn ComponentResolver>,
    registry: Registry,
    lazy_loaded: bool,
}

impl BaseRegistry {
    /// Create an empty registry for components under `directory`.
    pub fn new(
        directory: impl Into<PathBuf>,
        namespace: impl Into<String>,
        config: LoaderConfig,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Self {
        Self {
            directory: directory.into(),
            namespace: namespace.into(),
            config,
            resolver,
            registry: Registry::default(),
            lazy_loaded: false,
        }
    }

    /// Root directory components are resolved against.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Namespace qualifying component names.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Include/exclude configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Everything recorded so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether the registry was populated from a lazy manifest.
    pub fn is_lazy_loaded(&self) -> bool {
        self.lazy_loaded
    }

    /// Whether this is the custom namespace.
    pub fn is_custom(&self) -> bool {
        self.namespace == CUSTOM_NAMESPACE
    }

    /// `<namespace>.<name>`.
    pub fn qualified_name(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Resolve a path against the loader directory. Absolute paths are
    /// returned unchanged.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.directory.join(path)
    }

    /// Whether the include/exclude lists admit `name`.
    pub fn accepts(&self, name: &str) -> bool {
        self.config.accepts(&self.namespace, name)
    }

    /// Clear every collection and the lazy flag.
    pub fn reset(&mut self) {
        self.registry = Registry::default();
        self.lazy_loaded = false;
    }

    /// Resolve a node file and record it.
    ///
    /// Filtered-out nodes are skipped silently. A node already recorded
    /// under the same name is replaced.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::ClassNotFound`] if the file does not export its class.
    /// - [`LoaderError::RetiredEntryPoint`] if any variant of a versioned node
    ///   still implements a retired entry point.
    /// - [`LoaderError::Node`] if the current version cannot be resolved.
    /// - [`LoaderError::Resolve`] for any other resolver failure.
    pub async fn load_node_file(&mut self, path: &Path) -> Result<(), LoaderError> {
        let class_name = class_name_of(path);
        let node_type = self
            .resolver
            .resolve_node(path, &class_name)
            .map_err(|e| resolve_error(e, path, &class_name))?;

        let name = node_type.name().to_owned();
        if !self.accepts(&name) {
            tracing::debug!(node = %self.qualified_name(&name), "node filtered out");
            return Ok(());
        }

        if let Some((version, entry_point)) = node_type.retired_variant() {
            return Err(LoaderError::RetiredEntryPoint {
                node: name,
                version,
                entry_point,
            });
        }

        let current = node_type.get(None)?;
        let version = node_type.current_version()?;

        let declared = node_type
            .description()
            .codex
            .as_ref()
            .or(current.description().codex.as_ref());
        let codex = CodexEnricher::new(self.is_custom())
            .resolve(declared, path)
            .await;

        let icons = IconPathResolver::new(&self.directory, &self.namespace);
        let descriptors: Vec<NodeDescription> = node_type
            .variants()
            .iter()
            .map(|variant| {
                let mut description = variant.description().clone();
                description.name.clone_from(&name);
                description.codex.clone_from(&codex);
                icons.normalize_node(&mut description, path);
                description
            })
            .collect();

        let mut credentials: Vec<String> = Vec::new();
        for description in &descriptors {
            for credential in description.credential_names() {
                if !credentials.iter().any(|c| c == credential) {
                    credentials.push(credential.to_owned());
                }
            }
        }

        if self.registry.node_types.contains_key(&name) {
            tracing::debug!(node = %self.qualified_name(&name), "replacing recorded node");
            self.registry.forget_node(&name);
        }

        self.registry.known.nodes.insert(
            name.clone(),
            crate::KnownEntry::new(class_name, path),
        );
        self.registry.types.nodes.extend(descriptors);
        self.registry.node_types.insert(
            name.clone(),
            NodeRecord {
                name: name.clone(),
                source_path: path.to_path_buf(),
                instance: Some(node_type),
            },
        );
        self.registry.loaded_nodes.push(LoadedNode {
            name: name.clone(),
            version,
        });
        for credential in &credentials {
            self.registry.link(credential, &name);
        }

        tracing::debug!(
            node = %self.qualified_name(&name),
            version,
            credentials = credentials.len(),
            "node recorded"
        );
        Ok(())
    }

    /// Resolve a credential file and record it.
    ///
    /// Filtered-out credentials are skipped silently. Nodes recorded
    /// earlier that declare this credential become its supporting nodes.
    ///
    /// # Errors
    ///
    /// [`LoaderError::ClassNotFound`] or [`LoaderError::Resolve`] from the
    /// resolver.
    pub async fn load_credential_file(&mut self, path: &Path) -> Result<(), LoaderError> {
        let class_name = class_name_of(path);
        let credential = self
            .resolver
            .resolve_credential(path, &class_name)
            .map_err(|e| resolve_error(e, path, &class_name))?;

        let name = credential.name().to_owned();
        if !self.accepts(&name) {
            tracing::debug!(credential = %self.qualified_name(&name), "credential filtered out");
            return Ok(());
        }

        let mut description = credential.description().clone();
        IconPathResolver::new(&self.directory, &self.namespace)
            .normalize_credential(&mut description, path);

        let supported_by = self.registry.nodes_for_credential(&name).to_vec();
        let extends = description.extends.clone();

        self.registry.forget_credential(&name);
        self.registry.known.credentials.insert(
            name.clone(),
            crate::KnownEntry {
                class_name,
                source_path: path.to_path_buf(),
                extends: (!extends.is_empty()).then(|| extends.clone()),
                supported_nodes: (!supported_by.is_empty()).then(|| supported_by.clone()),
            },
        );
        self.registry.types.credentials.push(description);
        self.registry.credential_types.insert(
            name.clone(),
            CredentialRecord {
                name: name.clone(),
                source_path: path.to_path_buf(),
                instance: Some(credential),
                extends,
                supported_by,
            },
        );

        tracing::debug!(credential = %self.qualified_name(&name), "credential recorded");
        Ok(())
    }

    /// The live node named `name`, resolving it from the known-index on
    /// first access in lazy mode.
    ///
    /// # Errors
    ///
    /// [`LoaderError::UnknownNode`] if the name was never recorded, or a
    /// resolver error.
    pub fn get_node(&mut self, name: &str) -> Result<NodeType, LoaderError> {
        if let Some(record) = self.registry.node_types.get(name)
            && let Some(instance) = &record.instance
        {
            return Ok(instance.clone());
        }

        let entry = self
            .registry
            .known
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::UnknownNode(self.qualified_name(name)))?;
        let path = self.resolve_path(&entry.source_path);
        let node_type = self
            .resolver
            .resolve_node(&path, &entry.class_name)
            .map_err(|e| resolve_error(e, &path, &entry.class_name))?;

        let record = self
            .registry
            .node_types
            .entry(name.to_owned())
            .or_insert_with(|| NodeRecord {
                name: name.to_owned(),
                source_path: path.clone(),
                instance: None,
            });
        record.instance = Some(node_type.clone());
        tracing::debug!(node = %self.qualified_name(name), "node materialized");
        Ok(node_type)
    }

    /// The live credential named `name`, resolving it from the
    /// known-index on first access in lazy mode.
    ///
    /// # Errors
    ///
    /// [`LoaderError::UnknownCredential`] if the name was never recorded,
    /// or a resolver error.
    pub fn get_credential(&mut self, name: &str) -> Result<Arc<dyn Credential>, LoaderError> {
        if let Some(record) = self.registry.credential_types.get(name)
            && let Some(instance) = &record.instance
        {
            return Ok(Arc::clone(instance));
        }

        let entry = self
            .registry
            .known
            .credentials
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::UnknownCredential(self.qualified_name(name)))?;
        let path = self.resolve_path(&entry.source_path);
        let credential = self
            .resolver
            .resolve_credential(&path, &entry.class_name)
            .map_err(|e| resolve_error(e, &path, &entry.class_name))?;

        let record = self
            .registry
            .credential_types
            .entry(name.to_owned())
            .or_insert_with(|| CredentialRecord {
                name: name.to_owned(),
                source_path: path.clone(),
                instance: None,
                extends: entry.extends.clone().unwrap_or_default(),
                supported_by: entry.supported_nodes.clone().unwrap_or_default(),
            });
        record.instance = Some(Arc::clone(&credential));
        tracing::debug!(credential = %self.qualified_name(name), "credential materialized");
        Ok(credential)
    }

    /// Record a precomputed known-index and descriptors without
    /// instantiating anything, and mark the registry lazily loaded.
    ///
    /// Entries rejected by the include/exclude lists are dropped first.
    /// The reverse index is derived from the node descriptors.
    pub(crate) fn record_declared(&mut self, mut known: Known, mut types: Types) {
        if self.config.is_filtering() {
            known.nodes.retain(|name, _| self.accepts(name));
            known.credentials.retain(|name, _| self.accepts(name));
            types.nodes.retain(|d| self.accepts(&d.name));
            types.credentials.retain(|d| self.accepts(&d.name));

            for entry in known.credentials.values_mut() {
                if let Some(nodes) = entry.supported_nodes.as_mut() {
                    nodes.retain(|n| known.nodes.contains_key(n));
                    if nodes.is_empty() {
                        entry.supported_nodes = None;
                    }
                }
            }
        }

        for (name, entry) in &known.nodes {
            self.registry.node_types.insert(
                name.clone(),
                NodeRecord {
                    name: name.clone(),
                    source_path: self.resolve_path(&entry.source_path),
                    instance: None,
                },
            );
        }
        for (name, entry) in &known.credentials {
            self.registry.credential_types.insert(
                name.clone(),
                CredentialRecord {
                    name: name.clone(),
                    source_path: self.resolve_path(&entry.source_path),
                    instance: None,
                    extends: entry.extends.clone().unwrap_or_default(),
                    supported_by: entry.supported_nodes.clone().unwrap_or_default(),
                },
            );
        }

        self.registry.known.nodes.extend(known.nodes);
        self.registry.known.credentials.extend(known.credentials);

        for description in &types.nodes {
            for credential in description.credential_names() {
                self.registry.link(credential, &description.name);
            }
        }
        self.registry.types.nodes.extend(types.nodes);
        self.registry.types.credentials.extend(types.credentials);

        self.lazy_loaded = true;
    }
}

impl std::fmt::Debug for BaseRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseRegistry")
            .field("directory", &self.directory)
            .field("namespace", &self.namespace)
            .field("config", &self.config)
            .field("nodes", &self.registry.node_types.len())
            .field("credentials", &self.registry.credential_types.len())
            .field("lazy_loaded", &self.lazy_loaded)
            .finish_non_exhaustive()
    }
}

/// Class name exported by a component file: the file name up to the
/// first `.`.
pub fn class_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_owned))
        .unwrap_or_default()
}

fn resolve_error(error: ResolveError, path: &Path, class_name: &str) -> LoaderError {
    match error {
        ResolveError::SymbolNotFound(_) => LoaderError::ClassNotFound {
            class_name: class_name.to_owned(),
            path: path.to_path_buf(),
        },
        ResolveError::Failed(source) => LoaderError::Resolve {
            path: path.to_path_buf(),
            source,
        },
    }
}

//! Multi-version node container.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::NodeDescription;
use crate::NodeError;
use crate::node::Node;

/// A node exposed through several version variants, keyed by `u32`.
///
/// The container carries a base description (name, display name, icon,
/// codex, optional default version) shared by every variant. One variant may
/// serve several versions when its description declares a version list.
///
/// ```
/// use nebula_node::{Node, NodeDescription, NodeVersions};
///
/// #[derive(Debug)]
/// struct Slack(NodeDescription);
/// impl Node for Slack {
///     fn description(&self) -> &NodeDescription { &self.0 }
/// }
///
/// let base = NodeDescription::builder("slack", "Slack").build().unwrap();
/// let v1 = NodeDescription::builder("slack", "Slack").version(1).build().unwrap();
/// let v2 = NodeDescription::builder("slack", "Slack").versions(vec![2, 3]).build().unwrap();
///
/// let mut versions = NodeVersions::new(base);
/// versions.add(Slack(v1)).unwrap().add(Slack(v2)).unwrap();
///
/// assert_eq!(versions.version_numbers(), vec![1, 2, 3]);
/// assert_eq!(versions.current_version().unwrap(), 3);
/// assert_eq!(versions.variants().len(), 2);
/// ```
#[derive(Clone)]
pub struct NodeVersions {
    base: NodeDescription,
    versions: BTreeMap<u32, Arc<dyn Node>>,
}

impl NodeVersions {
    /// Create an empty container around a base description.
    pub fn new(base: NodeDescription) -> Self {
        Self {
            base,
            versions: BTreeMap::new(),
        }
    }

    /// Add a variant under every version its description declares.
    /// Returns `&mut Self` for chaining.
    ///
    /// # Errors
    ///
    /// - [`NodeError::NameMismatch`] if the variant's name differs from the base name.
    /// - [`NodeError::VersionAlreadyExists`] if any declared version is already present.
    pub fn add<N: Node + 'static>(&mut self, node: N) -> Result<&mut Self, NodeError> {
        self.add_shared(Arc::new(node))
    }

    /// Like [`add`](Self::add) for an already shared variant.
    pub fn add_shared(&mut self, node: Arc<dyn Node>) -> Result<&mut Self, NodeError> {
        if node.name() != self.base.name {
            return Err(NodeError::NameMismatch {
                variant_name: node.name().to_owned(),
                container_name: self.base.name.clone(),
            });
        }

        let declared = node.description().version.versions();
        if let Some(&version) = declared.iter().find(|v| self.versions.contains_key(v)) {
            return Err(NodeError::VersionAlreadyExists {
                version,
                name: self.base.name.clone(),
            });
        }

        for version in declared {
            self.versions.insert(version, Arc::clone(&node));
        }
        Ok(self)
    }

    /// The shared base description.
    pub fn base(&self) -> &NodeDescription {
        &self.base
    }

    /// The node name (from the base description).
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// The explicit default version, if the base declares one.
    pub fn default_version(&self) -> Option<u32> {
        self.base.default_version
    }

    /// The version treated as current: the default version if declared,
    /// otherwise the highest version present.
    pub fn current_version(&self) -> Result<u32, NodeError> {
        if let Some(version) = self.default_version() {
            return Ok(version);
        }
        self.versions
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| NodeError::NoVersionsAvailable(self.base.name.clone()))
    }

    /// The current variant.
    pub fn current(&self) -> Result<Arc<dyn Node>, NodeError> {
        let version = self.current_version()?;
        self.versions
            .get(&version)
            .cloned()
            .ok_or_else(|| NodeError::DefaultVersionMissing {
                version,
                name: self.base.name.clone(),
            })
    }

    /// Get a specific version.
    pub fn get(&self, version: u32) -> Result<Arc<dyn Node>, NodeError> {
        self.versions
            .get(&version)
            .cloned()
            .ok_or_else(|| NodeError::VersionNotFound {
                version,
                name: self.base.name.clone(),
            })
    }

    /// Get the highest version present.
    pub fn latest(&self) -> Result<Arc<dyn Node>, NodeError> {
        self.versions
            .values()
            .next_back()
            .cloned()
            .ok_or_else(|| NodeError::NoVersionsAvailable(self.base.name.clone()))
    }

    /// Distinct variants, highest version first. A variant serving several
    /// versions appears once.
    pub fn variants(&self) -> Vec<Arc<dyn Node>> {
        let mut out: Vec<Arc<dyn Node>> = Vec::new();
        for node in self.versions.values().rev() {
            if !out
                .iter()
                .any(|seen| seen.description().version == node.description().version)
            {
                out.push(Arc::clone(node));
            }
        }
        out
    }

    /// All version numbers present, ascending.
    pub fn version_numbers(&self) -> Vec<u32> {
        self.versions.keys().copied().collect()
    }

    /// Number of versions stored.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl fmt::Debug for NodeVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeVersions")
            .field("name", &self.base.name)
            .field("default_version", &self.base.default_version)
            .field("versions", &self.version_numbers())
            .finish()
    }
}

//! Single node or versioned set.

use std::sync::Arc;

use crate::NodeDescription;
use crate::NodeError;
use crate::node::{EntryPoint, Node};
use crate::versions::NodeVersions;

/// Wraps either a single node implementation or a multi-version container.
#[derive(Clone)]
pub enum NodeType {
    /// A single, non-versioned node.
    Single(Arc<dyn Node>),
    /// Multiple versions of the same node.
    Versioned(NodeVersions),
}

impl NodeType {
    /// Wrap a single node.
    pub fn single<N: Node + 'static>(node: N) -> Self {
        Self::Single(Arc::new(node))
    }

    /// Wrap a versioned container.
    pub fn versioned(versions: NodeVersions) -> Self {
        Self::Versioned(versions)
    }

    /// The node type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Single(n) => n.name(),
            Self::Versioned(v) => v.name(),
        }
    }

    /// The top-level description: the node's own, or the versioned base.
    pub fn description(&self) -> &NodeDescription {
        match self {
            Self::Single(n) => n.description(),
            Self::Versioned(v) => v.base(),
        }
    }

    /// Whether this contains multiple versions.
    pub fn is_versioned(&self) -> bool {
        matches!(self, Self::Versioned(_))
    }

    /// The version recorded for this node: the current variant's version
    /// for versioned nodes, the highest declared version otherwise.
    pub fn current_version(&self) -> Result<u32, NodeError> {
        match self {
            Self::Single(n) => Ok(n.version()),
            Self::Versioned(v) => v.current_version(),
        }
    }

    /// Retrieve a node by version, or the current one if `version` is `None`.
    pub fn get(&self, version: Option<u32>) -> Result<Arc<dyn Node>, NodeError> {
        match self {
            Self::Single(node) => match version {
                Some(v) if !node.description().version.versions().contains(&v) => {
                    Err(NodeError::VersionNotFound {
                        version: v,
                        name: node.name().to_owned(),
                    })
                }
                _ => Ok(Arc::clone(node)),
            },
            Self::Versioned(v) => match version {
                Some(ver) => v.get(ver),
                None => v.current(),
            },
        }
    }

    /// Every distinct implementation, highest version first.
    pub fn variants(&self) -> Vec<Arc<dyn Node>> {
        match self {
            Self::Single(n) => vec![Arc::clone(n)],
            Self::Versioned(v) => v.variants(),
        }
    }

    /// All available version numbers, ascending.
    pub fn version_numbers(&self) -> Vec<u32> {
        match self {
            Self::Single(n) => {
                let mut versions = n.description().version.versions();
                versions.sort_unstable();
                versions
            }
            Self::Versioned(v) => v.version_numbers(),
        }
    }

    /// The first variant still exposing a retired entry point, with the
    /// entry point it exposes. Only versioned nodes are checked.
    pub fn retired_variant(&self) -> Option<(u32, EntryPoint)> {
        match self {
            Self::Single(_) => None,
            Self::Versioned(v) => v
                .variants()
                .into_iter()
                .find_map(|n| n.retired_entry_point().map(|e| (n.version(), e))),
        }
    }
}

impl std::fmt::Debug for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(n) => f.debug_tuple("Single").field(&n.name()).finish(),
            Self::Versioned(v) => f.debug_tuple("Versioned").field(v).finish(),
        }
    }
}

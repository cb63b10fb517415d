//! In-memory registry populated by loaders.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use nebula_node::{Credential, CredentialDescription, NodeDescription, NodeType};
use serde::{Deserialize, Serialize};

/// Where a component lives, without instantiating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownEntry {
    /// Exported class name.
    pub class_name: String,
    /// Component file, absolute or relative to the loader directory.
    pub source_path: PathBuf,
    /// Credentials this credential extends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,
    /// Nodes declaring this credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_nodes: Option<Vec<String>>,
}

impl KnownEntry {
    /// Entry without credential links.
    pub fn new(class_name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            class_name: class_name.into(),
            source_path: source_path.into(),
            extends: None,
            supported_nodes: None,
        }
    }
}

/// The known-index: name to location, per component kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Known {
    /// Nodes.
    pub nodes: IndexMap<String, KnownEntry>,
    /// Credentials.
    pub credentials: IndexMap<String, KnownEntry>,
}

/// Serializable descriptors, one per node variant and one per credential.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Types {
    /// Node descriptors.
    pub nodes: Vec<NodeDescription>,
    /// Credential descriptors.
    pub credentials: Vec<CredentialDescription>,
}

/// A node recorded by an eager load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedNode {
    /// Node type name.
    pub name: String,
    /// Current version.
    pub version: u32,
}

/// A recorded node. `instance` is `None` until materialized in lazy mode.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    /// Node type name.
    pub name: String,
    /// Component file.
    pub source_path: PathBuf,
    /// Live node, if instantiated.
    pub instance: Option<NodeType>,
}

/// A recorded credential. `instance` is `None` until materialized in lazy mode.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Credential type name.
    pub name: String,
    /// Component file.
    pub source_path: PathBuf,
    /// Live credential, if instantiated.
    pub instance: Option<Arc<dyn Credential>>,
    /// Credentials this one extends.
    pub extends: Vec<String>,
    /// Nodes declaring this credential.
    pub supported_by: Vec<String>,
}

/// Everything a loader discovered.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Known-index.
    pub known: Known,
    /// Descriptors.
    pub types: Types,
    /// Node records by name.
    pub node_types: IndexMap<String, NodeRecord>,
    /// Credential records by name.
    pub credential_types: IndexMap<String, CredentialRecord>,
    /// Credential name to the nodes declaring it, without duplicates.
    pub nodes_by_credential: IndexMap<String, Vec<String>>,
    /// Nodes recorded by eager loads, with their current version.
    pub loaded_nodes: Vec<LoadedNode>,
}

impl Registry {
    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.known.nodes.is_empty()
            && self.known.credentials.is_empty()
            && self.types.nodes.is_empty()
            && self.types.credentials.is_empty()
            && self.node_types.is_empty()
            && self.credential_types.is_empty()
            && self.nodes_by_credential.is_empty()
            && self.loaded_nodes.is_empty()
    }

    /// Nodes declaring `credential`.
    pub fn nodes_for_credential(&self, credential: &str) -> &[String] {
        self.nodes_by_credential
            .get(credential)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Record that `node` declares `credential`, in the reverse index and
    /// on the credential if it is already recorded.
    pub(crate) fn link(&mut self, credential: &str, node: &str) {
        push_unique(
            self.nodes_by_credential
                .entry(credential.to_owned())
                .or_default(),
            node,
        );
        if let Some(record) = self.credential_types.get_mut(credential) {
            push_unique(&mut record.supported_by, node);
        }
        if let Some(entry) = self.known.credentials.get_mut(credential) {
            push_unique(entry.supported_nodes.get_or_insert_with(Vec::new), node);
        }
    }

    /// Drop every trace of a node so it can be recorded again.
    pub(crate) fn forget_node(&mut self, name: &str) {
        self.known.nodes.shift_remove(name);
        self.node_types.shift_remove(name);
        self.types.nodes.retain(|d| d.name != name);
        self.loaded_nodes.retain(|n| n.name != name);
        for nodes in self.nodes_by_credential.values_mut() {
            nodes.retain(|n| n != name);
        }
        self.nodes_by_credential.retain(|_, nodes| !nodes.is_empty());
        for record in self.credential_types.values_mut() {
            record.supported_by.retain(|n| n != name);
        }
        for entry in self.known.credentials.values_mut() {
            if let Some(nodes) = entry.supported_nodes.as_mut() {
                nodes.retain(|n| n != name);
                if nodes.is_empty() {
                    entry.supported_nodes = None;
                }
            }
        }
    }

    /// Drop every trace of a credential so it can be recorded again.
    pub(crate) fn forget_credential(&mut self, name: &str) {
        self.known.credentials.shift_remove(name);
        self.credential_types.shift_remove(name);
        self.types.credentials.retain(|d| d.name != name);
    }

    /// Comparable view of the registry, without live instances.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            known: self.known.clone(),
            types: self.types.clone(),
            node_types: self
                .node_types
                .iter()
                .map(|(name, r)| {
                    let snapshot = RecordSnapshot {
                        source_path: r.source_path.clone(),
                        materialized: r.instance.is_some(),
                        extends: Vec::new(),
                        supported_by: Vec::new(),
                    };
                    (name.clone(), snapshot)
                })
                .collect(),
            credential_types: self
                .credential_types
                .iter()
                .map(|(name, r)| {
                    let snapshot = RecordSnapshot {
                        source_path: r.source_path.clone(),
                        materialized: r.instance.is_some(),
                        extends: r.extends.clone(),
                        supported_by: r.supported_by.clone(),
                    };
                    (name.clone(), snapshot)
                })
                .collect(),
            nodes_by_credential: self.nodes_by_credential.clone(),
            loaded_nodes: self.loaded_nodes.clone(),
        }
    }
}

/// A [`Registry`] without live instances; comparable and serializable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    /// Known-index.
    pub known: Known,
    /// Descriptors.
    pub types: Types,
    /// Node records.
    pub node_types: IndexMap<String, RecordSnapshot>,
    /// Credential records.
    pub credential_types: IndexMap<String, RecordSnapshot>,
    /// Reverse index.
    pub nodes_by_credential: IndexMap<String, Vec<String>>,
    /// Eagerly loaded nodes.
    pub loaded_nodes: Vec<LoadedNode>,
}

/// One record inside a [`RegistrySnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    /// Component file.
    pub source_path: PathBuf,
    /// Whether the record held a live instance.
    pub materialized: bool,
    /// Extended credentials (credentials only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    /// Declaring nodes (credentials only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported_by: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn credential_record(name: &str) -> CredentialRecord {
        CredentialRecord {
            name: name.into(),
            source_path: PathBuf::from(format!("{name}.credentials.wasm")),
            instance: None,
            extends: Vec::new(),
            supported_by: Vec::new(),
        }
    }

    #[test]
    fn link_is_deduplicated() {
        let mut registry = Registry::default();
        registry.link("cred", "a");
        registry.link("cred", "a");
        registry.link("cred", "b");
        assert_eq!(registry.nodes_for_credential("cred"), ["a", "b"]);
        assert!(registry.nodes_for_credential("other").is_empty());
    }

    #[test]
    fn link_updates_recorded_credential() {
        let mut registry = Registry::default();
        registry
            .credential_types
            .insert("cred".into(), credential_record("cred"));
        registry
            .known
            .credentials
            .insert("cred".into(), KnownEntry::new("Cred", "Cred.credentials.wasm"));

        registry.link("cred", "a");

        assert_eq!(registry.credential_types["cred"].supported_by, ["a"]);
        assert_eq!(
            registry.known.credentials["cred"].supported_nodes,
            Some(vec!["a".to_owned()])
        );
    }

    #[test]
    fn forget_node_removes_links() {
        let mut registry = Registry::default();
        registry
            .credential_types
            .insert("cred".into(), credential_record("cred"));
        registry.link("cred", "a");
        registry.loaded_nodes.push(LoadedNode {
            name: "a".into(),
            version: 1,
        });

        registry.forget_node("a");

        assert!(registry.nodes_by_credential.is_empty());
        assert!(registry.loaded_nodes.is_empty());
        assert!(registry.credential_types["cred"].supported_by.is_empty());
    }

    #[test]
    fn known_entry_serde_shape() {
        let entry: KnownEntry = serde_json::from_value(json!({
            "className": "Slack",
            "sourcePath": "dist/nodes/Slack.node.wasm",
        }))
        .unwrap();
        assert_eq!(entry, KnownEntry::new("Slack", "dist/nodes/Slack.node.wasm"));

        let value = serde_json::to_value(KnownEntry {
            supported_nodes: Some(vec!["slack".into()]),
            ..entry
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "className": "Slack",
                "sourcePath": "dist/nodes/Slack.node.wasm",
                "supportedNodes": ["slack"],
            })
        );
    }

    #[test]
    fn empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.snapshot(), Registry::default().snapshot());
    }
}

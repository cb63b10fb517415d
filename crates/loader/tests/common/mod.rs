//! Shared fixtures for loader integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nebula_loader::{Known, StaticResolver, Types};
use nebula_node::{
    Codex, Credential, CredentialDescription, CredentialReference, EntryPoint, Node,
    NodeDescription, NodeType, NodeVersions,
};
use serde_json::json;

/// Minimal node implementation.
#[derive(Debug)]
pub struct StubNode {
    pub description: NodeDescription,
    pub entry_points: Vec<EntryPoint>,
}

impl Node for StubNode {
    fn description(&self) -> &NodeDescription {
        &self.description
    }

    fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }
}

impl StubNode {
    pub fn new(description: NodeDescription) -> Self {
        Self {
            description,
            entry_points: vec![EntryPoint::Execute],
        }
    }
}

/// Minimal credential implementation.
#[derive(Debug)]
pub struct StubCredential(pub CredentialDescription);

impl Credential for StubCredential {
    fn description(&self) -> &CredentialDescription {
        &self.0
    }
}

pub fn node1() -> NodeType {
    NodeType::single(StubNode::new(
        NodeDescription::builder("node1", "Node 1")
            .icon("file:node1.svg")
            .credential(CredentialReference::required("credential1"))
            .build()
            .unwrap(),
    ))
}

pub fn node2() -> NodeType {
    NodeType::single(StubNode::new(
        NodeDescription::builder("node2", "Node 2")
            .versions(vec![1, 2])
            .icon("file:node2.svg")
            .codex(Codex::with_category("Utility"))
            .build()
            .unwrap(),
    ))
}

pub fn credential1() -> Arc<dyn Credential> {
    Arc::new(StubCredential(
        CredentialDescription::new("credential1", "Credential 1").with_icon("file:credential1.svg"),
    ))
}

/// Versioned node whose oldest variant still implements `executeSingle`.
pub fn legacy() -> NodeType {
    let base = NodeDescription::builder("legacy", "Legacy").build().unwrap();
    let mut versions = NodeVersions::new(base);
    versions
        .add(StubNode {
            description: NodeDescription::builder("legacy", "Legacy")
                .version(1)
                .build()
                .unwrap(),
            entry_points: vec![EntryPoint::ExecuteSingle],
        })
        .unwrap()
        .add(StubNode::new(
            NodeDescription::builder("legacy", "Legacy")
                .version(2)
                .build()
                .unwrap(),
        ))
        .unwrap();
    NodeType::versioned(versions)
}

/// Resolver knowing `Node1`, `Node2`, `Legacy` and `Credential1`.
pub fn resolver() -> Arc<StaticResolver> {
    Arc::new(
        StaticResolver::new()
            .with_node("Node1", node1)
            .with_node("Node2", node2)
            .with_node("Legacy", legacy)
            .with_credential("Credential1", credential1),
    )
}

/// Create an empty file (and its parents).
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"").unwrap();
    path
}

/// Write a JSON value to `root/relative` (and its parents).
pub fn write_json(root: &Path, relative: &str, value: &serde_json::Value) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

/// Custom directory with `node1/Node1`, `node2/Node2` and `credentials/Credential1`.
pub fn custom_directory() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "node1/Node1.node.wasm");
    touch(dir.path(), "node2/Node2.node.wasm");
    touch(dir.path(), "credentials/Credential1.credentials.wasm");
    dir
}

pub const NODE1_FILE: &str = "dist/nodes/Node1/Node1.node.wasm";
pub const NODE2_FILE: &str = "dist/nodes/Node2/Node2.node.wasm";
pub const CREDENTIAL1_FILE: &str = "dist/credentials/Credential1.credentials.wasm";

/// Package `acme` listing both nodes and the credential.
pub fn package_directory() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "package.json",
        &json!({
            "name": "acme",
            "version": "1.0.0",
            "nebula": {
                "nodes": [NODE1_FILE, NODE2_FILE],
                "credentials": [CREDENTIAL1_FILE],
            },
        }),
    );
    touch(dir.path(), NODE1_FILE);
    touch(dir.path(), NODE2_FILE);
    touch(dir.path(), CREDENTIAL1_FILE);
    dir
}

/// Write the four lazy artifacts.
pub fn write_artifacts(root: &Path, known: &Known, types: &Types) {
    write_json(
        root,
        nebula_loader::KNOWN_NODES,
        &serde_json::to_value(&known.nodes).unwrap(),
    );
    write_json(
        root,
        nebula_loader::KNOWN_CREDENTIALS,
        &serde_json::to_value(&known.credentials).unwrap(),
    );
    write_json(
        root,
        nebula_loader::NODE_TYPES,
        &serde_json::to_value(&types.nodes).unwrap(),
    );
    write_json(
        root,
        nebula_loader::CREDENTIAL_TYPES,
        &serde_json::to_value(&types.credentials).unwrap(),
    );
}

/// Hand-written artifacts for the `acme` package with relative source paths.
pub fn acme_artifacts() -> (Known, Types) {
    let known = json!({
        "nodes": {
            "node1": {"className": "Node1", "sourcePath": NODE1_FILE},
            "node2": {"className": "Node2", "sourcePath": NODE2_FILE},
        },
        "credentials": {
            "credential1": {
                "className": "Credential1",
                "sourcePath": CREDENTIAL1_FILE,
                "supportedNodes": ["node1"],
            },
        },
    });
    let types = json!({
        "nodes": [
            {
                "name": "node1",
                "displayName": "Node 1",
                "iconUrl": "icons/acme/dist/nodes/Node1/node1.svg",
                "credentials": [{"name": "credential1", "required": true}],
            },
            {"name": "node2", "displayName": "Node 2", "version": [1, 2]},
        ],
        "credentials": [
            {"name": "credential1", "displayName": "Credential 1"},
        ],
    });
    (
        serde_json::from_value(known).unwrap(),
        serde_json::from_value(types).unwrap(),
    )
}

//! Integration tests for lazy discovery and its eager fallback.

mod common;

use std::sync::Arc;

use common::*;
use nebula_loader::{
    ComponentLoader, CREDENTIAL_TYPES, KNOWN_CREDENTIALS, KNOWN_NODES, LazyManifestLoader,
    LoaderConfig, LoaderError, ManifestPackageLoader, NODE_TYPES, StaticResolver,
};
use nebula_node::QualifiedName;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn q(s: &str) -> QualifiedName {
    s.parse().unwrap()
}

async fn eager_snapshot(dir: &std::path::Path) -> nebula_loader::RegistrySnapshot {
    eager_snapshot_with(dir, LoaderConfig::new()).await
}

async fn eager_snapshot_with(
    dir: &std::path::Path,
    config: LoaderConfig,
) -> nebula_loader::RegistrySnapshot {
    let mut loader = ManifestPackageLoader::open(dir, config, resolver())
        .await
        .unwrap();
    loader.load_all().await.unwrap();
    loader.registry().snapshot()
}

async fn lazy_snapshot_with(
    dir: &std::path::Path,
    config: LoaderConfig,
) -> nebula_loader::RegistrySnapshot {
    let mut loader = LazyManifestLoader::open(dir, config, resolver())
        .await
        .unwrap();
    loader.load_all().await.unwrap();
    assert!(loader.is_lazy_loaded());
    loader.registry().snapshot()
}

#[tokio::test]
async fn valid_artifacts_load_without_instantiating() {
    // GIVEN: a package with all four artifacts
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    let resolver = resolver();

    // WHEN
    let mut loader = LazyManifestLoader::open(dir.path(), LoaderConfig::new(), resolver.clone())
        .await
        .unwrap();
    loader.load_all().await.unwrap();

    // THEN: nothing was resolved, records are declared only
    assert_eq!(resolver.instantiations(), 0);
    assert!(loader.is_lazy_loaded());

    let registry = loader.registry();
    assert_eq!(registry.known, known);
    assert_eq!(registry.types, types);
    assert!(registry.loaded_nodes.is_empty());
    assert!(registry.node_types.values().all(|r| r.instance.is_none()));
    assert_eq!(
        registry.node_types["node1"].source_path,
        dir.path().join(NODE1_FILE)
    );
    assert_eq!(registry.nodes_for_credential("credential1"), ["node1"]);
    assert_eq!(registry.credential_types["credential1"].supported_by, ["node1"]);
}

#[tokio::test]
async fn get_node_materializes_once() {
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    let resolver = resolver();
    let mut loader = LazyManifestLoader::open(dir.path(), LoaderConfig::new(), resolver.clone())
        .await
        .unwrap();
    loader.load_all().await.unwrap();

    let node = loader.get_node("node2").unwrap();
    assert_eq!(node.name(), "node2");
    assert_eq!(node.current_version().unwrap(), 2);
    assert_eq!(resolver.instantiations(), 1);

    loader.get_node("node2").unwrap();
    assert_eq!(resolver.instantiations(), 1);
    assert!(loader.registry().node_types["node2"].instance.is_some());
    assert!(loader.registry().node_types["node1"].instance.is_none());

    let credential = loader.get_credential("credential1").unwrap();
    assert_eq!(credential.name(), "credential1");
    assert_eq!(resolver.instantiations(), 2);

    assert!(matches!(
        loader.get_node("missing"),
        Err(LoaderError::UnknownNode(ref name)) if name == "acme.missing"
    ));
}

#[tokio::test]
async fn artifacts_from_an_eager_run_round_trip() {
    // GIVEN: artifacts written from an eager load (absolute source paths)
    let dir = package_directory();
    let mut eager = ManifestPackageLoader::open(dir.path(), LoaderConfig::new(), resolver())
        .await
        .unwrap();
    eager.load_all().await.unwrap();
    let expected = eager.registry().clone();
    write_artifacts(dir.path(), &expected.known, &expected.types);

    // WHEN
    let mut lazy = LazyManifestLoader::open(dir.path(), LoaderConfig::new(), resolver())
        .await
        .unwrap();
    lazy.load_all().await.unwrap();

    // THEN: same identities, descriptors and reverse index
    assert!(lazy.is_lazy_loaded());
    let registry = lazy.registry();
    assert_eq!(registry.known, expected.known);
    assert_eq!(registry.types, expected.types);
    assert_eq!(registry.nodes_by_credential, expected.nodes_by_credential);
    assert!(lazy.get_node("node1").is_ok());
}

#[rstest]
#[case::known_nodes(KNOWN_NODES)]
#[case::known_credentials(KNOWN_CREDENTIALS)]
#[case::node_types(NODE_TYPES)]
#[case::credential_types(CREDENTIAL_TYPES)]
#[tokio::test]
async fn missing_artifact_falls_back_to_eager(#[case] missing: &str) {
    // GIVEN: three of four artifacts
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    std::fs::remove_file(dir.path().join(missing)).unwrap();
    let resolver = resolver();

    // WHEN
    let mut loader = LazyManifestLoader::open(dir.path(), LoaderConfig::new(), resolver.clone())
        .await
        .unwrap();
    loader.load_all().await.unwrap();

    // THEN: eager result, nothing kept from the readable artifacts
    assert!(!loader.is_lazy_loaded());
    assert_eq!(resolver.instantiations(), 3);
    assert_eq!(loader.registry().snapshot(), eager_snapshot(dir.path()).await);
}

#[rstest]
#[case::corrupt_json(KNOWN_NODES, "{ not json")]
#[case::wrong_shape(NODE_TYPES, r#"{"name": "node1"}"#)]
#[case::empty_class_name(KNOWN_CREDENTIALS, r#"{"credential1": {"className": "", "sourcePath": "x"}}"#)]
#[case::undeclared_node(NODE_TYPES, r#"[{"name": "ghost"}]"#)]
#[tokio::test]
async fn invalid_artifact_falls_back_to_eager(#[case] artifact: &str, #[case] contents: &str) {
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    std::fs::write(dir.path().join(artifact), contents).unwrap();

    let mut loader = LazyManifestLoader::open(dir.path(), LoaderConfig::new(), resolver())
        .await
        .unwrap();
    loader.load_all().await.unwrap();

    assert!(!loader.is_lazy_loaded());
    assert_eq!(loader.registry().snapshot(), eager_snapshot(dir.path()).await);
}

#[tokio::test]
async fn filters_apply_to_declared_entries() {
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    let config = LoaderConfig::new()
        .exclude(q("acme.node1"))
        .exclude(q("acme.credential1"));

    let mut loader = LazyManifestLoader::open(dir.path(), config, resolver())
        .await
        .unwrap();
    loader.load_all().await.unwrap();

    let registry = loader.registry();
    assert_eq!(registry.known.nodes.keys().collect::<Vec<_>>(), ["node2"]);
    assert!(registry.known.credentials.is_empty());
    assert_eq!(
        registry.types.nodes.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        ["node2"]
    );
    assert!(registry.types.credentials.is_empty());
    assert!(registry.nodes_by_credential.is_empty());
}

#[tokio::test]
async fn excluded_node_leaves_no_credential_links() {
    // GIVEN: node1 excluded, credential1 kept
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    let config = LoaderConfig::new().exclude(q("acme.node1"));

    // WHEN
    let lazy = lazy_snapshot_with(dir.path(), config.clone()).await;
    let eager = eager_snapshot_with(dir.path(), config).await;

    // THEN: both strategies agree that nothing declares credential1
    assert!(lazy.nodes_by_credential.is_empty());
    assert!(lazy.credential_types["credential1"].supported_by.is_empty());
    assert_eq!(lazy.known.credentials["credential1"].supported_nodes, None);
    assert_eq!(
        lazy.credential_types["credential1"].supported_by,
        eager.credential_types["credential1"].supported_by
    );
    assert_eq!(
        lazy.known.credentials["credential1"].supported_nodes,
        eager.known.credentials["credential1"].supported_nodes
    );
    assert_eq!(lazy.nodes_by_credential, eager.nodes_by_credential);
}

#[tokio::test]
async fn include_filter_keeps_one_declared_node() {
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);

    let registry = lazy_snapshot_with(dir.path(), LoaderConfig::new().include(q("acme.node1"))).await;

    assert_eq!(registry.node_types.keys().collect::<Vec<_>>(), ["node1"]);
    assert!(registry.credential_types.is_empty());
    assert_eq!(
        registry.types.nodes.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        ["node1"]
    );
    // the reverse index still reflects what node1 declares
    assert_eq!(registry.nodes_by_credential["credential1"], ["node1"]);
}

#[tokio::test]
async fn exclude_wins_over_include_for_declared_nodes() {
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    let config = LoaderConfig::new()
        .include(q("acme.node1"))
        .include(q("acme.node2"))
        .exclude(q("acme.node1"));

    let registry = lazy_snapshot_with(dir.path(), config).await;

    assert_eq!(registry.node_types.keys().collect::<Vec<_>>(), ["node2"]);
    assert!(registry.credential_types.is_empty());
    assert!(registry.nodes_by_credential.is_empty());
}

#[tokio::test]
async fn reset_clears_lazy_flag_and_allows_reload() {
    let dir = package_directory();
    let (known, types) = acme_artifacts();
    write_artifacts(dir.path(), &known, &types);
    let mut loader = LazyManifestLoader::open(dir.path(), LoaderConfig::new(), resolver())
        .await
        .unwrap();
    loader.load_all().await.unwrap();
    let first = loader.registry().snapshot();

    loader.reset();
    assert!(!loader.is_lazy_loaded());
    assert!(loader.registry().is_empty());

    loader.load_all().await.unwrap();
    assert!(loader.is_lazy_loaded());
    assert_eq!(loader.registry().snapshot(), first);
}

#[tokio::test]
async fn fallback_without_capability_block_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "package.json", &serde_json::json!({"name": "plain"}));

    let mut loader = LazyManifestLoader::open(
        dir.path(),
        LoaderConfig::new(),
        Arc::new(StaticResolver::new()),
    )
    .await
    .unwrap();
    loader.load_all().await.unwrap();

    assert_eq!(loader.descriptor().name, "plain");
    assert!(!loader.is_lazy_loaded());
    assert!(loader.registry().is_empty());
}

//! # Nebula Loader
//!
//! Discovers node and credential components and records them in an
//! in-memory registry.
//!
//! Three strategies share one per-file pipeline ([`BaseRegistry`]):
//!
//! - [`DirectoryScanLoader`]: every component file under a custom
//!   directory, instantiated now, in the `CUSTOM` namespace;
//! - [`ManifestPackageLoader`]: the files a package lists in its
//!   `package.json`, instantiated now;
//! - [`LazyManifestLoader`]: precomputed `dist/known` and `dist/types`
//!   artifacts, instantiated on first access, falling back to the eager
//!   package strategy when the artifacts are unusable.
//!
//! Turning a file into a live component is delegated to a
//! [`ComponentResolver`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use nebula_loader::{ComponentLoader, LazyManifestLoader, LoaderConfig, StaticResolver};
//!
//! # async fn run() -> Result<(), nebula_loader::LoaderError> {
//! let resolver = Arc::new(StaticResolver::new());
//! let mut loader =
//!     LazyManifestLoader::open("/opt/nebula/packages/acme", LoaderConfig::from_env()?, resolver)
//!         .await?;
//! loader.load_all().await?;
//! for (credential, nodes) in &loader.registry().nodes_by_credential {
//!     println!("{credential}: {nodes:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod base;
mod codex;
mod config;
mod directory;
mod error;
mod icon;
mod lazy;
mod loader;
mod manifest;
mod package;
mod registry;
mod resolver;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use base::{BaseRegistry, CUSTOM_NAMESPACE, class_name_of};
pub use codex::{CUSTOM_NODES_CATEGORY, CodexEnricher};
pub use config::{EXCLUDE_ENV, INCLUDE_ENV, LoaderConfig};
pub use directory::{CREDENTIAL_FILE_SUFFIX, DirectoryScanLoader, NODE_FILE_SUFFIX, scan};
pub use error::{ArtifactError, BoxError, ErrorKind, LoaderError};
pub use icon::IconPathResolver;
pub use lazy::LazyManifestLoader;
pub use loader::ComponentLoader;
pub use manifest::{
    CREDENTIAL_TYPES, CapabilityBlock, KNOWN_CREDENTIALS, KNOWN_NODES, LazyArtifacts, NODE_TYPES,
    PACKAGE_DESCRIPTOR, PackageDescriptor,
};
pub use package::ManifestPackageLoader;
pub use registry::{
    CredentialRecord, Known, KnownEntry, LoadedNode, NodeRecord, RecordSnapshot, Registry,
    RegistrySnapshot, Types,
};
pub use resolver::{ComponentResolver, ResolveError, StaticResolver};

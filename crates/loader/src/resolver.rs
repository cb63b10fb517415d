//! Turning component files into live instances.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nebula_node::{Credential, NodeType};

use crate::error::BoxError;

/// Resolver failure.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The file exists but does not export the expected symbol.
    #[error("symbol '{0}' not found")]
    SymbolNotFound(String),
    /// Anything else; propagated to the caller unchanged.
    #[error(transparent)]
    Failed(BoxError),
}

/// Instantiates the component a file exports under a class name.
///
/// Loaders derive the class name from the file name and call the resolver
/// once per recorded component, or once per `get_*` call in lazy mode.
/// Object-safe; loaders hold it as `Arc<dyn ComponentResolver>`.
pub trait ComponentResolver: Send + Sync {
    /// Resolve the node exported by `path` as `class_name`.
    fn resolve_node(&self, path: &Path, class_name: &str) -> Result<NodeType, ResolveError>;

    /// Resolve the credential exported by `path` as `class_name`.
    fn resolve_credential(
        &self,
        path: &Path,
        class_name: &str,
    ) -> Result<Arc<dyn Credential>, ResolveError>;
}

type NodeFactory = Arc<dyn Fn() -> NodeType + Send + Sync>;
type CredentialFactory = Arc<dyn Fn() -> Arc<dyn Credential> + Send + Sync>;

/// Resolver backed by in-process factories keyed by class name.
///
/// The file path is ignored: any file whose class name has a factory
/// resolves. Counts every successful instantiation, which makes lazy
/// loading observable.
///
/// ```
/// use std::path::Path;
/// use nebula_loader::{ComponentResolver, StaticResolver};
///
/// let resolver = StaticResolver::new();
/// assert!(resolver.resolve_node(Path::new("Missing.node.wasm"), "Missing").is_err());
/// assert_eq!(resolver.instantiations(), 0);
/// ```
#[derive(Default)]
pub struct StaticResolver {
    nodes: HashMap<String, NodeFactory>,
    credentials: HashMap<String, CredentialFactory>,
    instantiations: AtomicUsize,
}

impl StaticResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node factory.
    #[must_use]
    pub fn with_node<F>(mut self, class_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> NodeType + Send + Sync + 'static,
    {
        self.nodes.insert(class_name.into(), Arc::new(factory));
        self
    }

    /// Register a credential factory.
    #[must_use]
    pub fn with_credential<F>(mut self, class_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Credential> + Send + Sync + 'static,
    {
        self.credentials.insert(class_name.into(), Arc::new(factory));
        self
    }

    /// Number of components instantiated so far.
    pub fn instantiations(&self) -> usize {
        self.instantiations.load(Ordering::Relaxed)
    }
}

impl ComponentResolver for StaticResolver {
    fn resolve_node(&self, _path: &Path, class_name: &str) -> Result<NodeType, ResolveError> {
        let factory = self
            .nodes
            .get(class_name)
            .ok_or_else(|| ResolveError::SymbolNotFound(class_name.to_owned()))?;
        self.instantiations.fetch_add(1, Ordering::Relaxed);
        Ok(factory())
    }

    fn resolve_credential(
        &self,
        _path: &Path,
        class_name: &str,
    ) -> Result<Arc<dyn Credential>, ResolveError> {
        let factory = self
            .credentials
            .get(class_name)
            .ok_or_else(|| ResolveError::SymbolNotFound(class_name.to_owned()))?;
        self.instantiations.fetch_add(1, Ordering::Relaxed);
        Ok(factory())
    }
}

impl fmt::Debug for StaticResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes: Vec<_> = self.nodes.keys().collect();
        nodes.sort();
        let mut credentials: Vec<_> = self.credentials.keys().collect();
        credentials.sort();
        f.debug_struct("StaticResolver")
            .field("nodes", &nodes)
            .field("credentials", &credentials)
            .field("instantiations", &self.instantiations())
            .finish()
    }
}

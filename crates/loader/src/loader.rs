//! The loader trait.

use std::sync::Arc;

use async_trait::async_trait;
use nebula_node::{Credential, NodeType};

use crate::LoaderError;
use crate::base::BaseRegistry;
use crate::registry::Registry;

/// A discovery strategy populating a [`BaseRegistry`].
///
/// Loaders are single-owner; concurrent use of one loader is not
/// supported. Separate loaders share nothing.
#[async_trait]
pub trait ComponentLoader: Send {
    /// Discover and record every component this loader is responsible for.
    ///
    /// Fatal errors abort the call; the registry may then hold the
    /// components recorded before the failing one. Call [`reset`](Self::reset)
    /// before retrying.
    async fn load_all(&mut self) -> Result<(), LoaderError>;

    /// Shared registry state.
    fn base(&self) -> &BaseRegistry;

    /// Shared registry state, mutably.
    fn base_mut(&mut self) -> &mut BaseRegistry;

    /// Everything recorded so far.
    fn registry(&self) -> &Registry {
        self.base().registry()
    }

    /// Whether the registry came from a lazy manifest.
    fn is_lazy_loaded(&self) -> bool {
        self.base().is_lazy_loaded()
    }

    /// Clear the registry so `load_all` can run again.
    fn reset(&mut self) {
        self.base_mut().reset();
    }

    /// The live node named `name`; see [`BaseRegistry::get_node`].
    fn get_node(&mut self, name: &str) -> Result<NodeType, LoaderError> {
        self.base_mut().get_node(name)
    }

    /// The live credential named `name`; see [`BaseRegistry::get_credential`].
    fn get_credential(&mut self, name: &str) -> Result<Arc<dyn Credential>, LoaderError> {
        self.base_mut().get_credential(name)
    }
}

//! Lazy discovery from precomputed artifacts, with eager fallback.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::base::BaseRegistry;
use crate::loader::ComponentLoader;
use crate::manifest::{LazyArtifacts, PackageDescriptor};
use crate::package::ManifestPackageLoader;
use crate::resolver::ComponentResolver;
use crate::{LoaderConfig, LoaderError};

/// Populates the registry from the four `dist/known` and `dist/types`
/// artifacts without instantiating anything.
///
/// The artifacts are accepted only as a complete, valid set. Otherwise
/// nothing read from them is kept and the package is loaded eagerly, as
/// [`ManifestPackageLoader`] does. Components are then resolved on demand
/// through [`get_node`](ComponentLoader::get_node) and
/// [`get_credential`](ComponentLoader::get_credential).
#[derive(Debug)]
pub struct LazyManifestLoader {
    inner: ManifestPackageLoader,
}

impl LazyManifestLoader {
    /// Read the package descriptor and create a loader for `directory`.
    ///
    /// # Errors
    ///
    /// Same as [`ManifestPackageLoader::open`].
    pub async fn open(
        directory: impl Into<PathBuf>,
        config: LoaderConfig,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Result<Self, LoaderError> {
        Ok(Self {
            inner: ManifestPackageLoader::open(directory, config, resolver).await?,
        })
    }

    /// The package descriptor.
    pub fn descriptor(&self) -> &PackageDescriptor {
        self.inner.descriptor()
    }
}

#[async_trait]
impl ComponentLoader for LazyManifestLoader {
    async fn load_all(&mut self) -> Result<(), LoaderError> {
        let directory = self.inner.base().directory().to_path_buf();
        match LazyArtifacts::read(&directory).await {
            Ok(artifacts) => {
                let base = self.inner.base_mut();
                base.record_declared(artifacts.known, artifacts.types);
                tracing::info!(
                    package = %base.namespace(),
                    nodes = base.registry().node_types.len(),
                    credentials = base.registry().credential_types.len(),
                    "package loaded lazily"
                );
                Ok(())
            }
            Err(e) => {
                tracing::debug!(
                    package = %self.inner.descriptor().name,
                    error = %e,
                    "lazy artifacts unusable, loading eagerly"
                );
                self.inner.load_all().await
            }
        }
    }

    fn base(&self) -> &BaseRegistry {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        self.inner.base_mut()
    }
}

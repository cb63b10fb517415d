//! Eager discovery driven by a package descriptor.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::base::BaseRegistry;
use crate::loader::ComponentLoader;
use crate::manifest::PackageDescriptor;
use crate::resolver::ComponentResolver;
use crate::{LoaderConfig, LoaderError};

/// Loads the component files a package lists in its descriptor, in listed
/// order, nodes first. The package name is the namespace.
#[derive(Debug)]
pub struct ManifestPackageLoader {
    base: BaseRegistry,
    descriptor: PackageDescriptor,
}

impl ManifestPackageLoader {
    /// Read the package descriptor and create a loader for `directory`.
    ///
    /// # Errors
    ///
    /// [`LoaderError::Io`] if `package.json` is unreadable, or
    /// [`LoaderError::MalformedManifest`] if it is invalid.
    pub async fn open(
        directory: impl Into<PathBuf>,
        config: LoaderConfig,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Result<Self, LoaderError> {
        let directory = directory.into();
        let descriptor = PackageDescriptor::read(&directory).await?;
        Ok(Self::with_descriptor(directory, descriptor, config, resolver))
    }

    /// Create a loader from an already parsed descriptor.
    pub fn with_descriptor(
        directory: impl Into<PathBuf>,
        descriptor: PackageDescriptor,
        config: LoaderConfig,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Self {
        Self {
            base: BaseRegistry::new(directory, descriptor.name.clone(), config, resolver),
            descriptor,
        }
    }

    /// The package descriptor.
    pub fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl ComponentLoader for ManifestPackageLoader {
    async fn load_all(&mut self) -> Result<(), LoaderError> {
        if self.descriptor.nebula.is_none() {
            tracing::debug!(package = %self.descriptor.name, "package declares no components");
            return Ok(());
        }

        for file in self.descriptor.node_files() {
            let path = self.base.resolve_path(file);
            self.base.load_node_file(&path).await?;
        }
        for file in self.descriptor.credential_files() {
            let path = self.base.resolve_path(file);
            self.base.load_credential_file(&path).await?;
        }

        tracing::info!(
            package = %self.descriptor.name,
            nodes = self.base.registry().node_types.len(),
            credentials = self.base.registry().credential_types.len(),
            "package loaded"
        );
        Ok(())
    }

    fn base(&self) -> &BaseRegistry {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.base
    }
}

//! Node error types.

/// Errors from node model operations.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// A specific version was not found.
    #[error("version {version} not found for node '{name}'")]
    VersionNotFound {
        /// The requested version.
        version: u32,
        /// The node name.
        name: String,
    },

    /// No versions are available in a `NodeVersions` container.
    #[error("no versions available for node '{0}'")]
    NoVersionsAvailable(String),

    /// The name of a variant being added doesn't match the container's name.
    #[error("name mismatch: variant is named '{variant_name}', container is named '{container_name}'")]
    NameMismatch {
        /// The incoming variant's name.
        variant_name: String,
        /// The container's name.
        container_name: String,
    },

    /// A version already exists in the container.
    #[error("version {version} already exists for node '{name}'")]
    VersionAlreadyExists {
        /// The conflicting version.
        version: u32,
        /// The node name.
        name: String,
    },

    /// The declared default version has no matching variant.
    #[error("default version {version} of node '{name}' has no matching variant")]
    DefaultVersionMissing {
        /// The declared default version.
        version: u32,
        /// The node name.
        name: String,
    },

    /// A required field was missing during descriptor construction.
    #[error("missing required field '{field}' for node")]
    MissingRequiredField {
        /// The missing field name.
        field: &'static str,
    },
}

impl PartialEq for NodeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::VersionNotFound {
                    version: v1,
                    name: n1,
                },
                Self::VersionNotFound {
                    version: v2,
                    name: n2,
                },
            )
            | (
                Self::VersionAlreadyExists {
                    version: v1,
                    name: n1,
                },
                Self::VersionAlreadyExists {
                    version: v2,
                    name: n2,
                },
            )
            | (
                Self::DefaultVersionMissing {
                    version: v1,
                    name: n1,
                },
                Self::DefaultVersionMissing {
                    version: v2,
                    name: n2,
                },
            ) => v1 == v2 && n1 == n2,
            (Self::NoVersionsAvailable(a), Self::NoVersionsAvailable(b)) => a == b,
            (
                Self::NameMismatch {
                    variant_name: v1,
                    container_name: c1,
                },
                Self::NameMismatch {
                    variant_name: v2,
                    container_name: c2,
                },
            ) => v1 == v2 && c1 == c2,
            (
                Self::MissingRequiredField { field: f1 },
                Self::MissingRequiredField { field: f2 },
            ) => f1 == f2,
            _ => false,
        }
    }
}

impl Eq for NodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_not_found_display() {
        let err = NodeError::VersionNotFound {
            version: 3,
            name: "httpRequest".into(),
        };
        assert_eq!(
            err.to_string(),
            "version 3 not found for node 'httpRequest'"
        );
    }

    #[test]
    fn name_mismatch_display() {
        let err = NodeError::NameMismatch {
            variant_name: "foo".into(),
            container_name: "bar".into(),
        };
        assert!(err.to_string().contains("foo"));
        assert!(err.to_string().contains("bar"));
    }

    #[test]
    fn partial_eq() {
        let a = NodeError::NoVersionsAvailable("slack".into());
        let b = NodeError::NoVersionsAvailable("slack".into());
        assert_eq!(a, b);

        let c = NodeError::NoVersionsAvailable("http".into());
        assert_ne!(a, c);
        assert_ne!(
            a,
            NodeError::MissingRequiredField { field: "name" }
        );
    }
}

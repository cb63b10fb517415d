//! Loader error types.

use std::path::PathBuf;

use nebula_node::{EntryPoint, NodeError};

/// Boxed error returned by resolver implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// How a discovery failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Broken component or manifest; aborts the discovery call.
    FatalConfiguration,
    /// Recovered inside the loader (missing codex, unreadable lazy manifest).
    SoftDiscovery,
    /// Unexpected resolver or filesystem failure, returned unchanged.
    Propagated,
}

/// Errors returned by discovery calls.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The resolver found the file but not the expected symbol.
    #[error(
        "class '{class_name}' could not be found in '{}'; check that the class is named correctly",
        .path.display()
    )]
    ClassNotFound {
        /// Class name derived from the file name.
        class_name: String,
        /// File that was resolved.
        path: PathBuf,
    },

    /// A versioned node still implements a removed entry point.
    #[error(
        "node '{node}' version {version} implements `{}`, which has been removed; implement `execute` instead",
        .entry_point.as_str()
    )]
    RetiredEntryPoint {
        /// Node type name.
        node: String,
        /// Offending variant.
        version: u32,
        /// The retired entry point.
        entry_point: EntryPoint,
    },

    /// A package descriptor could not be parsed or failed validation.
    #[error("malformed {artifact} at '{}': {reason}", .path.display())]
    MalformedManifest {
        /// What was being read.
        artifact: &'static str,
        /// File that was read.
        path: PathBuf,
        /// Parser or validation message.
        reason: String,
    },

    /// The loader configuration is invalid.
    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),

    /// The node model rejected a resolved component.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// The resolver failed for a reason other than a missing symbol.
    #[error("failed to resolve component from '{}'", .path.display())]
    Resolve {
        /// File that was resolved.
        path: PathBuf,
        /// Resolver error.
        #[source]
        source: BoxError,
    },

    /// Filesystem failure.
    #[error("I/O error at '{}'", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failure.
    #[error("failed to scan '{}'", .root.display())]
    Walk {
        /// Scan root.
        root: PathBuf,
        /// Underlying error.
        #[source]
        source: walkdir::Error,
    },

    /// A blocking scan task panicked or was cancelled.
    #[error("scan task failed")]
    Task(#[from] tokio::task::JoinError),

    /// No node with this name is known to the loader.
    #[error("unrecognized node type '{0}'")]
    UnknownNode(String),

    /// No credential with this name is known to the loader.
    #[error("unrecognized credential type '{0}'")]
    UnknownCredential(String),
}

impl LoaderError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClassNotFound { .. }
            | Self::RetiredEntryPoint { .. }
            | Self::MalformedManifest { .. }
            | Self::InvalidConfig(_)
            | Self::Node(_) => ErrorKind::FatalConfiguration,
            Self::Resolve { .. }
            | Self::Io { .. }
            | Self::Walk { .. }
            | Self::Task(_)
            | Self::UnknownNode(_)
            | Self::UnknownCredential(_) => ErrorKind::Propagated,
        }
    }

    /// Whether this error aborts discovery as a configuration problem.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::FatalConfiguration
    }
}

/// Failure to read an optional artifact: a codex sidecar or a lazy manifest.
///
/// Always recovered by the loader; it is public so callers reading
/// artifacts directly can inspect it.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The file could not be read.
    #[error("cannot read '{}'", .path.display())]
    Read {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("cannot parse '{}'", .path.display())]
    Parse {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but violates the artifact schema.
    #[error("invalid '{}': {reason}", .path.display())]
    Invalid {
        /// Artifact path.
        path: PathBuf,
        /// What is wrong.
        reason: String,
    },
}

impl ArtifactError {
    /// Always [`ErrorKind::SoftDiscovery`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SoftDiscovery
    }
}

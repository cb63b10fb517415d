//! # Nebula Node
//!
//! Component model shared by node discovery and the rest of the engine.
//!
//! Two component kinds are modelled:
//!
//! - **nodes**: units of work, possibly exposed through several version
//!   variants ([`NodeType`], [`NodeVersions`]);
//! - **credentials**: authentication types nodes declare they can use
//!   ([`Credential`]).
//!
//! ## Core Types
//!
//! - [`Node`] / [`Credential`]: object-safe traits implemented by components
//! - [`NodeDescription`] / [`CredentialDescription`]: serializable descriptors
//! - [`NodeType`]: a single node or a versioned set
//! - [`Icon`], [`Codex`]: presentation metadata normalized during discovery
//! - [`Authentication`]: data or code; code serializes only as a presence flag
//! - [`QualifiedName`]: `<namespace>.<name>` used for include/exclude lists
//! - [`NodeError`]: error type for model operations

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codex;
mod credential;
mod description;
mod error;
mod name;
mod node;
mod node_type;
mod versions;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use codex::{Codex, CodexResources, DocumentationLink};
pub use credential::{Authenticate, Authentication, Credential, CredentialDescription};
pub use description::{
    CredentialReference, Icon, NodeDescription, NodeDescriptionBuilder, VersionSpec,
};
pub use error::NodeError;
pub use name::{QualifiedName, QualifiedNameError};
pub use node::{EntryPoint, Node};
pub use node_type::NodeType;
pub use versions::NodeVersions;

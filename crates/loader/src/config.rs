//! Include/exclude configuration.

use nebula_node::QualifiedName;
use serde::{Deserialize, Serialize};

use crate::LoaderError;

/// Environment variable holding the include list as a JSON array.
pub const INCLUDE_ENV: &str = "NEBULA_NODES_INCLUDE";
/// Environment variable holding the exclude list as a JSON array.
pub const EXCLUDE_ENV: &str = "NEBULA_NODES_EXCLUDE";

/// Which components a loader records.
///
/// An empty include list admits everything. Exclusion always wins: a name
/// present in both lists is skipped. Both lists apply to nodes and
/// credentials alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Names to admit; empty means all.
    pub include: Vec<QualifiedName>,
    /// Names to skip.
    pub exclude: Vec<QualifiedName>,
}

impl LoaderConfig {
    /// Admit everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name to the include list.
    #[must_use]
    pub fn include(mut self, name: QualifiedName) -> Self {
        self.include.push(name);
        self
    }

    /// Add a name to the exclude list.
    #[must_use]
    pub fn exclude(mut self, name: QualifiedName) -> Self {
        self.exclude.push(name);
        self
    }

    /// Read [`INCLUDE_ENV`] and [`EXCLUDE_ENV`].
    ///
    /// Unset or empty variables yield empty lists.
    ///
    /// # Errors
    ///
    /// [`LoaderError::InvalidConfig`] if a variable is not a JSON array of
    /// `<namespace>.<name>` strings.
    pub fn from_env() -> Result<Self, LoaderError> {
        Self::from_values(
            std::env::var(INCLUDE_ENV).ok().as_deref(),
            std::env::var(EXCLUDE_ENV).ok().as_deref(),
        )
    }

    /// Build from raw include/exclude values as found in the environment.
    pub fn from_values(include: Option<&str>, exclude: Option<&str>) -> Result<Self, LoaderError> {
        Ok(Self {
            include: parse_list(INCLUDE_ENV, include)?,
            exclude: parse_list(EXCLUDE_ENV, exclude)?,
        })
    }

    /// Whether a component with this namespace and name should be recorded.
    pub fn accepts(&self, namespace: &str, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|q| q.matches(namespace, name)) {
            return false;
        }
        !self.exclude.iter().any(|q| q.matches(namespace, name))
    }

    /// Whether any filter is configured.
    pub fn is_filtering(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }
}

fn parse_list(var: &str, raw: Option<&str>) -> Result<Vec<QualifiedName>, LoaderError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| LoaderError::InvalidConfig(format!("{var}: {e}"))),
    }
}

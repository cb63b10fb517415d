//! Fully-qualified component names (`<namespace>.<name>`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors from constructing a [`QualifiedName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualifiedNameError {
    /// The input has no `.` between namespace and name.
    #[error("qualified name '{0}' must have the form '<namespace>.<name>'")]
    MissingSeparator(String),
    /// The namespace part is empty or whitespace.
    #[error("namespace cannot be empty or whitespace")]
    EmptyNamespace,
    /// The name part is empty or whitespace.
    #[error("component name cannot be empty or whitespace")]
    EmptyName,
    /// The name part contains a `.` or whitespace.
    #[error("component name '{0}' contains invalid characters ('.' and whitespace are not allowed)")]
    InvalidName(String),
}

/// A namespace-qualified component name, e.g. `nebula-nodes-base.httpRequest`.
///
/// The namespace is everything before the last `.`, so package namespaces
/// may themselves contain dots. Component names are case-sensitive and are
/// not normalized.
///
/// # Examples
///
/// ```
/// use nebula_node::QualifiedName;
///
/// let name: QualifiedName = "nebula-nodes-base.httpRequest".parse().unwrap();
/// assert_eq!(name.namespace(), "nebula-nodes-base");
/// assert_eq!(name.name(), "httpRequest");
/// assert_eq!(name.to_string(), "nebula-nodes-base.httpRequest");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    namespace: String,
    name: String,
}

impl QualifiedName {
    /// Build a qualified name from its two parts, validating both.
    pub fn new(namespace: &str, name: &str) -> Result<Self, QualifiedNameError> {
        if namespace.trim().is_empty() {
            return Err(QualifiedNameError::EmptyNamespace);
        }
        if name.trim().is_empty() {
            return Err(QualifiedNameError::EmptyName);
        }
        if name.contains('.') || name.chars().any(char::is_whitespace) {
            return Err(QualifiedNameError::InvalidName(name.to_owned()));
        }
        Ok(Self {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        })
    }

    /// The namespace part.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The bare component name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this refers to `name` inside `namespace`.
    pub fn matches(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s
            .rsplit_once('.')
            .ok_or_else(|| QualifiedNameError::MissingSeparator(s.to_owned()))?;
        Self::new(namespace, name)
    }
}

impl TryFrom<&str> for QualifiedName {
    type Error = QualifiedNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = QualifiedNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

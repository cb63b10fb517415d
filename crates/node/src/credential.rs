//! Credential types and their serializable descriptors.

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Icon;

/// Executable authentication logic attached to a credential type.
pub trait Authenticate: Send + Sync + Debug {
    /// Apply `credentials` to an outgoing `request` and return the result.
    fn authenticate(&self, credentials: &Value, request: Value) -> Value;
}

/// How a credential authenticates requests.
///
/// Generic authentication is plain data and serializes as-is. Custom
/// authentication is code: it serializes only as the presence flag `{}` so
/// readers can tell the capability exists without receiving anything
/// executable. Deserializing always yields [`Authentication::Generic`].
#[derive(Clone)]
pub enum Authentication {
    /// Declarative rules, e.g. `{"type": "generic", "properties": {...}}`.
    Generic(Value),
    /// Arbitrary logic.
    Custom(Arc<dyn Authenticate>),
}

impl Authentication {
    /// Whether this is executable logic rather than data.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic(v) => f.debug_tuple("Generic").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Compares the form exposed to readers: two custom implementations are
/// indistinguishable once serialized.
impl PartialEq for Authentication {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Generic(a), Self::Generic(b)) => a == b,
            (Self::Custom(_), Self::Custom(_)) => true,
            _ => false,
        }
    }
}

impl Serialize for Authentication {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Generic(v) => v.serialize(serializer),
            Self::Custom(_) => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl<'de> Deserialize<'de> for Authentication {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::Generic)
    }
}

/// Serializable description of a credential type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    /// Unique (per namespace) type name.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Credential types this one builds on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    /// Raw icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Resolved icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<Icon>,
    /// Documentation link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    /// Authentication capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticate: Option<Authentication>,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialDescription {
    /// A bare description with only the names set.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            extends: Vec::new(),
            icon: None,
            icon_url: None,
            documentation_url: None,
            authenticate: None,
            extra: Map::new(),
        }
    }

    /// Set the parent credential types.
    pub fn with_extends(mut self, extends: Vec<String>) -> Self {
        self.extends = extends;
        self
    }

    /// Set a single icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(Icon::Single(icon.into()));
        self
    }

    /// Set the authentication capability.
    pub fn with_authenticate(mut self, authenticate: Authentication) -> Self {
        self.authenticate = Some(authenticate);
        self
    }
}

/// Base trait for credential type implementations.
///
/// Object-safe so credentials can be stored as `Arc<dyn Credential>`.
pub trait Credential: Send + Sync + Debug {
    /// Returns the static description of this credential type.
    fn description(&self) -> &CredentialDescription;

    /// The credential type name.
    fn name(&self) -> &str {
        &self.description().name
    }
}

//! Serializable node descriptors and builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Codex;
use crate::NodeError;

/// An icon reference: either one path/identifier or a light/dark pair.
///
/// References starting with [`Icon::FILE_PREFIX`] point at a file next to
/// the component and are rewritten into registry URLs during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Icon {
    /// A single reference used for every theme.
    Single(String),
    /// Separate references for light and dark themes.
    Themed {
        /// Light theme reference.
        light: String,
        /// Dark theme reference.
        dark: String,
    },
}

impl Icon {
    /// Prefix marking a reference as a file relative to the component source.
    pub const FILE_PREFIX: &'static str = "file:";
}

/// The version(s) a descriptor declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSpec {
    /// One version.
    One(u32),
    /// Several versions served by the same implementation.
    Many(Vec<u32>),
}

impl VersionSpec {
    /// The highest declared version; an empty list counts as version 1.
    pub fn latest(&self) -> u32 {
        match self {
            Self::One(v) => *v,
            Self::Many(vs) => vs.iter().copied().max().unwrap_or(1),
        }
    }

    /// Every declared version, in declaration order. An empty list yields
    /// version 1, matching [`latest`](Self::latest).
    pub fn versions(&self) -> Vec<u32> {
        match self {
            Self::One(v) => vec![*v],
            Self::Many(vs) if vs.is_empty() => vec![1],
            Self::Many(vs) => vs.clone(),
        }
    }
}

impl Default for VersionSpec {
    fn default() -> Self {
        Self::One(1)
    }
}

/// A credential a node declares it can use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialReference {
    /// Credential type name.
    pub name: String,
    /// Whether the node cannot run without it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl CredentialReference {
    /// A required credential reference.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// An optional credential reference.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// Serializable description of a node type.
///
/// This is the shape exposed to external readers (editor UI, docs) and the
/// shape of each entry in a `types/nodes.json` artifact. Fields this crate
/// does not interpret (parameters, inputs, outputs, ...) are kept in
/// [`extra`](Self::extra) and written back unchanged.
///
/// ```
/// use nebula_node::{CredentialReference, NodeDescription};
///
/// let desc = NodeDescription::builder("httpRequest", "HTTP Request")
///     .version(3)
///     .icon("file:http.svg")
///     .credential(CredentialReference::optional("httpBasicAuth"))
///     .build()
///     .unwrap();
///
/// assert_eq!(desc.name, "httpRequest");
/// assert_eq!(desc.version.latest(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    /// Unique (per namespace) type name.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Group hierarchy for UI categorization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<String>,
    /// Declared version(s).
    #[serde(default)]
    pub version: VersionSpec,
    /// Explicit current version for versioned nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<u32>,
    /// Raw icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Resolved icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<Icon>,
    /// Credentials this node can use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialReference>,
    /// Categorization metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex: Option<Codex>,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeDescription {
    /// Start building a description with the minimum required fields.
    pub fn builder(name: impl Into<String>, display_name: impl Into<String>) -> NodeDescriptionBuilder {
        NodeDescriptionBuilder {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            group: Vec::new(),
            version: VersionSpec::default(),
            default_version: None,
            icon: None,
            credentials: Vec::new(),
            codex: None,
            extra: Map::new(),
        }
    }

    /// Names of the credentials this node declares.
    pub fn credential_names(&self) -> impl Iterator<Item = &str> {
        self.credentials.iter().map(|c| c.name.as_str())
    }
}

/// Builder for [`NodeDescription`].
pub struct NodeDescriptionBuilder {
    name: String,
    display_name: String,
    description: String,
    group: Vec<String>,
    version: VersionSpec,
    default_version: Option<u32>,
    icon: Option<Icon>,
    credentials: Vec<CredentialReference>,
    codex: Option<Codex>,
    extra: Map<String, Value>,
}

impl NodeDescriptionBuilder {
    /// Set a single version (defaults to 1).
    pub fn version(mut self, version: u32) -> Self {
        self.version = VersionSpec::One(version);
        self
    }

    /// Declare several versions served by one implementation.
    pub fn versions(mut self, versions: Vec<u32>) -> Self {
        self.version = VersionSpec::Many(versions);
        self
    }

    /// Set the explicit current version.
    pub fn default_version(mut self, version: u32) -> Self {
        self.default_version = Some(version);
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the group hierarchy.
    pub fn group(mut self, group: Vec<String>) -> Self {
        self.group = group;
        self
    }

    /// Set a single icon reference.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(Icon::Single(icon.into()));
        self
    }

    /// Set a light/dark icon pair.
    pub fn themed_icon(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.icon = Some(Icon::Themed {
            light: light.into(),
            dark: dark.into(),
        });
        self
    }

    /// Add a credential reference.
    pub fn credential(mut self, credential: CredentialReference) -> Self {
        self.credentials.push(credential);
        self
    }

    /// Set the codex.
    pub fn codex(mut self, codex: Codex) -> Self {
        self.codex = Some(codex);
        self
    }

    /// Set an uninterpreted field.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Validate and build the description.
    pub fn build(self) -> Result<NodeDescription, NodeError> {
        if self.name.trim().is_empty() {
            return Err(NodeError::MissingRequiredField { field: "name" });
        }

        Ok(NodeDescription {
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            group: self.group,
            version: self.version,
            default_version: self.default_version,
            icon: self.icon,
            icon_url: None,
            credentials: self.credentials,
            codex: self.codex,
            extra: self.extra,
        })
    }
}

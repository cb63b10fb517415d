//! Codex: categorization and documentation metadata shown next to a component.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Categorization, alias and documentation metadata for a node.
///
/// Codex data is presentation-only; nothing in discovery depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Codex {
    /// Top-level categories (e.g. `["Communication"]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Subcategories keyed by category.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub subcategories: IndexMap<String, Vec<String>>,
    /// Search aliases.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    /// Documentation links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<CodexResources>,
}

impl Codex {
    /// A codex carrying a single category.
    pub fn with_category(category: impl Into<String>) -> Self {
        Self {
            categories: vec![category.into()],
            ..Self::default()
        }
    }

    /// Append `category` unless it is already present.
    pub fn add_category(&mut self, category: &str) {
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_owned());
        }
    }
}

/// Documentation links attached to a codex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexResources {
    /// Docs for the node itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_documentation: Vec<DocumentationLink>,
    /// Docs for the credentials the node uses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credential_documentation: Vec<DocumentationLink>,
}

/// A single documentation URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationLink {
    /// Target URL.
    pub url: String,
}

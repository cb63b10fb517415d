//! The base Node trait.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::NodeDescription;

/// The ways a node implementation can be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryPoint {
    /// Batch execution over all input items.
    Execute,
    /// Per-item execution. Retired: the runtime no longer calls it.
    ExecuteSingle,
    /// Polling trigger.
    Poll,
    /// Event trigger.
    Trigger,
    /// Incoming webhook.
    Webhook,
    /// Declarative request routing without custom code.
    Declarative,
}

impl EntryPoint {
    /// Whether the runtime has dropped support for this entry point.
    pub fn is_retired(self) -> bool {
        matches!(self, Self::ExecuteSingle)
    }

    /// Method name as written in node implementations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Execute => "execute",
            Self::ExecuteSingle => "executeSingle",
            Self::Poll => "poll",
            Self::Trigger => "trigger",
            Self::Webhook => "webhook",
            Self::Declarative => "declarative",
        }
    }
}

/// Base trait for all node implementations.
///
/// A node is a user-visible, versionable unit of work (e.g. "Slack",
/// "HTTP Request"). Discovery only needs its description and the entry
/// points it implements.
///
/// This trait is **object-safe** so nodes can be stored as `Arc<dyn Node>`.
pub trait Node: Send + Sync + Debug {
    /// Returns the static description of this node.
    fn description(&self) -> &NodeDescription;

    /// Entry points this implementation provides.
    fn entry_points(&self) -> &[EntryPoint] {
        &[EntryPoint::Execute]
    }

    /// The node type name.
    fn name(&self) -> &str {
        &self.description().name
    }

    /// Highest version this implementation declares.
    fn version(&self) -> u32 {
        self.description().version.latest()
    }

    /// The first retired entry point this implementation still exposes.
    fn retired_entry_point(&self) -> Option<EntryPoint> {
        self.entry_points().iter().copied().find(|e| e.is_retired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestNode {
        desc: NodeDescription,
        entry_points: Vec<EntryPoint>,
    }

    impl Node for TestNode {
        fn description(&self) -> &NodeDescription {
            &self.desc
        }

        fn entry_points(&self) -> &[EntryPoint] {
            &self.entry_points
        }
    }

    #[test]
    fn trait_default_methods() {
        let desc = NodeDescription::builder("slack", "Slack")
            .versions(vec![1, 2])
            .build()
            .unwrap();
        let node = TestNode {
            desc,
            entry_points: vec![EntryPoint::Execute],
        };

        assert_eq!(node.name(), "slack");
        assert_eq!(node.version(), 2);
        assert_eq!(node.retired_entry_point(), None);
    }

    #[test]
    fn detects_retired_entry_point() {
        let desc = NodeDescription::builder("legacy", "Legacy").build().unwrap();
        let node = TestNode {
            desc,
            entry_points: vec![EntryPoint::Poll, EntryPoint::ExecuteSingle],
        };
        assert_eq!(node.retired_entry_point(), Some(EntryPoint::ExecuteSingle));
        assert_eq!(EntryPoint::ExecuteSingle.as_str(), "executeSingle");
    }

    #[test]
    fn object_safety() {
        use std::sync::Arc;

        let desc = NodeDescription::builder("test", "Test").build().unwrap();
        let node: Arc<dyn Node> = Arc::new(TestNode {
            desc,
            entry_points: Vec::new(),
        });

        assert_eq!(node.name(), "test");
        assert_eq!(node.version(), 1);
    }
}

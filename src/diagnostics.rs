use serde::Serialize;
use tracing::debug;

use crate::dom::Node;

/// Owned pointer back to the element a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<&Node> for NodeRef {
    fn from(node: &Node) -> Self {
        Self {
            tag: node.tag.clone(),
            id: node.id.clone().filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeRef>,
}

/// Append-only record of the problems found during one validation run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    failed: bool,
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, node: Option<&Node>) {
        self.failed = true;
        self.errors.push(Diagnostic {
            message: message.into(),
            node: node.map(NodeRef::from),
        });
    }

    // warn and info are not collected yet; they only reach the log.
    pub fn warn(&mut self, message: impl Into<String>, node: Option<&Node>) {
        let message = message.into();
        debug!(node = ?node.map(Node::label), "warning: {message}");
    }

    pub fn info(&mut self, message: impl Into<String>, node: Option<&Node>) {
        let message = message.into();
        debug!(node = ?node.map(Node::label), "info: {message}");
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn error_list(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(|diagnostic| diagnostic.message.as_str())
            .collect()
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }
}

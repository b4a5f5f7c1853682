//! Task and operation types submitted by callers and executed by the agent.
//!
//! A [`Task`] serializes as `{"ops": [...]}` where every operation carries
//! its discriminator in a `type` field:
//!
//! ```json
//! {"ops": [{"type": "CREATE_PAGE", "name": "Landing", "slug": "landing"}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::OrderedMap;

/// An ordered batch of operations. Order is significant: the executor runs
/// them one after another, never in parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub ops: Vec<Operation>,
}

impl Task {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Reject batches the executor could never run meaningfully.
    ///
    /// Only shape is checked here; whether targets resolve is decided on
    /// the executor.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ops.is_empty() {
            return Err(CoreError::Validation("ops must not be empty".into()));
        }
        for (index, op) in self.ops.iter().enumerate() {
            op.validate()
                .map_err(|msg| CoreError::Validation(format!("ops[{index}]: {msg}")))?;
        }
        Ok(())
    }
}

/// One declarative page-editing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Operation {
    /// Create a page and switch the active view to it.
    CreatePage {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },

    /// Materialize a node tree under the selected element or the page root.
    BuildTree {
        #[serde(default)]
        target: TreeTarget,
        tree: Node,
    },

    /// Overwrite the text of an addressed element.
    SetText {
        oid: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        child_path: Option<String>,
        text: String,
    },

    /// Create or update a named style and apply it to every resolvable target.
    ApplyStyle {
        style_name: String,
        #[serde(default)]
        properties: OrderedMap,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_style_name: Option<String>,
        #[serde(default)]
        targets: Vec<ElementRef>,
    },

    /// Append an image element under an addressed parent.
    AddImage {
        parent: ElementRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        asset: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },

    /// Liveness probe; also used as the executor heartbeat.
    TestConnection,
}

impl Operation {
    /// Wire discriminator, e.g. `"CREATE_PAGE"`.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreatePage { .. } => "CREATE_PAGE",
            Operation::BuildTree { .. } => "BUILD_TREE",
            Operation::SetText { .. } => "SET_TEXT",
            Operation::ApplyStyle { .. } => "APPLY_STYLE",
            Operation::AddImage { .. } => "ADD_IMAGE",
            Operation::TestConnection => "TEST_CONNECTION",
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Operation::CreatePage { name, .. } => require("name", name),
            Operation::BuildTree { tree, .. } => tree.validate(),
            Operation::SetText { oid, .. } => require("oid", oid),
            Operation::ApplyStyle { style_name, .. } => require("styleName", style_name),
            Operation::AddImage { parent, .. } => require("parent.oid", &parent.oid),
            Operation::TestConnection => Ok(()),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be blank"))
    } else {
        Ok(())
    }
}

/// Where a `BUILD_TREE` attaches its subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeTarget {
    /// The selected element when it can hold children, else the page root.
    #[default]
    Selected,
    /// Always the page root.
    Root,
}

impl TreeTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            TreeTarget::Selected => "selected",
            TreeTarget::Root => "root",
        }
    }
}

/// Address of an element: its OID plus an optional child path such as
/// `"div > span"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub oid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_path: Option<String>,
}

impl ElementRef {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            child_path: None,
        }
    }

    pub fn with_child_path(mut self, path: impl Into<String>) -> Self {
        self.child_path = Some(path.into());
        self
    }
}

/// Declarative description of one element and its children.
///
/// A node is a pure value: building it never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Semantic element kind, e.g. `"section"` or `"img"`.
    pub tag: String,
    /// Opaque identifier used to re-address the element later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub attributes: OrderedMap,
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub styles: OrderedMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            oid: None,
            text: None,
            attributes: OrderedMap::new(),
            styles: OrderedMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_oid(mut self, oid: impl Into<String>) -> Self {
        self.oid = Some(oid.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Number of elements this node materializes into, itself included.
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(Node::element_count).sum::<usize>()
    }

    fn validate(&self) -> Result<(), String> {
        require("tree.tag", &self.tag)?;
        self.children.iter().try_for_each(Node::validate)
    }
}

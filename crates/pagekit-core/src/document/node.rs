//! Document tree, path accessor and shape checks.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::path::{FieldPath, PathError};

/// Children of a branch, ordered by field name.
pub type Fields = BTreeMap<String, ConfigNode>;

/// One node of the document tree.
///
/// # Serde representation
///
/// `untagged`: a leaf is a plain JSON string and a branch is a plain JSON
/// object, so a document serialises exactly like the object the site used to
/// keep in `localStorage`:
///
/// ```json
/// {"siteName":"Meus Descontos Online","affiliateLinks":{"amazon":"#amazon"}}
/// ```
///
/// Any other JSON value (number, bool, null, array) fails to deserialise,
/// which is how malformed persisted state is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    /// A terminal string value.
    Leaf(String),
    /// A mapping of field names to child nodes, shared between documents.
    Branch(Arc<Fields>),
}

impl ConfigNode {
    /// Returns the string value if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            ConfigNode::Leaf(value) => Some(value),
            ConfigNode::Branch(_) => None,
        }
    }

    /// Returns `true` for [`ConfigNode::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, ConfigNode::Leaf(_))
    }
}

/// The site configuration document.
///
/// Cloning is cheap (one `Arc` increment).  All writes go through
/// [`set`](Self::set), which returns a new document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    root: Arc<Fields>,
}

impl ConfigDocument {
    /// Starts a [`DocumentBuilder`].
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// The root mapping.
    pub fn root(&self) -> &Arc<Fields> {
        &self.root
    }

    /// Resolves `path` to any node, branch or leaf.
    ///
    /// # Errors
    ///
    /// [`PathError::UnknownField`] if a segment is missing and
    /// [`PathError::NotABranch`] if a non-terminal segment is a leaf.
    pub fn node(&self, path: &FieldPath) -> Result<&ConfigNode, PathError> {
        let mut fields: &Fields = self.root.as_ref();
        let mut found: Option<&ConfigNode> = None;

        for (depth, key) in path.segments().iter().enumerate() {
            if let Some(parent) = found {
                match parent {
                    ConfigNode::Branch(children) => fields = children.as_ref(),
                    ConfigNode::Leaf(_) => {
                        return Err(PathError::NotABranch {
                            path: path.prefix(depth),
                        })
                    }
                }
            }
            let node = fields.get(key).ok_or_else(|| PathError::UnknownField {
                path: path.prefix(depth + 1),
            })?;
            found = Some(node);
        }

        found.ok_or(PathError::Empty)
    }

    /// Returns the leaf value at `path`.
    ///
    /// # Errors
    ///
    /// Everything [`node`](Self::node) returns, plus [`PathError::NotALeaf`]
    /// when `path` names a group of fields.
    pub fn get(&self, path: &FieldPath) -> Result<&str, PathError> {
        match self.node(path)? {
            ConfigNode::Leaf(value) => Ok(value),
            ConfigNode::Branch(_) => Err(PathError::NotALeaf {
                path: path.to_string(),
            }),
        }
    }

    /// Returns a new document with the leaf at `path` replaced by `value`.
    ///
    /// Only existing leaves can be written, so the result always has the same
    /// shape as `self`.  Branches not on `path` are shared with `self`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get); `self` is never modified.
    pub fn set(&self, path: &FieldPath, value: impl Into<String>) -> Result<Self, PathError> {
        let root = set_in(&self.root, path, 0, value.into())?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Every leaf path in the document, depth-first in field-name order.
    pub fn leaf_paths(&self) -> Vec<FieldPath> {
        let mut out = Vec::new();
        collect_leaf_paths(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Returns `true` when `self` has exactly the shape of `schema`: the same
    /// field names at every level and a leaf wherever `schema` has a leaf.
    /// Leaf values are not compared.
    pub fn conforms_to(&self, schema: &ConfigDocument) -> bool {
        same_shape(&self.root, &schema.root)
    }
}

fn set_in(fields: &Fields, path: &FieldPath, depth: usize, value: String) -> Result<Fields, PathError> {
    let key = &path.segments()[depth];
    let is_last = depth + 1 == path.len();
    let node = fields.get(key).ok_or_else(|| PathError::UnknownField {
        path: path.prefix(depth + 1),
    })?;

    let replacement = match (node, is_last) {
        (ConfigNode::Leaf(_), true) => ConfigNode::Leaf(value),
        (ConfigNode::Branch(children), false) => {
            ConfigNode::Branch(Arc::new(set_in(children, path, depth + 1, value)?))
        }
        (ConfigNode::Branch(_), true) => {
            return Err(PathError::NotALeaf {
                path: path.to_string(),
            })
        }
        (ConfigNode::Leaf(_), false) => {
            return Err(PathError::NotABranch {
                path: path.prefix(depth + 1),
            })
        }
    };

    // Cloning the map clones the sibling `Arc`s, not the subtrees behind them.
    let mut next = fields.clone();
    next.insert(key.clone(), replacement);
    Ok(next)
}

fn collect_leaf_paths(fields: &Fields, prefix: &mut Vec<String>, out: &mut Vec<FieldPath>) {
    for (key, node) in fields {
        prefix.push(key.clone());
        match node {
            ConfigNode::Leaf(_) => {
                if let Ok(path) = FieldPath::from_segments(prefix.iter().cloned()) {
                    out.push(path);
                }
            }
            ConfigNode::Branch(children) => collect_leaf_paths(children, prefix, out),
        }
        prefix.pop();
    }
}

fn same_shape(candidate: &Fields, schema: &Fields) -> bool {
    candidate.len() == schema.len()
        && schema.iter().all(|(key, expected)| {
            match (candidate.get(key), expected) {
                (Some(ConfigNode::Leaf(_)), ConfigNode::Leaf(_)) => true,
                (Some(ConfigNode::Branch(a)), ConfigNode::Branch(b)) => same_shape(a, b),
                _ => false,
            }
        })
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent constructor for documents.
///
/// ```rust
/// use pagekit_core::{ConfigDocument, FieldPath};
///
/// let doc = ConfigDocument::builder()
///     .leaf("siteName", "Shop")
///     .branch("links", |b| b.leaf("amazon", "#a"))
///     .build();
/// let path = FieldPath::parse("links.amazon").unwrap();
/// assert_eq!(doc.get(&path).unwrap(), "#a");
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    fields: Fields,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a leaf.
    pub fn leaf(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), ConfigNode::Leaf(value.into()));
        self
    }

    /// Adds (or replaces) a nested group of fields built by `build`.
    pub fn branch(
        mut self,
        name: impl Into<String>,
        build: impl FnOnce(DocumentBuilder) -> DocumentBuilder,
    ) -> Self {
        let child = build(DocumentBuilder::new());
        self.fields
            .insert(name.into(), ConfigNode::Branch(Arc::new(child.fields)));
        self
    }

    pub fn build(self) -> ConfigDocument {
        ConfigDocument {
            root: Arc::new(self.fields),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

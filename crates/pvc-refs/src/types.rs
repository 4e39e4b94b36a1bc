//! Core reference types: stored values and the resolved ref hierarchy.

use std::collections::BTreeMap;
use std::fmt;

use pvc_types::ObjectId;
use serde::Serialize;

use crate::error::{RefError, Result};

/// Prefix marking a symbolic reference in a ref file.
pub const SYMREF_PREFIX: &str = "ref: ";

/// The content of a single reference file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefValue {
    /// Points directly at an object.
    Direct(ObjectId),
    /// Points at another reference by name (`ref: refs/heads/master`).
    Symbolic(String),
}

impl RefValue {
    /// Parse ref file content. A single trailing newline is ignored.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let line = content.strip_suffix('\n').unwrap_or(content);
        if let Some(target) = line.strip_prefix(SYMREF_PREFIX) {
            return Ok(Self::Symbolic(target.trim().to_string()));
        }
        ObjectId::from_hex(line.trim()).map(Self::Direct).map_err(|_| {
            RefError::MalformedRef {
                name: name.to_string(),
                content: content.to_string(),
            }
        })
    }

    /// Render as ref file content, newline-terminated.
    pub fn to_file_content(&self) -> String {
        format!("{self}\n")
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }
}

impl fmt::Display for RefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(id) => write!(f, "{id}"),
            Self::Symbolic(target) => write!(f, "{SYMREF_PREFIX}{target}"),
        }
    }
}

/// A node in a [`RefTree`]: a resolved ref or a nested directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RefNode {
    Ref(ObjectId),
    Dir(RefTree),
}

/// Resolved reference hierarchy, one level per path component.
///
/// Children are kept in a `BTreeMap`, so iteration is always in
/// lexicographic name order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RefTree {
    children: BTreeMap<String, RefNode>,
}

impl RefTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved ref at a slash-separated path relative to this tree.
    ///
    /// A path that runs through an existing leaf replaces the leaf with a
    /// directory.
    pub fn insert(&mut self, path: &str, id: ObjectId) {
        let mut node = self;
        let mut components = path.split('/').peekable();
        while let Some(component) = components.next() {
            if components.peek().is_none() {
                node.children.insert(component.to_string(), RefNode::Ref(id));
                return;
            }
            let child = node
                .children
                .entry(component.to_string())
                .or_insert_with(|| RefNode::Dir(RefTree::new()));
            if let RefNode::Ref(_) = child {
                *child = RefNode::Dir(RefTree::new());
            }
            node = match child {
                RefNode::Dir(tree) => tree,
                RefNode::Ref(_) => return,
            };
        }
    }

    /// Look up a node by slash-separated path.
    pub fn get(&self, path: &str) -> Option<&RefNode> {
        let mut components = path.split('/');
        let first = components.next()?;
        let mut node = self.children.get(first)?;
        for component in components {
            node = match node {
                RefNode::Dir(tree) => tree.children.get(component)?,
                RefNode::Ref(_) => return None,
            };
        }
        Some(node)
    }

    /// Immediate children in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &RefNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaf refs anywhere in the tree.
    pub fn len(&self) -> usize {
        self.flatten("").len()
    }

    /// Flatten to `(id, "<prefix>/<path>")` pairs in sorted path order, as
    /// printed by `show-ref`.
    pub fn flatten(&self, prefix: &str) -> Vec<(ObjectId, String)> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        push_children(&mut stack, prefix, self);
        while let Some((path, node)) = stack.pop() {
            match node {
                RefNode::Ref(id) => out.push((*id, path)),
                RefNode::Dir(tree) => push_children(&mut stack, &path, tree),
            }
        }
        out
    }
}

// Children are pushed in reverse so they pop in ascending order.
fn push_children<'a>(stack: &mut Vec<(String, &'a RefNode)>, base: &str, tree: &'a RefTree) {
    for (name, node) in tree.children.iter().rev() {
        let path = if base.is_empty() {
            name.clone()
        } else {
            format!("{base}/{name}")
        };
        stack.push((path, node));
    }
}

//! # Error Contextualizer
//!
//! Converts the validator's flat violation list into an [`ErrorSchema`]:
//! a sparse tree shaped like the form data in which every node on the
//! path to a violation exists and only nodes with violations carry
//! messages. Nodes with no errors anywhere below them are never created.
//!
//! Serialised, the tree reads
//!
//! ```json
//! {"list": {"1": {"__errors": ["should NOT be shorter than 4 characters"]}}}
//! ```

use formstate_core::{join_path, parse_path};
use formstate_schema::Violation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sparse tree of validation messages keyed like the form data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSchema {
    #[serde(rename = "__errors", default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(flatten)]
    pub children: IndexMap<String, ErrorSchema>,
}

/// One entry of the flattened error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Dotted path of the node; empty for the form root.
    pub path: String,
    pub message: String,
    /// `"<path>: <message>"`, with `root` standing in for the empty path.
    pub stack: String,
}

impl ErrorSchema {
    /// True when the tree holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.children.values().all(ErrorSchema::is_empty)
    }

    /// Record `message` at the node addressed by `path`, creating the
    /// intermediate nodes.
    pub fn add_error(&mut self, path: &str, message: impl Into<String>) {
        let node = parse_path(path)
            .into_iter()
            .fold(self, |node, segment| node.children.entry(segment).or_default());
        node.errors.push(message.into());
    }

    /// Messages recorded exactly at `path`.
    pub fn errors_at(&self, path: &str) -> &[String] {
        self.get(path)
            .map(|node| node.errors.as_slice())
            .unwrap_or_default()
    }

    /// The subtree addressed by `path`.
    pub fn get(&self, path: &str) -> Option<&ErrorSchema> {
        parse_path(path)
            .iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Fold `other` into this tree, appending messages node by node.
    pub fn merge(&mut self, other: ErrorSchema) {
        self.errors.extend(other.errors);
        for (key, child) in other.children {
            self.children.entry(key).or_default().merge(child);
        }
    }

    /// Total number of messages in the tree.
    pub fn len(&self) -> usize {
        self.errors.len() + self.children.values().map(ErrorSchema::len).sum::<usize>()
    }
}

/// Build the error tree for a flat list of violations.
pub fn contextualize(violations: &[Violation]) -> ErrorSchema {
    let mut schema = ErrorSchema::default();
    for violation in violations {
        schema.add_error(&violation.path, violation.message.clone());
    }
    schema
}

/// Flatten an error tree, parents before children.
pub fn to_error_list(schema: &ErrorSchema) -> Vec<ErrorEntry> {
    let mut out = Vec::new();
    collect(schema, "", &mut out);
    out
}

fn collect(node: &ErrorSchema, path: &str, out: &mut Vec<ErrorEntry>) {
    let label = if path.is_empty() { "root" } else { path };
    out.extend(node.errors.iter().map(|message| ErrorEntry {
        path: path.to_string(),
        message: message.clone(),
        stack: format!("{label}: {message}"),
    }));
    for (key, child) in &node.children {
        collect(child, &join_path(path, key), out);
    }
}

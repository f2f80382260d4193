//! # Address Trees
//!
//! Every addressable node of a form gets two addresses:
//!
//! - an **id** (`root_list_0_title`): the id prefix joined with the chain of
//!   property names and array indices using the id separator, stable across
//!   recomputations and suitable as a DOM id;
//! - a **path** (`list.0.title`): the same chain joined with `.` and no
//!   prefix, used to address the data itself.
//!
//! Both trees are rebuilt from scratch from a [`ResolvedSchema`] on every
//! change. Objects contribute their resolved properties in declared order,
//! arrays one child per data element; deferred recursive properties have
//! no data and therefore no address.

use formstate_core::join_path;
use indexmap::IndexMap;
use serde::Serialize;

use crate::resolved::{ResolvedSchema, SchemaSlot};

/// Tree of stable identifiers, one per addressable node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdSchema {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(flatten)]
    pub children: IndexMap<String, IdSchema>,
}

impl IdSchema {
    /// The child addressed by a property name or array index.
    pub fn get(&self, key: &str) -> Option<&IdSchema> {
        self.children.get(key)
    }

    /// All ids in the tree, parents before children.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = vec![self.id.as_str()];
        for child in self.children.values() {
            out.extend(child.ids());
        }
        out
    }
}

/// Tree of dotted data paths, one per addressable node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSchema {
    #[serde(rename = "$name")]
    pub name: String,
    #[serde(flatten)]
    pub children: IndexMap<String, PathSchema>,
}

impl PathSchema {
    /// Leaf nodes address a value with no addressable children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The child addressed by a property name or array index.
    pub fn get(&self, key: &str) -> Option<&PathSchema> {
        self.children.get(key)
    }

    /// Paths of all leaf nodes, in traversal order.
    pub fn leaves(&self) -> Vec<&str> {
        if self.is_leaf() {
            return vec![self.name.as_str()];
        }
        self.children.values().flat_map(PathSchema::leaves).collect()
    }
}

/// Build the identifier tree rooted at `id_prefix`.
pub fn build_id_schema(schema: &ResolvedSchema, id_prefix: &str, id_separator: &str) -> IdSchema {
    IdSchema {
        id: id_prefix.to_string(),
        children: child_nodes(schema, |key, child| {
            build_id_schema(child, &format!("{id_prefix}{id_separator}{key}"), id_separator)
        }),
    }
}

/// Build the dotted-path tree rooted at `base_path` (empty at the form root).
pub fn build_path_schema(schema: &ResolvedSchema, base_path: &str) -> PathSchema {
    PathSchema {
        name: base_path.to_string(),
        children: child_nodes(schema, |key, child| {
            build_path_schema(child, &join_path(base_path, key))
        }),
    }
}

fn child_nodes<T>(
    schema: &ResolvedSchema,
    build: impl Fn(&str, &ResolvedSchema) -> T,
) -> IndexMap<String, T> {
    let properties = schema.properties.iter().filter_map(|(key, slot)| match slot {
        SchemaSlot::Resolved(child) => Some((key.clone(), build(key, child))),
        SchemaSlot::Deferred(_) => None,
    });
    let elements = schema
        .elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let key = index.to_string();
            let node = build(&key, element);
            (key, node)
        });
    properties.chain(elements).collect()
}

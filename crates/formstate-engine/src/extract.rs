//! # Field-Selection Extractor
//!
//! Decides which parts of the form data are addressed by the schema and
//! prunes everything else (the `omit_extra_data` behaviour).
//!
//! A *field name* is the dotted path of a value the schema addresses and
//! that is not itself broken down into further addressed fields: a scalar,
//! `null`, an empty container, or any value sitting at a leaf of the path
//! tree. [`used_form_data`] rebuilds a value from such a set of paths.

use std::collections::BTreeSet;

use formstate_core::{join_path, parse_path, value_at};
use formstate_schema::PathSchema;
use serde_json::{Map, Value};

/// The addressed leaf paths of `data` under `path_schema`.
///
/// A node is recorded when it is a leaf of the path tree or its value is
/// not a non-empty container. A leaf whose value is an object (a schema
/// with `type: object` and no `properties`) is therefore recorded whole,
/// and its free-form contents survive pruning. Only values present in
/// `data` are recorded.
pub fn field_names(path_schema: &PathSchema, data: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_fields(path_schema, data, &mut out);
    out
}

fn collect_fields(node: &PathSchema, data: &Value, out: &mut BTreeSet<String>) {
    let Some(value) = value_at(data, &node.name) else {
        return;
    };
    if node.is_leaf() || !is_nonempty_container(value) {
        out.insert(node.name.clone());
        return;
    }
    for child in node.children.values() {
        collect_fields(child, data, out);
    }
}

/// Every leaf path of `data`: scalars, `null` and empty containers.
pub fn leaf_paths(data: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_leaves(data, "", &mut out);
    out
}

fn collect_leaves(value: &Value, path: &str, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                collect_leaves(child, &join_path(path, key), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                collect_leaves(child, &join_path(path, &index.to_string()), out);
            }
        }
        _ => {
            out.insert(path.to_string());
        }
    }
}

/// Rebuild `data` keeping only the values at `fields`.
///
/// Containers along each path are recreated with the same kind as in
/// `data`. Array positions that no field covers become `null`. A scalar
/// root is returned unchanged.
pub fn used_form_data(data: &Value, fields: &BTreeSet<String>) -> Value {
    let mut out = match data {
        Value::Object(_) => Value::Object(Map::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        scalar => return scalar.clone(),
    };
    for field in fields {
        let segments = parse_path(field);
        if let Some(value) = value_at(data, field) {
            place(&mut out, data, &segments, value.clone());
        }
    }
    out
}

fn place(target: &mut Value, source: &Value, segments: &[String], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    match source {
        Value::Object(map) => {
            let Some(child_source) = map.get(segment) else {
                return;
            };
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(out) = target {
                let slot = out.entry(segment.clone()).or_insert(Value::Null);
                place(slot, child_source, rest, value);
            }
        }
        Value::Array(items) => {
            let Some((index, child_source)) = segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index).map(|item| (index, item)))
            else {
                return;
            };
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(out) = target {
                if out.len() <= index {
                    out.resize(index + 1, Value::Null);
                }
                place(&mut out[index], child_source, rest, value);
            }
        }
        _ => {}
    }
}

fn is_nonempty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

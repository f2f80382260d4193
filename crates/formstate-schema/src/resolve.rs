//! # Schema Resolver
//!
//! Turns a raw schema plus the current form data into a [`ResolvedSchema`].
//!
//! ## Reference Resolution
//!
//! `$ref` pointers have the form `#/definitions/<name>` optionally followed
//! by `/properties/<field>`, `/items` or `/definitions/<name>` steps into
//! the referenced schema. Local keywords are deep-merged over the target:
//! local scalars win, `properties` merge per key, `required` is the union.
//! A reference that cannot be located is a [`ResolveError::BrokenReference`].
//! References to other documents (anything not starting with `#`) are
//! left in place for the validator, which looks them up among its
//! registered schemas.
//!
//! ## Dependencies
//!
//! A `dependencies` entry applies only when its key is present in the
//! node's data. Property lists extend `required`; schemas are merged in.
//! A schema with `oneOf` selects the single branch whose restriction on the
//! key accepts the current value. Branches that do not restrict the key, or
//! that cannot be told apart by the value, select nothing and are logged.
//!
//! ## Termination
//!
//! Definitions that can reach themselves through `$ref` are recursive.
//! Such a reference is only expanded when there is data behind it: object
//! properties without data stay [`SchemaSlot::Deferred`] and array items
//! are resolved once per existing element. Resolution depth is therefore
//! bounded by the depth of the data, not of the (infinite) schema.

use std::collections::{HashMap, HashSet};

use formstate_core::{Dependency, ResolveError, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::resolved::{ResolvedSchema, SchemaSlot};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Resolve `schema` against the root `definitions` and the current data.
pub fn resolve(
    schema: &Schema,
    definitions: &IndexMap<String, Schema>,
    data: Option<&Value>,
) -> Result<ResolvedSchema, ResolveError> {
    Resolver::new(definitions).resolve(schema, data)
}

/// Reference resolver bound to one set of root definitions.
#[derive(Debug)]
pub struct Resolver<'a> {
    definitions: &'a IndexMap<String, Schema>,
    /// Definition names that can reach themselves through `$ref`.
    recursive: HashSet<String>,
}

impl<'a> Resolver<'a> {
    /// Build a resolver and analyse `definitions` for recursion.
    pub fn new(definitions: &'a IndexMap<String, Schema>) -> Self {
        let recursive = recursive_definitions(definitions);
        if !recursive.is_empty() {
            debug!(definitions = ?recursive, "recursive definitions will be expanded lazily");
        }
        Self {
            definitions,
            recursive,
        }
    }

    /// Resolve a schema node and its subtree against `data`.
    pub fn resolve(
        &self,
        schema: &Schema,
        data: Option<&Value>,
    ) -> Result<ResolvedSchema, ResolveError> {
        let node = self.dereference(schema)?;
        let node = self.apply_dependencies(node, data)?;
        self.build(node, data)
    }

    /// Expand the `$ref` chain at the top of `schema` only.
    ///
    /// Children are left untouched. The result keeps a `reference` only
    /// when the chain ends at an external document.
    pub fn dereference(&self, schema: &Schema) -> Result<Schema, ResolveError> {
        self.expand(schema.clone(), &mut Vec::new())
    }

    /// Whether the definition named by a `$ref` can reach itself.
    pub fn is_recursive(&self, schema: &Schema) -> bool {
        schema
            .reference
            .as_deref()
            .and_then(definition_name)
            .is_some_and(|name| self.recursive.contains(&name))
    }

    fn expand(&self, mut node: Schema, chain: &mut Vec<String>) -> Result<Schema, ResolveError> {
        while let Some(reference) = node.reference.take() {
            if is_external(&reference) {
                debug!(reference = %reference, "external reference left to the validator");
                node.reference = Some(reference);
                break;
            }
            if chain.contains(&reference) {
                chain.push(reference);
                return Err(ResolveError::CircularReference {
                    chain: chain.clone(),
                });
            }
            chain.push(reference.clone());
            let target = self.lookup(&reference, chain)?;
            warn_on_type_conflict(&reference, &target, &node);
            node = merge_schemas(target, node);
        }
        Ok(node)
    }

    fn lookup(&self, reference: &str, chain: &mut Vec<String>) -> Result<Schema, ResolveError> {
        let rest = reference
            .strip_prefix(DEFINITIONS_PREFIX)
            .ok_or_else(|| ResolveError::InvalidPointer {
                reference: reference.to_string(),
                reason: format!("local pointers must start with '{DEFINITIONS_PREFIX}'"),
            })?;
        let broken = || ResolveError::BrokenReference {
            reference: reference.to_string(),
        };

        let mut segments = rest.split('/').map(unescape);
        let name = segments.next().ok_or_else(broken)?;
        let mut current = self.definitions.get(&name).cloned().ok_or_else(broken)?;

        while let Some(step) = segments.next() {
            // Walking into a node requires its own reference chain expanded first.
            current = self.expand(current, chain)?;
            current = match step.as_str() {
                "properties" => {
                    let field = segments.next().ok_or_else(broken)?;
                    current.properties.shift_remove(&field).ok_or_else(broken)?
                }
                "definitions" => {
                    let field = segments.next().ok_or_else(broken)?;
                    current.definitions.shift_remove(&field).ok_or_else(broken)?
                }
                "items" => *current.items.take().ok_or_else(broken)?,
                other => {
                    return Err(ResolveError::InvalidPointer {
                        reference: reference.to_string(),
                        reason: format!("cannot step into '{other}'"),
                    })
                }
            };
        }
        Ok(current)
    }

    fn apply_dependencies(
        &self,
        mut node: Schema,
        data: Option<&Value>,
    ) -> Result<Schema, ResolveError> {
        let mut processed = HashSet::new();
        while !node.dependencies.is_empty() {
            let pending = std::mem::take(&mut node.dependencies);
            for (key, dependency) in pending {
                if !processed.insert(key.clone()) {
                    continue;
                }
                let Some(value) = data.and_then(|d| d.get(&key)) else {
                    continue;
                };
                node = match dependency {
                    Dependency::Properties(names) => {
                        extend_required(&mut node.required, names);
                        node
                    }
                    Dependency::Schema(dependent) => {
                        self.merge_dependency(node, &key, value, &dependent)?
                    }
                };
            }
        }
        Ok(node)
    }

    fn merge_dependency(
        &self,
        node: Schema,
        key: &str,
        value: &Value,
        dependent: &Schema,
    ) -> Result<Schema, ResolveError> {
        let mut dependent = self.dereference(dependent)?;
        let branches = std::mem::take(&mut dependent.one_of);
        let node = merge_schemas(node, dependent);
        if branches.is_empty() {
            return Ok(node);
        }
        match self.select_branch(key, value, &branches)? {
            Some(mut branch) => {
                branch.properties.shift_remove(key);
                debug!(dependency = key, "merged dependency branch");
                Ok(merge_schemas(node, branch))
            }
            None => Ok(node),
        }
    }

    /// Pick the one branch whose restriction on `key` accepts `value`.
    fn select_branch(
        &self,
        key: &str,
        value: &Value,
        branches: &[Schema],
    ) -> Result<Option<Schema>, ResolveError> {
        let mut matching = Vec::new();
        for (index, branch) in branches.iter().enumerate() {
            let branch = self.dereference(branch)?;
            let Some(restriction) = branch.properties.get(key) else {
                warn!(
                    dependency = key,
                    branch = index,
                    "malformed dependency branch: no restriction on the dependent key; no branch selected"
                );
                return Ok(None);
            };
            let restriction = self.dereference(restriction)?;
            if accepts(&restriction, value) {
                matching.push(branch);
            }
        }
        if matching.len() > 1 {
            warn!(
                dependency = key,
                matches = matching.len(),
                "malformed dependency branch: branches are not distinguishable by value; no branch selected"
            );
            return Ok(None);
        }
        Ok(matching.pop())
    }

    fn build(&self, node: Schema, data: Option<&Value>) -> Result<ResolvedSchema, ResolveError> {
        let object = data.and_then(Value::as_object);
        let mut properties = IndexMap::with_capacity(node.properties.len());
        for (key, schema) in node.properties {
            let child = object.and_then(|map| map.get(&key));
            let slot = if child.is_none() && self.is_recursive(&schema) {
                SchemaSlot::Deferred(schema)
            } else {
                SchemaSlot::Resolved(self.resolve(&schema, child)?)
            };
            properties.insert(key, slot);
        }

        let elements = match (&node.items, data) {
            (Some(items), Some(Value::Array(values))) => values
                .iter()
                .map(|value| self.resolve(items, Some(value)))
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        Ok(ResolvedSchema {
            reference: node.reference,
            types: node.types,
            properties,
            required: node.required,
            items: node.items,
            elements,
            enum_values: node.enum_values,
            default: node.default,
            one_of: node.one_of,
            keywords: node.keywords,
        })
    }
}

/// Deep-merge `overlay` onto `base`.
///
/// Scalar keywords from `overlay` win, `properties` and `items` merge
/// recursively, `required` is the ordered union, and maps of definitions,
/// dependencies and pass-through keywords merge per key.
pub fn merge_schemas(mut base: Schema, overlay: Schema) -> Schema {
    if overlay.reference.is_some() {
        base.reference = overlay.reference;
    }
    if overlay.types.is_some() {
        base.types = overlay.types;
    }
    for (key, schema) in overlay.properties {
        match base.properties.get_mut(&key) {
            Some(existing) => {
                let merged = merge_schemas(std::mem::take(existing), schema);
                *existing = merged;
            }
            None => {
                base.properties.insert(key, schema);
            }
        }
    }
    base.items = match (base.items, overlay.items) {
        (Some(b), Some(o)) => Some(Box::new(merge_schemas(*b, *o))),
        (b, o) => o.or(b),
    };
    extend_required(&mut base.required, overlay.required);
    if overlay.enum_values.is_some() {
        base.enum_values = overlay.enum_values;
    }
    if overlay.default.is_some() {
        base.default = overlay.default;
    }
    base.definitions.extend(overlay.definitions);
    base.dependencies.extend(overlay.dependencies);
    if !overlay.one_of.is_empty() {
        base.one_of = overlay.one_of;
    }
    base.keywords.extend(overlay.keywords);
    base
}

fn extend_required(required: &mut Vec<String>, names: Vec<String>) {
    for name in names {
        if !required.contains(&name) {
            required.push(name);
        }
    }
}

fn warn_on_type_conflict(reference: &str, target: &Schema, local: &Schema) {
    if let (Some(target_type), Some(local_type)) = (&target.types, &local.types) {
        if target_type != local_type {
            warn!(
                reference,
                local = ?local_type,
                referenced = ?target_type,
                "conflicting type declarations; keeping the local type"
            );
        }
    }
}

/// Check a dependent value against a branch restriction with the validator.
fn accepts(restriction: &Schema, value: &Value) -> bool {
    let document = match restriction.to_value() {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "dependency restriction could not be serialized");
            return false;
        }
    };
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    match opts.build(&document) {
        Ok(validator) => validator.is_valid(value),
        Err(e) => {
            warn!(error = %e, "dependency restriction is not a valid schema");
            false
        }
    }
}

fn is_external(reference: &str) -> bool {
    !reference.starts_with('#')
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// The definition name a `#/definitions/<name>/...` pointer starts at.
fn definition_name(reference: &str) -> Option<String> {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .and_then(|rest| rest.split('/').next())
        .map(unescape)
}

fn collect_references(schema: &Schema, out: &mut HashSet<String>) {
    if let Some(name) = schema.reference.as_deref().and_then(definition_name) {
        out.insert(name);
    }
    for child in schema.properties.values() {
        collect_references(child, out);
    }
    if let Some(items) = &schema.items {
        collect_references(items, out);
    }
    for child in schema.definitions.values() {
        collect_references(child, out);
    }
    for dependency in schema.dependencies.values() {
        if let Dependency::Schema(child) = dependency {
            collect_references(child, out);
        }
    }
    for child in &schema.one_of {
        collect_references(child, out);
    }
}

/// Names of definitions that can reach themselves through references.
fn recursive_definitions(definitions: &IndexMap<String, Schema>) -> HashSet<String> {
    let edges: HashMap<&str, HashSet<String>> = definitions
        .iter()
        .map(|(name, schema)| {
            let mut refs = HashSet::new();
            collect_references(schema, &mut refs);
            (name.as_str(), refs)
        })
        .collect();

    definitions
        .keys()
        .filter(|start| {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut stack: Vec<&str> = edges
                .get(start.as_str())
                .map(|refs| refs.iter().map(String::as_str).collect())
                .unwrap_or_default();
            while let Some(name) = stack.pop() {
                if name == start.as_str() {
                    return true;
                }
                if seen.insert(name) {
                    if let Some(next) = edges.get(name) {
                        stack.extend(next.iter().map(String::as_str));
                    }
                }
            }
            false
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        Schema::from_value(value).unwrap()
    }

    fn resolve_root(root: &Schema, data: Option<&Value>) -> Result<ResolvedSchema, ResolveError> {
        resolve(root, &root.definitions, data)
    }

    #[test]
    fn single_definition_reference() {
        let root = schema(json!({
            "definitions": {"testdef": {"type": "string", "default": "hello"}},
            "$ref": "#/definitions/testdef"
        }));
        let resolved = resolve_root(&root, None).unwrap();
        assert_eq!(resolved.types, Some(formstate_core::TypeDecl::One(formstate_core::SchemaType::String)));
        assert_eq!(resolved.default, Some(json!("hello")));
    }

    #[test]
    fn references_into_definition_properties() {
        let root = schema(json!({
            "definitions": {
                "testdef": {"$ref": "#/definitions/testdefref1"},
                "testdefref1": {"$ref": "#/definitions/testdefref2"},
                "testdefref2": {"type": "object", "properties": {"bar": {"type": "string"}}}
            },
            "type": "object",
            "properties": {"foo": {"$ref": "#/definitions/testdef/properties/bar"}}
        }));
        let resolved = resolve_root(&root, None).unwrap();
        let foo = resolved.property("foo").unwrap();
        assert_eq!(foo.primary_type(), Some(formstate_core::SchemaType::String));
    }

    #[test]
    fn follows_reference_chains() {
        let root = schema(json!({
            "definitions": {
                "bar": {"$ref": "#/definitions/bar2"},
                "bar2": {"$ref": "#/definitions/qux"},
                "qux": {"type": "string"}
            },
            "type": "object",
            "required": ["foo"],
            "properties": {"foo": {"$ref": "#/definitions/bar"}}
        }));
        let resolved = resolve_root(&root, None).unwrap();
        assert_eq!(
            resolved.property("foo").unwrap().primary_type(),
            Some(formstate_core::SchemaType::String)
        );
    }

    #[test]
    fn broken_reference_is_fatal() {
        let root = schema(json!({
            "type": "object",
            "properties": {"foo": {"$ref": "#/definitions/nonexistent"}}
        }));
        let err = resolve_root(&root, None).unwrap_err();
        assert_eq!(
            err,
            ResolveError::BrokenReference {
                reference: "#/definitions/nonexistent".into()
            }
        );
        assert!(err.to_string().contains("#/definitions/nonexistent"));
    }

    #[test]
    fn pure_reference_cycles_are_reported() {
        let root = schema(json!({
            "definitions": {
                "a": {"$ref": "#/definitions/b"},
                "b": {"$ref": "#/definitions/a"}
            },
            "$ref": "#/definitions/a"
        }));
        assert!(matches!(
            resolve_root(&root, None),
            Err(ResolveError::CircularReference { .. })
        ));
    }

    #[test]
    fn local_pointers_outside_definitions_are_rejected() {
        let root = schema(json!({"$ref": "#/properties/foo"}));
        assert!(matches!(
            resolve_root(&root, None),
            Err(ResolveError::InvalidPointer { .. })
        ));
    }

    #[test]
    fn external_references_are_kept_for_the_validator() {
        let root = schema(json!({
            "definitions": {"price": {"$ref": "https://example.com/money.json"}},
            "type": "object",
            "properties": {
                "direct": {"$ref": "https://example.com/money.json"},
                "aliased": {"$ref": "#/definitions/price"}
            }
        }));
        let resolved = resolve_root(&root, None).unwrap();
        for key in ["direct", "aliased"] {
            assert_eq!(
                resolved.property(key).unwrap().reference.as_deref(),
                Some("https://example.com/money.json")
            );
        }
        let doc = resolved.validation_document(&root.definitions).unwrap();
        assert_eq!(doc["properties"]["direct"]["$ref"], "https://example.com/money.json");
    }

    #[test]
    fn local_keywords_win_over_the_target() {
        let root = schema(json!({
            "type": "object",
            "properties": {
                "foo": {"title": "custom title", "$ref": "#/definitions/objectDef"}
            },
            "definitions": {
                "objectDef": {
                    "type": "object",
                    "title": "definition title",
                    "properties": {"field": {"type": "string"}}
                }
            }
        }));
        let resolved = resolve_root(&root, None).unwrap();
        let foo = resolved.property("foo").unwrap();
        assert_eq!(foo.keywords["title"], json!("custom title"));
        assert!(foo.property("field").is_some());
    }

    #[test]
    fn local_type_wins_on_conflict() {
        let root = schema(json!({
            "definitions": {"num": {"type": "number", "minimum": 1}},
            "type": "string",
            "$ref": "#/definitions/num"
        }));
        let resolved = resolve_root(&root, None).unwrap();
        assert_eq!(resolved.primary_type(), Some(formstate_core::SchemaType::String));
        assert_eq!(resolved.keywords["minimum"], json!(1));
    }

    fn branching_schema() -> Schema {
        schema(json!({
            "type": "object",
            "properties": {
                "branch": {"type": "number", "enum": [1, 2, 3], "default": 1}
            },
            "required": ["branch"],
            "dependencies": {
                "branch": {
                    "oneOf": [
                        {
                            "properties": {"branch": {"enum": [1]}, "field1": {"type": "number"}},
                            "required": ["field1"]
                        },
                        {
                            "properties": {
                                "branch": {"enum": [2]},
                                "field1": {"type": "number"},
                                "field2": {"type": "number"}
                            },
                            "required": ["field1", "field2"]
                        }
                    ]
                }
            }
        }))
    }

    #[test]
    fn dependency_branch_selected_by_value() {
        let root = branching_schema();
        let resolved = resolve_root(&root, Some(&json!({"branch": 2}))).unwrap();
        let keys: Vec<&str> = resolved.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["branch", "field1", "field2"]);
        assert_eq!(resolved.required, vec!["branch", "field1", "field2"]);
        // The branch restriction on the key itself is not merged.
        assert_eq!(resolved.property("branch").unwrap().enum_values, Some(vec![json!(1), json!(2), json!(3)]));
    }

    #[test]
    fn no_matching_branch_keeps_intrinsic_required() {
        let root = branching_schema();
        let resolved = resolve_root(&root, Some(&json!({"branch": 3}))).unwrap();
        assert_eq!(resolved.required, vec!["branch"]);
        assert!(resolved.property("field1").is_none());
    }

    #[test]
    fn dependency_ignored_without_data() {
        let root = branching_schema();
        let resolved = resolve_root(&root, None).unwrap();
        assert_eq!(resolved.properties.len(), 1);
    }

    #[test]
    fn indistinguishable_branches_select_nothing() {
        let root = schema(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "dependencies": {
                "a": {"oneOf": [
                    {"properties": {"a": {"type": "string"}, "b": {"type": "string"}}},
                    {"properties": {"a": {"type": "string"}, "c": {"type": "string"}}}
                ]}
            }
        }));
        let resolved = resolve_root(&root, Some(&json!({"a": "x"}))).unwrap();
        assert!(resolved.property("b").is_none());
        assert!(resolved.property("c").is_none());
    }

    #[test]
    fn unrestricted_branch_selects_nothing() {
        let root = schema(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "dependencies": {
                "a": {"oneOf": [
                    {"properties": {"a": {"enum": ["x"]}, "b": {"type": "string"}}},
                    {"properties": {"c": {"type": "string"}}}
                ]}
            }
        }));
        let resolved = resolve_root(&root, Some(&json!({"a": "x"}))).unwrap();
        assert_eq!(resolved.properties.len(), 1);
    }

    #[test]
    fn property_dependencies_extend_required() {
        let root = schema(json!({
            "type": "object",
            "properties": {"credit_card": {"type": "number"}, "billing_address": {"type": "string"}},
            "dependencies": {"credit_card": ["billing_address"]}
        }));
        let without = resolve_root(&root, Some(&json!({}))).unwrap();
        let with = resolve_root(&root, Some(&json!({"credit_card": 1}))).unwrap();
        assert!(without.required.is_empty());
        assert!(with.is_required("billing_address"));
    }

    #[test]
    fn plain_schema_dependency_is_merged() {
        let root = schema(json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "dependencies": {
                "name": {"properties": {"age": {"type": "integer"}}, "required": ["age"]}
            }
        }));
        let resolved = resolve_root(&root, Some(&json!({"name": "a"}))).unwrap();
        assert!(resolved.property("age").is_some());
        assert!(resolved.is_required("age"));
    }

    fn tree_schema() -> Schema {
        schema(json!({
            "$ref": "#/definitions/node",
            "definitions": {
                "node": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "children": {"type": "array", "items": {"$ref": "#/definitions/node"}}
                    }
                }
            }
        }))
    }

    #[test]
    fn recursive_items_resolve_to_data_depth() {
        let root = tree_schema();
        let empty = resolve_root(&root, None).unwrap();
        assert!(empty.property("children").unwrap().elements.is_empty());

        let data = json!({"children": [{"children": [{}]}, {}]});
        let resolved = resolve_root(&root, Some(&data)).unwrap();
        let children = resolved.property("children").unwrap();
        assert_eq!(children.elements.len(), 2);
        let grandchildren = children.elements[0].property("children").unwrap();
        assert_eq!(grandchildren.elements.len(), 1);
        assert!(grandchildren.elements[0].property("children").unwrap().elements.is_empty());
    }

    #[test]
    fn recursive_properties_are_deferred_without_data() {
        let root = schema(json!({
            "$ref": "#/definitions/link",
            "definitions": {
                "link": {
                    "type": "object",
                    "properties": {"value": {"type": "number"}, "next": {"$ref": "#/definitions/link"}}
                }
            }
        }));
        let resolved = resolve_root(&root, Some(&json!({"value": 1, "next": {"value": 2}}))).unwrap();
        let next = resolved.property("next").unwrap();
        assert!(matches!(next.properties["next"], SchemaSlot::Deferred(_)));
    }

    #[test]
    fn resolution_is_idempotent() {
        let root = branching_schema();
        let data = json!({"branch": 2, "field1": 1});
        let once = resolve_root(&root, Some(&data)).unwrap();
        let twice = resolve(&once.to_schema(), &root.definitions, Some(&data)).unwrap();
        assert_eq!(once, twice);

        let tree = tree_schema();
        let data = json!({"name": "a", "children": [{"name": "b"}]});
        let once = resolve_root(&tree, Some(&data)).unwrap();
        let twice = resolve(&once.to_schema(), &tree.definitions, Some(&data)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_unions_required_and_merges_properties() {
        let base = schema(json!({"required": ["a"], "properties": {"a": {"type": "string", "title": "A"}}}));
        let overlay = schema(json!({"required": ["a", "b"], "properties": {"a": {"title": "AA"}, "b": {}}}));
        let merged = merge_schemas(base, overlay);
        assert_eq!(merged.required, vec!["a", "b"]);
        assert_eq!(merged.properties["a"].keywords["title"], json!("AA"));
        assert!(merged.properties["a"].types.is_some());
    }

    #[test]
    fn detects_recursive_definitions() {
        let root = schema(json!({
            "definitions": {
                "node": {"properties": {"kids": {"items": {"$ref": "#/definitions/node"}}}},
                "ping": {"properties": {"p": {"$ref": "#/definitions/pong"}}},
                "pong": {"properties": {"p": {"$ref": "#/definitions/ping"}}},
                "leaf": {"type": "string"},
                "user": {"properties": {"l": {"$ref": "#/definitions/leaf"}}}
            }
        }));
        let found = recursive_definitions(&root.definitions);
        let mut names: Vec<&str> = found.iter().map(String::as_str).collect();
        names.sort();
        assert_eq!(names, vec!["node", "ping", "pong"]);
    }
}

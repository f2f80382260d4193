//! # Default-State Synthesizer
//!
//! Produces the canonical form data for a resolved schema from whatever
//! data the caller supplied.
//!
//! ## Rules
//!
//! - **Absent** values (`None`, or a key missing from an object) are
//!   synthesized: objects are built from their properties' defaults,
//!   arrays take the declared `default` array or start empty, scalars take
//!   the declared `default` or stay absent.
//! - **Cleared** values (`null`) are kept. A user who emptied a field does
//!   not get the default back.
//! - Values whose kind matches the declared `type` are kept; containers
//!   are reconciled recursively. Unknown object keys pass through.
//! - Values of the wrong kind are treated as absent: they are replaced by
//!   the default when one is declared, otherwise a scalar is dropped, an
//!   array starts empty and an object is rebuilt from its properties.
//!   Inside an array a dropped element becomes `null`, so the length is
//!   preserved.
//!
//! A parent object's `default` seeds the defaults of its absent children.
//! Synthesis is idempotent: feeding the output back in returns it unchanged.
//!
//! [`default_form_state`] is what the engine stores: the synthesized value
//! with every value the caller supplied laid back over it, so that a
//! wrongly typed entry stays in the form for the validator to report.

use formstate_core::{ResolveError, Schema, SchemaType};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::resolve::resolve;
use crate::resolved::{ResolvedSchema, SchemaSlot};

/// Reconcile `existing` data against `schema`, filling gaps from defaults.
pub fn synthesize(schema: &ResolvedSchema, existing: Option<&Value>) -> Option<Value> {
    fill(schema, existing, None)
}

/// Fill the gaps in `supplied` from the schema's defaults.
///
/// Every value present in `supplied`, including `null` and values of the
/// wrong type, wins over the synthesized one. Objects and arrays are
/// combined key by key and index by index.
pub fn default_form_state(schema: &ResolvedSchema, supplied: Option<&Value>) -> Option<Value> {
    let synthesized = synthesize(schema, supplied);
    match (synthesized, supplied) {
        (Some(defaults), Some(supplied)) => Some(overlay(defaults, supplied)),
        (None, supplied) => supplied.cloned(),
        (defaults, None) => defaults,
    }
}

fn overlay(defaults: Value, supplied: &Value) -> Value {
    match (defaults, supplied) {
        (Value::Object(mut out), Value::Object(map)) => {
            for (key, value) in map {
                match out.get_mut(key) {
                    Some(slot) => *slot = overlay(std::mem::take(slot), value),
                    None => {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(out)
        }
        (Value::Array(mut out), Value::Array(items)) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, value)| match out.get_mut(index) {
                    Some(slot) => overlay(std::mem::take(slot), value),
                    None => value.clone(),
                })
                .collect(),
        ),
        (_, supplied) => supplied.clone(),
    }
}

/// Synthesize a brand-new array element from the item blueprint.
///
/// The blueprint is resolved with no data behind it, so declared defaults
/// populate immediately.
pub fn fresh_item(
    blueprint: &Schema,
    definitions: &IndexMap<String, Schema>,
) -> Result<Option<Value>, ResolveError> {
    let resolved = resolve(blueprint, definitions, None)?;
    Ok(synthesize(&resolved, None))
}

fn fill(schema: &ResolvedSchema, existing: Option<&Value>, inherited: Option<&Value>) -> Option<Value> {
    let fallback = inherited.or(schema.default.as_ref());
    let value = match existing {
        None => return fresh(schema, fallback),
        Some(Value::Null) => return Some(Value::Null),
        Some(value) => value,
    };

    let matches = schema.types.as_ref().map_or(true, |types| types.admits(value));
    if !matches {
        return fresh(schema, fallback);
    }

    Some(match value {
        Value::Object(map) if schema.primary_type() == Some(SchemaType::Object) => {
            fill_object(schema, map, fallback)
        }
        Value::Array(items) if schema.primary_type() == Some(SchemaType::Array) => {
            fill_array(schema, items)
        }
        other => other.clone(),
    })
}

fn fresh(schema: &ResolvedSchema, fallback: Option<&Value>) -> Option<Value> {
    match schema.primary_type() {
        Some(SchemaType::Object) => {
            let seed = fallback.and_then(Value::as_object);
            let mut out = seed.cloned().unwrap_or_default();
            for (key, slot) in &schema.properties {
                let SchemaSlot::Resolved(child) = slot else {
                    continue;
                };
                let inherited = seed.and_then(|map| map.get(key));
                if let Some(value) = fill(child, None, inherited) {
                    out.insert(key.clone(), value);
                }
            }
            Some(Value::Object(out))
        }
        Some(SchemaType::Array) => Some(match fallback {
            Some(Value::Array(items)) => fill_array(schema, items),
            _ => Value::Array(Vec::new()),
        }),
        _ => fallback.cloned(),
    }
}

fn fill_object(schema: &ResolvedSchema, map: &Map<String, Value>, fallback: Option<&Value>) -> Value {
    let seed = fallback.and_then(Value::as_object);
    let inherited = |key: &str| seed.and_then(|defaults| defaults.get(key));
    let mut out = Map::new();
    for (key, value) in map {
        match schema.property(key) {
            Some(child) => {
                if let Some(value) = fill(child, Some(value), inherited(key)) {
                    out.insert(key.clone(), value);
                }
            }
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    for (key, slot) in &schema.properties {
        let SchemaSlot::Resolved(child) = slot else {
            continue;
        };
        if map.contains_key(key) {
            continue;
        }
        if let Some(value) = fill(child, None, inherited(key)) {
            out.insert(key.clone(), value);
        }
    }
    Value::Object(out)
}

fn fill_array(schema: &ResolvedSchema, items: &[Value]) -> Value {
    Value::Array(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                schema
                    .elements
                    .get(index)
                    .map_or_else(
                        || item.clone(),
                        |element| fill(element, Some(item), None).unwrap_or(Value::Null),
                    )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved(schema: Value, data: Option<&Value>) -> (Schema, ResolvedSchema) {
        let root = Schema::from_value(schema).unwrap();
        let resolved = resolve(&root, &root.definitions, data).unwrap();
        (root, resolved)
    }

    #[test]
    fn referenced_scalar_default() {
        let (_, schema) = resolved(
            json!({
                "definitions": {"testdef": {"type": "string", "default": "hello"}},
                "$ref": "#/definitions/testdef"
            }),
            None,
        );
        assert_eq!(synthesize(&schema, None), Some(json!("hello")));
    }

    #[test]
    fn nested_referenced_default() {
        let (_, schema) = resolved(
            json!({
                "definitions": {"testdef": {"type": "string", "default": "hello"}},
                "type": "object",
                "properties": {"foo": {"$ref": "#/definitions/testdef"}}
            }),
            None,
        );
        assert_eq!(synthesize(&schema, None), Some(json!({"foo": "hello"})));
    }

    #[test]
    fn existing_matching_value_is_kept() {
        let (_, schema) = resolved(json!({"type": "string", "default": "foobar"}), None);
        assert_eq!(synthesize(&schema, Some(&json!("some value"))), Some(json!("some value")));
    }

    #[test]
    fn cleared_value_is_not_replaced() {
        let (_, schema) = resolved(json!({"type": "string", "default": "foo"}), None);
        assert_eq!(synthesize(&schema, Some(&Value::Null)), Some(Value::Null));
        assert_eq!(synthesize(&schema, Some(&json!(""))), Some(json!("")));
    }

    #[test]
    fn mismatched_value_falls_back_to_default() {
        let (_, schema) = resolved(json!({"type": "number", "default": 3}), None);
        assert_eq!(synthesize(&schema, Some(&json!("yo"))), Some(json!(3)));
    }

    #[test]
    fn mismatched_value_without_default_is_dropped() {
        let (_, scalar) = resolved(json!({"type": "number"}), None);
        assert_eq!(synthesize(&scalar, Some(&json!("yo"))), None);

        let (_, array) = resolved(json!({"type": "array", "items": {"type": "string"}}), None);
        assert_eq!(synthesize(&array, Some(&json!({"x": 1}))), Some(json!([])));

        let (_, object) = resolved(
            json!({"type": "object", "properties": {"a": {"type": "string", "default": "x"}}}),
            None,
        );
        assert_eq!(synthesize(&object, Some(&json!(5))), Some(json!({"a": "x"})));
    }

    #[test]
    fn mismatched_property_is_removed_and_element_nulled() {
        let schema_json = json!({
            "type": "object",
            "properties": {
                "n": {"type": "number"},
                "list": {"type": "array", "items": {"type": "number"}}
            }
        });
        let data = json!({"n": "yo", "list": [1, "two", 3], "other": "kept"});
        let (_, schema) = resolved(schema_json, Some(&data));
        assert_eq!(
            synthesize(&schema, Some(&data)),
            Some(json!({"list": [1, null, 3], "other": "kept"}))
        );
    }

    #[test]
    fn supplied_values_win_in_the_form_state() {
        let schema_json = json!({
            "type": "object",
            "properties": {
                "n": {"type": "number", "default": 1},
                "flag": {"type": "boolean", "default": true},
                "list": {"type": "array", "items": {"type": "object", "properties": {"b": {"type": "boolean", "default": false}}}}
            }
        });
        let data = json!({"n": "yo", "list": [{}, {"b": "no"}]});
        let (_, schema) = resolved(schema_json, Some(&data));
        assert_eq!(
            default_form_state(&schema, Some(&data)),
            Some(json!({"n": "yo", "flag": true, "list": [{"b": false}, {"b": "no"}]}))
        );

        let (_, scalar) = resolved(json!({"type": "number"}), None);
        assert_eq!(default_form_state(&scalar, Some(&json!("yo"))), Some(json!("yo")));
        assert_eq!(default_form_state(&scalar, None), None);
    }

    #[test]
    fn absent_scalar_without_default_stays_absent() {
        let (_, schema) = resolved(
            json!({"type": "object", "properties": {"foo": {"type": "string"}}}),
            None,
        );
        assert_eq!(synthesize(&schema, None), Some(json!({})));
    }

    #[test]
    fn unknown_keys_pass_through() {
        let schema_json = json!({
            "type": "object",
            "properties": {"foo": {"type": "string", "default": "x"}}
        });
        let data = json!({"extra": {"deep": 1}});
        let (_, schema) = resolved(schema_json, Some(&data));
        assert_eq!(synthesize(&schema, Some(&data)), Some(json!({"extra": {"deep": 1}, "foo": "x"})));
    }

    #[test]
    fn parent_default_seeds_children() {
        let (_, schema) = resolved(
            json!({
                "type": "object",
                "default": {"foo": "from parent"},
                "properties": {
                    "foo": {"type": "string", "default": "from child"},
                    "bar": {"type": "string", "default": "bar"}
                }
            }),
            None,
        );
        assert_eq!(
            synthesize(&schema, None),
            Some(json!({"foo": "from parent", "bar": "bar"}))
        );
    }

    #[test]
    fn arrays_use_default_or_start_empty() {
        let (_, with_default) = resolved(
            json!({"type": "array", "items": {"type": "string"}, "default": ["a", "b"]}),
            None,
        );
        let (_, without) = resolved(json!({"type": "array", "items": {"type": "string"}}), None);
        assert_eq!(synthesize(&with_default, None), Some(json!(["a", "b"])));
        assert_eq!(synthesize(&without, None), Some(json!([])));
    }

    #[test]
    fn array_elements_are_reconciled_in_place() {
        let schema_json = json!({
            "type": "array",
            "items": {"type": "object", "properties": {"bool": {"type": "boolean", "default": true}}}
        });
        let data = json!([{}, {"bool": false}]);
        let (_, schema) = resolved(schema_json, Some(&data));
        assert_eq!(
            synthesize(&schema, Some(&data)),
            Some(json!([{"bool": true}, {"bool": false}]))
        );
    }

    #[test]
    fn deeply_nested_defaults_populate_new_items() {
        let (root, schema) = resolved(
            json!({
                "type": "object",
                "properties": {
                    "object": {
                        "type": "object",
                        "properties": {
                            "array": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {"bool": {"type": "boolean", "default": true}}
                                }
                            }
                        }
                    }
                }
            }),
            None,
        );
        assert_eq!(synthesize(&schema, None), Some(json!({"object": {"array": []}})));

        let blueprint = schema
            .property("object")
            .and_then(|o| o.property("array"))
            .and_then(|a| a.items.as_deref())
            .unwrap();
        assert_eq!(fresh_item(blueprint, &root.definitions).unwrap(), Some(json!({"bool": true})));
    }

    #[test]
    fn recursive_blueprint_item_is_finite() {
        let root = Schema::from_value(json!({
            "$ref": "#/definitions/node",
            "definitions": {
                "node": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "default": "n"},
                        "children": {"type": "array", "items": {"$ref": "#/definitions/node"}}
                    }
                }
            }
        }))
        .unwrap();
        let item = fresh_item(&root.definitions["node"], &root.definitions).unwrap();
        assert_eq!(item, Some(json!({"name": "n", "children": []})));
    }

    #[test]
    fn synthesis_is_stable() {
        let (_, schema) = resolved(
            json!({
                "type": "object",
                "default": {"a": 1, "z": true},
                "properties": {
                    "a": {"type": "integer", "default": 2},
                    "b": {"type": "string", "default": "b"},
                    "c": {"type": "object", "properties": {"d": {"type": "boolean", "default": false}}}
                }
            }),
            None,
        );
        for input in [None, Some(json!({})), Some(json!({"a": "wrong"})), Some(json!({"c": null}))] {
            let once = synthesize(&schema, input.as_ref());
            let twice = synthesize(&schema, once.as_ref());
            assert_eq!(once, twice, "unstable for {input:?}");
        }
    }
}

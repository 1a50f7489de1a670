//! Property path accessors for JSON values
//!
//! Paths are dot-delimited (`address.city`) and accept bracket indexes
//! (`phones[0].type`, normalized to `phones.0.type`). Reads never fail: a
//! missing or non-indexable level yields `None`. Writes create whatever
//! intermediate containers they need and leave sibling properties alone.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Largest array length a write pads up to. A numeric segment past it is
/// written as an object key instead.
pub const MAX_ARRAY_LEN: usize = 10_000;

/// Normalize bracket indexes to dot segments and strip a leading dot
///
/// `a[0].b` becomes `a.0.b`, `.a.b` becomes `a.b`.
pub fn normalize(path: &str) -> Cow<'_, str> {
    if !path.contains('[') && !path.starts_with('.') {
        return Cow::Borrowed(path);
    }

    let mut normalized = String::with_capacity(path.len() + 2);
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' => {
                let mut inner = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(next);
                }
                if closed && !inner.is_empty() && inner.chars().all(is_word_char) {
                    normalized.push('.');
                    normalized.push_str(&inner);
                } else {
                    // Not an index expression, keep it verbatim
                    normalized.push('[');
                    normalized.push_str(&inner);
                    if closed {
                        normalized.push(']');
                    }
                }
            }
            _ => normalized.push(c),
        }
    }

    match normalized.strip_prefix('.') {
        Some(stripped) => Cow::Owned(stripped.to_string()),
        None => Cow::Owned(normalized),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Index a write may use to grow an array, or `None` when the segment is
/// not numeric or the padded array would exceed [`MAX_ARRAY_LEN`]
fn writable_index(segment: &str) -> Option<usize> {
    let index = parse_index(segment)?;
    let len = index.checked_add(1)?;
    (len <= MAX_ARRAY_LEN).then_some(index)
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Read the value at `path`, or `None` when any level is missing
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let normalized = normalize(path);
    let mut current = root;
    for segment in normalized.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Read and clone the value at `path`
pub fn get_owned(root: &Value, path: &str) -> Option<Value> {
    get(root, path).cloned()
}

/// Check whether `path` resolves to a value, `null` included
pub fn exists(root: &Value, path: &str) -> bool {
    get(root, path).is_some()
}

/// Write `value` at `path`, creating intermediate containers as needed
///
/// An intermediate level becomes an array when the segment after it is
/// numeric, an object otherwise. Arrays grow with `null` padding up to
/// [`MAX_ARRAY_LEN`]; larger indexes and numeric segments under an existing
/// object are written as string keys.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let normalized = normalize(path);
    let segments: Vec<&str> = normalized.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for (position, segment) in parents.iter().enumerate() {
        let next_is_index = writable_index(segments[position + 1]).is_some();
        let slot = slot_mut(current, segment);
        if !is_container(slot) {
            *slot = if next_is_index {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
        }
        current = slot;
    }
    *slot_mut(current, last) = value;
}

/// Remove the value at `path`, returning it when it existed
///
/// Array elements are replaced by `null` so that sibling indexes keep their
/// position.
pub fn remove(root: &mut Value, path: &str) -> Option<Value> {
    let normalized = normalize(path);
    let segments: Vec<&str> = normalized.split('.').collect();
    let (last, parents) = segments.split_last()?;

    let mut current = root;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(*segment)?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }

    match current {
        Value::Object(map) => map.shift_remove(*last),
        Value::Array(items) => {
            let slot = items.get_mut(parse_index(last)?)?;
            Some(std::mem::take(slot))
        }
        _ => None,
    }
}

/// Build an object holding the value of every listed path
///
/// The shape of each path is preserved: aggregating `firstName` and
/// `address.city` yields `{ firstName, address: { city } }`. Paths without a
/// value are skipped.
pub fn aggregate<S: AsRef<str>>(paths: &[S], object: &Value) -> Value {
    let mut aggregated = Value::Object(Map::new());
    for path in paths {
        if let Some(value) = get(object, path.as_ref()) {
            set(&mut aggregated, path.as_ref(), value.clone());
        }
    }
    aggregated
}

/// Get the slot for `segment` inside `current`, turning `current` into a
/// container first when it is not one
fn slot_mut<'a>(current: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = writable_index(segment);
    if current.is_array() && index.is_none() {
        // Named or oversized segment on an array: keep the elements under
        // their indexes
        let items = std::mem::take(current);
        *current = array_to_object(items);
    }
    if !is_container(current) {
        *current = Value::Object(Map::new());
    }

    match (current, index) {
        (Value::Array(items), Some(index)) => {
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment.to_string()).or_insert(Value::Null),
        (other, _) => other,
    }
}

fn array_to_object(items: Value) -> Value {
    match items {
        Value::Array(items) => Value::Object(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a.b"), "a.b");
        assert_eq!(normalize("a[0].b"), "a.0.b");
        assert_eq!(normalize(".a.b"), "a.b");
        assert_eq!(normalize("a[0][1]"), "a.0.1");
        assert_eq!(normalize("a[x-y]"), "a[x-y]");
    }

    #[test]
    fn test_get_nested() {
        let data = json!({
            "level1": {
                "level2": {
                    "value": 42
                }
            },
            "phones": [{"type": "home"}, {"type": "work"}]
        });

        assert_eq!(get(&data, "level1.level2.value"), Some(&json!(42)));
        assert_eq!(get(&data, "level1.level2"), Some(&json!({"value": 42})));
        assert_eq!(get(&data, "phones[1].type"), Some(&json!("work")));
        assert_eq!(get(&data, "phones.0.type"), Some(&json!("home")));
    }

    #[test]
    fn test_get_missing_never_fails() {
        let data = json!({"a": {"b": null}, "s": "text"});

        assert_eq!(get(&data, "nonexistent"), None);
        assert_eq!(get(&data, "a.b.c"), None);
        assert_eq!(get(&data, "s.length"), None);
        assert_eq!(get(&data, "a.b"), Some(&Value::Null));
        assert_eq!(get(&Value::Null, "a"), None);
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut data = json!({});
        set(&mut data, "field1", json!("value1"));
        assert_eq!(data, json!({"field1": "value1"}));

        set(&mut data, "nested.field2", json!(42));
        assert_eq!(data["nested"]["field2"], json!(42));
        assert_eq!(data["field1"], json!("value1"));
    }

    #[test]
    fn test_set_keeps_siblings() {
        let mut data = json!({"a": {"c": 1}});
        set(&mut data, "a.b", json!(2));
        assert_eq!(data, json!({"a": {"c": 1, "b": 2}}));
    }

    #[test]
    fn test_set_creates_arrays_for_numeric_segments() {
        let mut data = json!({});
        set(&mut data, "keyA.keyA1.0.keyA11", json!("value"));
        assert_eq!(data, json!({"keyA": {"keyA1": [{"keyA11": "value"}]}}));

        set(&mut data, "list[2]", json!(true));
        assert_eq!(data["list"], json!([null, null, true]));
    }

    #[test]
    fn test_set_replaces_scalars() {
        let mut data = json!({"a": 1});
        set(&mut data, "a.b", json!(2));
        assert_eq!(data, json!({"a": {"b": 2}}));

        let mut root = Value::Null;
        set(&mut root, "x", json!(1));
        assert_eq!(root, json!({"x": 1}));
    }

    #[test]
    fn test_set_named_segment_on_array() {
        let mut data = json!({"a": [1, 2]});
        set(&mut data, "a.name", json!("n"));
        assert_eq!(data, json!({"a": {"0": 1, "1": 2, "name": "n"}}));
    }

    #[test]
    fn test_set_index_past_usize_max() {
        let mut data = json!({});
        set(&mut data, "ids.18446744073709551615", json!("x"));
        assert_eq!(data, json!({"ids": {"18446744073709551615": "x"}}));

        let mut data = json!({"ids": [1]});
        set(&mut data, "ids.18446744073709551615", json!("x"));
        assert_eq!(data, json!({"ids": {"0": 1, "18446744073709551615": "x"}}));
    }

    #[test]
    fn test_set_large_index_uses_object_key() {
        let mut data = json!({});
        set(&mut data, "list.50000000", json!("v"));
        assert_eq!(data, json!({"list": {"50000000": "v"}}));

        let mut data = json!({});
        set(&mut data, &format!("list.{}", MAX_ARRAY_LEN - 1), json!(true));
        assert_eq!(data["list"].as_array().map(Vec::len), Some(MAX_ARRAY_LEN));
    }

    #[test]
    fn test_set_numeric_segment_on_object() {
        let mut data = json!({"codes": {"name": "n"}});
        set(&mut data, "codes.3", json!(3));
        assert_eq!(data, json!({"codes": {"name": "n", "3": 3}}));
    }

    #[test]
    fn test_remove() {
        let mut data = json!({"a": {"b": 1, "c": 2}, "list": [1, 2]});
        assert_eq!(remove(&mut data, "a.b"), Some(json!(1)));
        assert_eq!(data["a"], json!({"c": 2}));
        assert_eq!(remove(&mut data, "a.missing"), None);
        assert_eq!(remove(&mut data, "list[0]"), Some(json!(1)));
        assert_eq!(data["list"], json!([null, 2]));
    }

    #[test]
    fn test_aggregate_preserves_shape() {
        let data = json!({"firstName": "John", "address": {"city": "NY", "zip": "10001"}});
        let result = aggregate(&["firstName", "address.city"], &data);
        assert_eq!(result, json!({"firstName": "John", "address": {"city": "NY"}}));

        let result = aggregate(&["missing"], &data);
        assert_eq!(result, json!({}));
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dot-notation access to nested configuration trees.
//!
//! Every function here addresses a node through a single path string whose segments
//! are separated by `.`, e.g. `"args.labels.menu_name"`. Resolution descends through
//! mappings only: a missing segment, or a segment that lands on a scalar or sequence
//! while more segments remain, resolves to "not found" and never to an error.
//!
//! Before descending, the whole path is also tried as a literal top-level key so that
//! keys which themselves contain dots (`"fulcrum.plugin_dir"`) stay reachable.

use crate::domain::value::{Mapping, Value};

const DELIMITER: char = '.';

/// Returns the value at `path`, or `None` when any segment fails to resolve.
///
/// # Examples
///
/// ```
/// use fulcrum::domain::{arr, Value};
///
/// let tree = Value::from([("names", Value::from([("developer", "Tonya")]))]);
/// let tree = tree.as_mapping().unwrap();
///
/// assert_eq!(arr::get(tree, "names.developer"), Some(&Value::from("Tonya")));
/// assert_eq!(arr::get(tree, "names.developer.first"), None);
/// ```
pub fn get<'a>(tree: &'a Mapping, path: &str) -> Option<&'a Value> {
    if let Some(value) = tree.get(path) {
        return Some(value);
    }

    let mut segments = path.split(DELIMITER);
    let first = segments.next()?;
    let mut current = tree.get(first)?;
    for segment in segments {
        current = current.as_mapping()?.get(segment)?;
    }
    Some(current)
}

/// Returns a clone of the value at `path`, or `default` when it does not resolve.
pub fn get_or(tree: &Mapping, path: &str, default: impl Into<Value>) -> Value {
    match get(tree, path) {
        Some(value) => value.clone(),
        None => default.into(),
    }
}

/// Returns a clone of the value at `path`, or the result of `default` when it does not
/// resolve. The closure only runs on a miss.
pub fn get_or_else<F>(tree: &Mapping, path: &str, default: F) -> Value
where
    F: FnOnce() -> Value,
{
    match get(tree, path) {
        Some(value) => value.clone(),
        None => default(),
    }
}

/// Returns `true` if `path` resolves to a bound value.
///
/// An empty tree or an empty path is never resolvable.
pub fn has(tree: &Mapping, path: &str) -> bool {
    if tree.is_empty() || path.is_empty() {
        return false;
    }
    get(tree, path).is_some()
}

/// Returns `true` if the value at `path` is a mapping or sequence.
///
/// Every node along the way must itself be a collection. With `require_non_empty`,
/// each of them must also hold at least one element.
pub fn is_array(tree: &Mapping, path: &str, require_non_empty: bool) -> bool {
    if tree.is_empty() || path.is_empty() {
        return false;
    }

    let valid = |value: &Value| match value.array_len() {
        Some(len) => !require_non_empty || len > 0,
        None => false,
    };

    if let Some(value) = tree.get(path) {
        return valid(value);
    }

    let mut current = tree;
    let mut segments = path.split(DELIMITER).peekable();
    while let Some(segment) = segments.next() {
        let value = match current.get(segment) {
            Some(value) if valid(value) => value,
            _ => return false,
        };
        if segments.peek().is_none() {
            return true;
        }
        current = match value.as_mapping() {
            Some(map) => map,
            None => return false,
        };
    }
    false
}

/// Assigns `value` at `path`, creating intermediate mappings as needed.
///
/// A top-level key spelled exactly `path` is overwritten in place, matching the lookup
/// order of [`get`]. Otherwise any non-mapping node met on the way is replaced by an
/// empty mapping. Returns the tree for chaining.
///
/// # Examples
///
/// ```
/// use fulcrum::domain::{arr, Mapping, Value};
///
/// let mut tree = Mapping::new();
/// arr::set(&mut tree, "a.b.c", Value::from(1));
/// assert_eq!(arr::get(&tree, "a.b.c"), Some(&Value::from(1)));
/// ```
pub fn set<'a>(tree: &'a mut Mapping, path: &str, value: Value) -> &'a mut Mapping {
    assign(tree, path, value, false);
    tree
}

/// Appends `value` onto the leaf at `path` instead of replacing it.
///
/// Strings concatenate and sequences grow; an absent leaf is simply assigned.
pub fn append<'a>(tree: &'a mut Mapping, path: &str, value: Value) -> &'a mut Mapping {
    assign(tree, path, value, true);
    tree
}

fn assign(tree: &mut Mapping, path: &str, value: Value, append: bool) {
    if let Some(slot) = tree.get_mut(path) {
        *slot = if append {
            std::mem::take(slot).concat(value)
        } else {
            value
        };
        return;
    }

    let (parents, leaf) = match path.rsplit_once(DELIMITER) {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut current = tree;
    if let Some(parents) = parents {
        for segment in parents.split(DELIMITER) {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(Value::mapping);
            if !matches!(slot, Value::Mapping(_)) {
                *slot = Value::mapping();
            }
            current = match slot {
                Value::Mapping(map) => map,
                _ => return,
            };
        }
    }

    if append {
        if let Some(slot) = current.get_mut(leaf) {
            let existing = std::mem::take(slot);
            *slot = existing.concat(value);
            return;
        }
    }
    current.insert(leaf.to_string(), value);
}

/// Assigns `value` at `path` only if the current value is unresolved or null.
pub fn add<'a>(tree: &'a mut Mapping, path: &str, value: Value) -> &'a mut Mapping {
    if get(tree, path).map_or(true, Value::is_null) {
        set(tree, path, value);
    }
    tree
}

/// Removes the leaf at `path`.
///
/// Nothing happens when an intermediate segment is missing or not a mapping.
pub fn forget(tree: &mut Mapping, path: &str) {
    if tree.shift_remove(path).is_some() {
        return;
    }

    let (parents, leaf) = match path.rsplit_once(DELIMITER) {
        Some(split) => split,
        None => return,
    };

    let mut current = tree;
    for segment in parents.split(DELIMITER) {
        current = match current.get_mut(segment).and_then(Value::as_mapping_mut) {
            Some(map) => map,
            None => return,
        };
    }
    current.shift_remove(leaf);
}

/// Removes the leaf at each of `paths`.
pub fn forget_many<I, S>(tree: &mut Mapping, paths: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for path in paths {
        forget(tree, path.as_ref());
    }
}

/// Removes the leaf at `path` and returns its prior value, or `default` if it did not
/// resolve.
pub fn pull(tree: &mut Mapping, path: &str, default: impl Into<Value>) -> Value {
    let value = get_or(tree, path, default);
    forget(tree, path);
    value
}

/// Flattens nested mappings into a single level keyed by full dot paths.
///
/// Only mappings are descended: sequences and scalars are kept as leaves. An empty
/// nested mapping contributes no keys.
///
/// # Examples
///
/// ```
/// use fulcrum::domain::{arr, Value};
///
/// let tree = Value::from([("a", Value::from([("b", Value::from([("c", 1)]))]))]);
/// let flat = arr::dot(tree.as_mapping().unwrap(), "");
/// assert_eq!(flat.get("a.b.c"), Some(&Value::from(1)));
/// assert_eq!(flat.len(), 1);
/// ```
pub fn dot(tree: &Mapping, prefix: &str) -> Mapping {
    let mut results = Mapping::new();
    flatten_into(tree, prefix, &mut results);
    results
}

fn flatten_into(tree: &Mapping, prefix: &str, results: &mut Mapping) {
    for (key, value) in tree {
        let path = format!("{}{}", prefix, key);
        match value {
            Value::Mapping(map) => {
                flatten_into(map, &format!("{}{}", path, DELIMITER), results)
            }
            other => {
                results.insert(path, other.clone());
            }
        }
    }
}

/// Returns the top-level entries whose keys are in `keys`.
pub fn only(tree: &Mapping, keys: &[&str]) -> Mapping {
    tree.iter()
        .filter(|(key, _)| keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Returns the top-level entries whose keys are not in `keys`.
pub fn except(tree: &Mapping, keys: &[&str]) -> Mapping {
    tree.iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn items(collection: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match collection {
        Value::Sequence(seq) => Box::new(seq.iter()),
        Value::Mapping(map) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    }
}

fn item_get<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    item.as_mapping().and_then(|map| get(map, path))
}

/// Extracts `value_path` from every item of a sequence (or the values of a mapping).
///
/// Items where the path does not resolve, or resolves to null, are skipped.
pub fn pluck(collection: &Value, value_path: &str) -> Vec<Value> {
    items(collection)
        .filter_map(|item| item_get(item, value_path))
        .filter(|value| !value.is_null())
        .cloned()
        .collect()
}

/// Like [`pluck`], but keys each extracted value by the item's `key_path` value.
///
/// Later items overwrite earlier ones that share a key. An unresolved key becomes the
/// empty string.
pub fn pluck_keyed(collection: &Value, value_path: &str, key_path: &str) -> Mapping {
    let mut results = Mapping::new();
    for item in items(collection) {
        let value = match item_get(item, value_path) {
            Some(value) if !value.is_null() => value.clone(),
            _ => continue,
        };
        let key = item_get(item, key_path)
            .and_then(Value::to_key_string)
            .unwrap_or_default();
        results.insert(key, value);
    }
    results
}

/// Returns the first value for which `predicate(key, value)` holds.
pub fn first<'a, P>(tree: &'a Mapping, mut predicate: P) -> Option<&'a Value>
where
    P: FnMut(&str, &Value) -> bool,
{
    tree.iter()
        .find(|(key, value)| predicate(key, value))
        .map(|(_, value)| value)
}

/// Returns the last value for which `predicate(key, value)` holds.
pub fn last<'a, P>(tree: &'a Mapping, mut predicate: P) -> Option<&'a Value>
where
    P: FnMut(&str, &Value) -> bool,
{
    tree.iter()
        .rev()
        .find(|(key, value)| predicate(key, value))
        .map(|(_, value)| value)
}

/// Returns the entries for which `predicate(key, value)` holds, in order.
pub fn filter<P>(tree: &Mapping, mut predicate: P) -> Mapping
where
    P: FnMut(&str, &Value) -> bool,
{
    tree.iter()
        .filter(|(key, value)| predicate(key, value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Collects every scalar leaf of a nested value, depth first, in order.
pub fn flatten(value: &Value) -> Vec<Value> {
    let mut results = Vec::new();
    collect_leaves(value, &mut results);
    results
}

fn collect_leaves(value: &Value, results: &mut Vec<Value>) {
    match value {
        Value::Sequence(seq) => seq.iter().for_each(|v| collect_leaves(v, results)),
        Value::Mapping(map) => map.values().for_each(|v| collect_leaves(v, results)),
        scalar => results.push(scalar.clone()),
    }
}

/// Follows `path` across every element of the tree, one level per segment.
///
/// At each level the values of all elements holding the segment are gathered into the
/// next level; elements without it are dropped.
pub fn fetch(tree: &Mapping, path: &str) -> Vec<Value> {
    let mut level: Vec<Value> = tree.values().cloned().collect();
    for segment in path.split(DELIMITER) {
        level = level
            .iter()
            .filter_map(|item| item.as_mapping().and_then(|map| map.get(segment)))
            .cloned()
            .collect();
    }
    level
}

/// Merges `overrides` into `base`, recursively, with `overrides` winning.
///
/// Mappings merge key by key and sequences merge index by index; any other pairing is
/// replaced wholesale. Keys present only in `base` are preserved untouched.
pub fn replace_recursive(base: &mut Mapping, overrides: &Mapping) {
    for (key, incoming) in overrides {
        match base.get_mut(key) {
            Some(current) => replace_value(current, incoming),
            None => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn replace_value(current: &mut Value, incoming: &Value) {
    match (current, incoming) {
        (Value::Mapping(base), Value::Mapping(overrides)) => replace_recursive(base, overrides),
        (Value::Sequence(base), Value::Sequence(overrides)) => {
            for (index, value) in overrides.iter().enumerate() {
                match base.get_mut(index) {
                    Some(slot) => replace_value(slot, value),
                    None => base.push(value.clone()),
                }
            }
        }
        (current, incoming) => *current = incoming.clone(),
    }
}

//! # Document Loaders
//!
//! Reads the two input documents into `serde_yaml::Value` trees.
//!
//! - The contract loader is a plain YAML loader and rejects custom tags.
//! - The template loader accepts every custom tag (`!Ref`, `!Sub`, `!GetAtt`, ...)
//!   and replaces the tagged node by its payload, so intrinsic functions compare
//!   as ordinary scalars, sequences and mappings.

use crate::error::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Loads the API contract document.
///
/// Fails with `NotFound` when the file is absent and with `Parse` when it is
/// malformed or carries a custom tag anywhere in the tree.
pub fn load_contract(path: &Path, label: &str) -> AppResult<Value> {
    let mut document = parse(&read(path, label)?, label)?;

    if let Some(tag) = find_tag(&document) {
        return Err(AppError::Parse {
            label: label.to_string(),
            message: format!("unsupported custom tag `{}`", tag),
        });
    }

    apply_merge_keys(&mut document, label)?;
    Ok(document)
}

/// Loads the deployment template, unwrapping every tagged node.
pub fn load_template(path: &Path, label: &str) -> AppResult<Value> {
    let mut document = strip_tags(parse(&read(path, label)?, label)?);
    apply_merge_keys(&mut document, label)?;
    Ok(document)
}

/// Replaces every tagged node by its untagged payload, recursively.
///
/// The tag name is discarded without being inspected, so any tag is accepted.
/// Tags inside tagged payloads, sequence items, mapping keys and mapping values
/// are all removed.
pub fn strip_tags(value: Value) -> Value {
    match value {
        // An empty tagged scalar (`!Ref` alone) is the empty string, not null.
        Value::Tagged(tagged) if tagged.value.is_null() => Value::String(String::new()),
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (strip_tags(key), strip_tags(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Walks `key_path` through nested mappings.
///
/// Returns a `Structure` error naming the path up to the first segment that is
/// missing, or whose parent is not a mapping.
pub fn lookup<'a>(document: &'a Value, key_path: &[&str], label: &str) -> AppResult<&'a Value> {
    let mut current = document;

    for (depth, key) in key_path.iter().enumerate() {
        let walked = key_path[..=depth].join(".");
        if !current.is_mapping() {
            return Err(AppError::structure(label, walked, "expected a mapping"));
        }
        current = current
            .get(*key)
            .ok_or_else(|| AppError::structure(label, walked, "missing key"))?;
    }

    Ok(current)
}

fn read(path: &Path, label: &str) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound {
            label: label.to_string(),
            path: path.to_path_buf(),
        },
        _ => AppError::Io(e),
    })
}

fn parse(content: &str, label: &str) -> AppResult<Value> {
    serde_yaml::from_str(content).map_err(|e| AppError::Parse {
        label: label.to_string(),
        message: e.to_string(),
    })
}

// `<<: *anchor` is resolved the way a YAML 1.1 safe loader would.
fn apply_merge_keys(document: &mut Value, label: &str) -> AppResult<()> {
    document.apply_merge().map_err(|e| AppError::Parse {
        label: label.to_string(),
        message: e.to_string(),
    })
}

fn find_tag(value: &Value) -> Option<String> {
    match value {
        Value::Tagged(tagged) => Some(tagged.tag.to_string()),
        Value::Sequence(items) => items.iter().find_map(find_tag),
        Value::Mapping(entries) => entries
            .iter()
            .find_map(|(key, value)| find_tag(key).or_else(|| find_tag(value))),
        _ => None,
    }
}

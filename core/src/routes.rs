//! # Path Normalizer
//!
//! Reduces a document's `paths` object to a [`RouteTable`]: path string to
//! lower-cased HTTP method to method definition. Path-level `parameters` are
//! dropped. Ordered maps keep every later listing sorted.

use crate::document::lookup;
use crate::error::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Lower-cased HTTP method to its definition body.
pub type MethodMap = BTreeMap<String, Value>;

/// Route path (verbatim) to its methods.
pub type RouteTable = BTreeMap<String, MethodMap>;

/// Path-item key holding shared parameters rather than an operation.
pub const SHARED_PARAMETERS_KEY: &str = "parameters";

/// Logical id of the API resource in the deployment template.
pub const DEFAULT_API_RESOURCE: &str = "MyApiGateway";

/// Builds a route table from a raw `paths` node.
///
/// A YAML null yields an empty table. A method body of null becomes an empty
/// mapping. When two keys of one path lower-case to the same method, the later
/// key wins.
pub fn normalize_paths(raw: &Value, label: &str) -> AppResult<RouteTable> {
    let entries = match raw {
        Value::Null => return Ok(RouteTable::new()),
        Value::Mapping(entries) => entries,
        _ => return Err(AppError::structure(label, "paths", "expected a mapping")),
    };

    let mut table = RouteTable::new();
    for (path, item) in entries {
        let path = path.as_str().ok_or_else(|| {
            AppError::structure(label, format!("paths.{}", render_key(path)), "expected a string key")
        })?;
        table.insert(path.to_string(), normalize_methods(path, item, label)?);
    }

    tracing::debug!(label, paths = table.len(), "normalized route table");
    Ok(table)
}

fn normalize_methods(path: &str, item: &Value, label: &str) -> AppResult<MethodMap> {
    let entries = match item {
        Value::Null => return Ok(MethodMap::new()),
        Value::Mapping(entries) => entries,
        _ => {
            return Err(AppError::structure(
                label,
                format!("paths.{}", path),
                "expected a mapping",
            ))
        }
    };

    let mut methods = MethodMap::new();
    for (key, body) in entries {
        let method = key
            .as_str()
            .ok_or_else(|| {
                AppError::structure(
                    label,
                    format!("paths.{}.{}", path, render_key(key)),
                    "expected a string key",
                )
            })?
            .to_lowercase();

        if method == SHARED_PARAMETERS_KEY {
            continue;
        }

        let body = match body {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other.clone(),
        };
        methods.insert(method, body);
    }

    Ok(methods)
}

/// Extracts the route table of the contract document (top-level `paths`).
///
/// A contract without `paths` has no routes.
pub fn contract_paths(document: &Value, label: &str) -> AppResult<RouteTable> {
    let root = document
        .as_mapping()
        .ok_or_else(|| AppError::structure(label, "<root>", "expected a mapping"))?;

    match root.get("paths") {
        Some(raw) => normalize_paths(raw, label),
        None => {
            tracing::warn!(label, "document has no top-level `paths`");
            Ok(RouteTable::new())
        }
    }
}

/// Extracts the route table embedded in the deployment template at
/// `Resources.<api_resource>.Properties.DefinitionBody.paths`.
pub fn template_paths(document: &Value, api_resource: &str, label: &str) -> AppResult<RouteTable> {
    let raw = lookup(
        document,
        &["Resources", api_resource, "Properties", "DefinitionBody", "paths"],
        label,
    )?;
    normalize_paths(raw, label)
}

fn render_key(key: &Value) -> String {
    serde_yaml::to_string(key)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", key))
}

#![deny(missing_docs)]

//! # Route Table Comparison
//!
//! Diffs the contract's route table against the deployment template's.
//! All findings are collected before reporting:
//!
//! 1. Path-set differences (missing, then extra).
//! 2. Per path, in sorted order: method-set mismatch, or, when the sets agree,
//!    per-method `security` and gateway integration mismatches.

use crate::routes::RouteTable;
use serde_yaml::Value;
use std::fmt::Display;

/// Message reported when the two tables agree.
pub const IN_SYNC_MESSAGE: &str = "All OpenAPI definitions are in sync.";

/// Method field compared by value.
pub const SECURITY_KEY: &str = "security";

/// Method field compared by value but never printed.
pub const INTEGRATION_KEY: &str = "x-amazon-apigateway-integration";

/// One discrepancy between the contract and the deployment template.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Paths defined by the contract but absent from the backend (sorted).
    MissingPaths(Vec<String>),

    /// Paths defined only by the backend (sorted).
    ExtraPaths(Vec<String>),

    /// The path exists on both sides with different method sets.
    MethodMismatch {
        /// Route path.
        path: String,
        /// Sorted methods of the contract.
        template: Vec<String>,
        /// Sorted methods of the backend.
        backend: Vec<String>,
    },

    /// The `security` requirements of one operation differ.
    SecurityMismatch {
        /// Route path.
        path: String,
        /// Lower-cased method.
        method: String,
        /// Contract value, `None` when absent.
        template: Option<Value>,
        /// Backend value, `None` when absent.
        backend: Option<Value>,
    },

    /// The gateway integration block of one operation differs.
    IntegrationMismatch {
        /// Route path.
        path: String,
        /// Lower-cased method.
        method: String,
    },
}

impl Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::MissingPaths(paths) => {
                write!(f, "Paths missing in backend: {}", paths.join(", "))
            }
            Finding::ExtraPaths(paths) => {
                write!(f, "Extra paths present only in backend: {}", paths.join(", "))
            }
            Finding::MethodMismatch {
                path,
                template,
                backend,
            } => write!(
                f,
                "Method mismatch for {}: template=[{}] backend=[{}]",
                path,
                template.join(", "),
                backend.join(", ")
            ),
            Finding::SecurityMismatch {
                path,
                method,
                template,
                backend,
            } => write!(
                f,
                "Security mismatch at {} {}: template={} backend={}",
                path,
                method.to_uppercase(),
                render_value(template.as_ref()),
                render_value(backend.as_ref())
            ),
            Finding::IntegrationMismatch { path, method } => {
                write!(f, "Integration mismatch at {} {}", path, method.to_uppercase())
            }
        }
    }
}

/// Outcome of a comparison: the ordered list of findings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    findings: Vec<Finding>,
}

impl SyncReport {
    /// True when no finding was produced.
    pub fn is_in_sync(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings in report order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

/// Renders [`IN_SYNC_MESSAGE`], or one finding per line.
impl Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.findings.is_empty() {
            return f.write_str(IN_SYNC_MESSAGE);
        }
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", finding)?;
        }
        Ok(())
    }
}

/// Compares the contract (`template`) side against the `backend` side.
pub fn compare_routes(template: &RouteTable, backend: &RouteTable) -> SyncReport {
    let mut findings = Vec::new();

    let missing: Vec<String> = template
        .keys()
        .filter(|path| !backend.contains_key(*path))
        .cloned()
        .collect();
    let extra: Vec<String> = backend
        .keys()
        .filter(|path| !template.contains_key(*path))
        .cloned()
        .collect();

    if !missing.is_empty() {
        findings.push(Finding::MissingPaths(missing));
    }
    if !extra.is_empty() {
        findings.push(Finding::ExtraPaths(extra));
    }

    for (path, template_methods) in template {
        let Some(backend_methods) = backend.get(path) else {
            continue;
        };

        if !template_methods.keys().eq(backend_methods.keys()) {
            findings.push(Finding::MethodMismatch {
                path: path.clone(),
                template: template_methods.keys().cloned().collect(),
                backend: backend_methods.keys().cloned().collect(),
            });
            continue;
        }

        // Key sets are equal and both maps are ordered, so the pairs line up.
        for ((method, template_body), (_, backend_body)) in
            template_methods.iter().zip(backend_methods)
        {
            let template_security = field(template_body, SECURITY_KEY);
            let backend_security = field(backend_body, SECURITY_KEY);
            if !same_field(template_security, backend_security) {
                findings.push(Finding::SecurityMismatch {
                    path: path.clone(),
                    method: method.clone(),
                    template: template_security.cloned(),
                    backend: backend_security.cloned(),
                });
            }

            if !same_field(
                field(template_body, INTEGRATION_KEY),
                field(backend_body, INTEGRATION_KEY),
            ) {
                findings.push(Finding::IntegrationMismatch {
                    path: path.clone(),
                    method: method.clone(),
                });
            }
        }
    }

    tracing::debug!(findings = findings.len(), "compared route tables");
    SyncReport { findings }
}

/// Compares two route tables and returns `(in_sync, report_text)`.
pub fn compare_paths(template: &RouteTable, backend: &RouteTable) -> (bool, String) {
    let report = compare_routes(template, backend);
    (report.is_in_sync(), report.to_string())
}

// Absent and explicit null are the same.
fn field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|value| !value.is_null())
}

fn same_field(template: Option<&Value>, backend: Option<&Value>) -> bool {
    match (template, backend) {
        (Some(template), Some(backend)) => same_value(template, backend),
        (None, None) => true,
        _ => false,
    }
}

/// Deep structural equality where numbers compare by value, so `29000` and
/// `29000.0` are equal. Sequences are order-sensitive, mappings are not.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            a == b || ((a.is_f64() || b.is_f64()) && a.as_f64() == b.as_f64())
        }
        (Value::Sequence(a), Value::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same_value(a, b))
        }
        (Value::Mapping(a), Value::Mapping(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| same_value(value, other)))
        }
        (Value::Tagged(a), Value::Tagged(b)) => a.tag == b.tag && same_value(&a.value, &b.value),
        _ => a == b,
    }
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None => "null".to_string(),
        Some(value) => serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::strip_tags;
    use crate::routes::normalize_paths;
    use pretty_assertions::assert_eq;

    fn table(source: &str) -> RouteTable {
        normalize_paths(&serde_yaml::from_str(source).unwrap(), "test").unwrap()
    }

    fn untagged_table(source: &str) -> RouteTable {
        normalize_paths(&strip_tags(serde_yaml::from_str(source).unwrap()), "test").unwrap()
    }

    const WIDGETS: &str = r#"
/widgets:
  get:
    security:
      - ApiKey: []
    x-amazon-apigateway-integration:
      type: aws_proxy
      httpMethod: POST
      uri: arn:widgets-list
  post:
    security:
      - ApiKey: []
    x-amazon-apigateway-integration:
      type: aws_proxy
      httpMethod: POST
      uri: arn:widgets-create
"#;

    #[test]
    fn test_identical_tables_are_in_sync() {
        let (ok, message) = compare_paths(&table(WIDGETS), &table(WIDGETS));
        assert!(ok);
        assert_eq!(message, IN_SYNC_MESSAGE);
    }

    #[test]
    fn test_other_fields_are_ignored() {
        let backend = WIDGETS.replace("  get:\n", "  get:\n    summary: List widgets\n");
        assert!(compare_routes(&table(WIDGETS), &table(&backend)).is_in_sync());
    }

    #[test]
    fn test_path_set_findings_are_sorted() {
        let template = table("/b: {}\n/a: {}\n/c: {}\n");
        let backend = table("/c: {}\n/z: {}\n/y: {}\n");

        let report = compare_routes(&template, &backend);
        assert_eq!(
            report.to_string(),
            "Paths missing in backend: /a, /b\nExtra paths present only in backend: /y, /z"
        );
    }

    #[test]
    fn test_method_mismatch_skips_body_comparison() {
        let template = table(WIDGETS);
        let backend = table("/widgets:\n  get:\n    security: []\n");

        let report = compare_routes(&template, &backend);
        assert_eq!(
            report.findings(),
            &[Finding::MethodMismatch {
                path: "/widgets".into(),
                template: vec!["get".into(), "post".into()],
                backend: vec!["get".into()],
            }]
        );
        assert_eq!(
            report.to_string(),
            "Method mismatch for /widgets: template=[get, post] backend=[get]"
        );
    }

    #[test]
    fn test_security_mismatch_prints_both_values() {
        let template = table("/widgets:\n  get:\n    security:\n      - ApiKey: []\n");
        let backend = table("/widgets:\n  get:\n    security: []\n");

        let (ok, message) = compare_paths(&template, &backend);
        assert!(!ok);
        assert_eq!(
            message,
            r#"Security mismatch at /widgets GET: template=[{"ApiKey":[]}] backend=[]"#
        );
    }

    #[test]
    fn test_absent_and_null_security_are_equal() {
        let template = table("/a:\n  get:\n    security: null\n");
        let backend = table("/a:\n  get: {}\n");
        assert!(compare_routes(&template, &backend).is_in_sync());
    }

    #[test]
    fn test_missing_security_renders_null() {
        let template = table("/a:\n  get: {}\n");
        let backend = table("/a:\n  get:\n    security: [{ Auth: [] }]\n");
        assert_eq!(
            compare_routes(&template, &backend).to_string(),
            r#"Security mismatch at /a GET: template=null backend=[{"Auth":[]}]"#
        );
    }

    #[test]
    fn test_sequence_order_matters() {
        let template = table("/a:\n  get:\n    security: [{ A: [] }, { B: [] }]\n");
        let backend = table("/a:\n  get:\n    security: [{ B: [] }, { A: [] }]\n");
        assert!(!compare_routes(&template, &backend).is_in_sync());
    }

    #[test]
    fn test_mapping_key_order_does_not_matter() {
        let template = table(
            "/a:\n  get:\n    x-amazon-apigateway-integration: { type: aws_proxy, uri: x }\n",
        );
        let backend = table(
            "/a:\n  get:\n    x-amazon-apigateway-integration: { uri: x, type: aws_proxy }\n",
        );
        assert!(compare_routes(&template, &backend).is_in_sync());
    }

    #[test]
    fn test_integer_and_float_numbers_compare_by_value() {
        let template = table(
            "/a:\n  get:\n    x-amazon-apigateway-integration: { timeoutInMillis: 29000 }\n",
        );
        let backend = table(
            "/a:\n  get:\n    x-amazon-apigateway-integration: { timeoutInMillis: 29000.0 }\n",
        );
        assert!(compare_routes(&template, &backend).is_in_sync());

        let slower = table(
            "/a:\n  get:\n    x-amazon-apigateway-integration: { timeoutInMillis: 29000.5 }\n",
        );
        assert!(!compare_routes(&template, &slower).is_in_sync());
    }

    #[test]
    fn test_empty_tagged_scalar_equals_empty_string() {
        let template = table("/a:\n  get:\n    x-amazon-apigateway-integration: { t: '' }\n");
        let backend =
            untagged_table("/a:\n  get:\n    x-amazon-apigateway-integration: { t: !Ref }\n");
        assert!(compare_routes(&template, &backend).is_in_sync());
    }

    #[test]
    fn test_empty_tagged_security_is_not_absent() {
        let template = table("/a:\n  get: {}\n");
        let backend = untagged_table("/a:\n  get:\n    security: !Ref\n");
        assert_eq!(
            compare_routes(&template, &backend).to_string(),
            r#"Security mismatch at /a GET: template=null backend="""#
        );
    }

    #[test]
    fn test_integration_mismatch_omits_values() {
        let backend = WIDGETS.replace("arn:widgets-create", "arn:widgets-create-v2");
        let report = compare_routes(&table(WIDGETS), &table(&backend));
        assert_eq!(report.to_string(), "Integration mismatch at /widgets POST");
    }

    #[test]
    fn test_findings_follow_sorted_path_order() {
        let template = table(
            r#"
/b:
  get: { security: [] }
/a:
  get: { x-amazon-apigateway-integration: { uri: one } }
/only-template: {}
"#,
        );
        let backend = table(
            r#"
/a:
  get: { x-amazon-apigateway-integration: { uri: two } }
/b:
  get: { security: [{ Key: [] }] }
"#,
        );

        let report = compare_routes(&template, &backend);
        assert_eq!(
            report.to_string(),
            [
                "Paths missing in backend: /only-template",
                "Integration mismatch at /a GET",
                r#"Security mismatch at /b GET: template=[] backend=[{"Key":[]}]"#,
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_comparison_is_idempotent() {
        let template = table("/a:\n  get: {}\n/b:\n  put: {}\n");
        let backend = table("/b:\n  post: {}\n/c:\n  get: {}\n");
        assert_eq!(
            compare_paths(&template, &backend),
            compare_paths(&template, &backend)
        );
    }
}

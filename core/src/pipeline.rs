//! # Verification Pipeline
//!
//! Loader -> Normalizer -> Comparator, run once per invocation.

use crate::compare::{compare_routes, SyncReport};
use crate::document::{load_contract, load_template};
use crate::error::{AppError, AppResult};
use crate::routes::{contract_paths, template_paths, DEFAULT_API_RESOURCE};
use std::path::{Path, PathBuf};

/// Contract document location, relative to the repository root.
pub const DEFAULT_CONTRACT_PATH: &str = "openapi.template.yaml";

/// Deployment template location, relative to the repository root.
pub const DEFAULT_TEMPLATE_PATH: &str = "backend/template.yaml";

/// Where the two documents live and which template resource holds the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Directory the document paths are resolved against.
    pub root: PathBuf,
    /// Contract document path; also used as its label in messages.
    pub contract: PathBuf,
    /// Deployment template path; also used as its label in messages.
    pub template: PathBuf,
    /// Logical id of the API resource inside the template's `Resources`.
    pub api_resource: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new("."))
    }
}

impl SyncConfig {
    /// Default document locations under `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            contract: PathBuf::from(DEFAULT_CONTRACT_PATH),
            template: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            api_resource: DEFAULT_API_RESOURCE.to_string(),
        }
    }

    /// Full path of the contract document.
    pub fn contract_path(&self) -> PathBuf {
        self.root.join(&self.contract)
    }

    /// Full path of the deployment template.
    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.template)
    }
}

/// Runs the whole check.
///
/// Both files are probed before either is parsed, so a missing template is
/// reported even when the contract is malformed. Any error returned here is
/// fatal; drift is carried by the returned report.
pub fn verify(config: &SyncConfig) -> AppResult<SyncReport> {
    let contract_label = config.contract.display().to_string();
    let template_label = config.template.display().to_string();
    let contract_path = config.contract_path();
    let template_path = config.template_path();

    ensure_exists(&contract_path, &contract_label)?;
    ensure_exists(&template_path, &template_label)?;

    tracing::debug!(path = %contract_path.display(), "loading contract");
    let contract = load_contract(&contract_path, &contract_label)?;
    tracing::debug!(path = %template_path.display(), "loading deployment template");
    let template = load_template(&template_path, &template_label)?;

    let template_routes = contract_paths(&contract, &contract_label)?;
    let backend_routes = template_paths(&template, &config.api_resource, &template_label)?;

    let report = compare_routes(&template_routes, &backend_routes);
    tracing::info!(
        contract_paths = template_routes.len(),
        template_paths = backend_routes.len(),
        findings = report.findings().len(),
        "verification finished"
    );
    Ok(report)
}

fn ensure_exists(path: &Path, label: &str) -> AppResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::NotFound {
            label: label.to_string(),
            path: path.to_path_buf(),
        })
    }
}

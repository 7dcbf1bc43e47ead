//! Substitution values for the bootstrap template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub const COMPOSE_YAML_KEY: &str = "CLEARML_DOCKER_COMPOSE_YAML_CONTENTS";
pub const ACCOUNT_ID_KEY: &str = "AWS_ACCOUNT_ID";
pub const REGION_KEY: &str = "AWS_REGION";
pub const STACK_NAME_KEY: &str = "STACK_NAME";
pub const LOGICAL_RESOURCE_ID_KEY: &str = "LOGICAL_EC2_INSTANCE_RESOURCE_ID";
pub const WAIT_HANDLE_KEY: &str = "CFN_WAIT_HANDLE";
pub const BACKUP_IMAGE_URI_KEY: &str = "BACKUP_SERVICE_DOCKER_IMAGE_URI";
pub const RESTORE_FLAG_KEY: &str = "RESTORE_FROM_MOST_RECENT_BACKUP";

/// Every parameter a bootstrap template may reference. All are required.
pub const BOOTSTRAP_KEYS: [&str; 8] = [
    COMPOSE_YAML_KEY,
    ACCOUNT_ID_KEY,
    REGION_KEY,
    STACK_NAME_KEY,
    LOGICAL_RESOURCE_ID_KEY,
    WAIT_HANDLE_KEY,
    BACKUP_IMAGE_URI_KEY,
    RESTORE_FLAG_KEY,
];

/// Immutable name → value mapping consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Build a context, failing on the first required key (sorted) with no value.
    pub fn with_required(
        values: BTreeMap<String, String>,
        required: &[&str],
    ) -> Result<Self, RenderError> {
        let mut required: Vec<&str> = required.to_vec();
        required.sort_unstable();

        if let Some(name) = required.into_iter().find(|k| !values.contains_key(*k)) {
            return Err(RenderError::MissingParameter {
                name: name.to_string(),
            });
        }
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolved infrastructure identifiers for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BootstrapParams {
    pub compose_yaml: String,
    pub account_id: String,
    pub region: String,
    pub stack_name: String,
    pub logical_resource_id: String,
    pub wait_handle: String,
    pub backup_image_uri: String,
    pub restore_from_backup: bool,
}

impl From<BootstrapParams> for TemplateContext {
    fn from(params: BootstrapParams) -> Self {
        let values = BTreeMap::from([
            (COMPOSE_YAML_KEY.to_string(), params.compose_yaml),
            (ACCOUNT_ID_KEY.to_string(), params.account_id),
            (REGION_KEY.to_string(), params.region),
            (STACK_NAME_KEY.to_string(), params.stack_name),
            (LOGICAL_RESOURCE_ID_KEY.to_string(), params.logical_resource_id),
            (WAIT_HANDLE_KEY.to_string(), params.wait_handle),
            (BACKUP_IMAGE_URI_KEY.to_string(), params.backup_image_uri),
            (RESTORE_FLAG_KEY.to_string(), params.restore_from_backup.to_string()),
        ]);
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BootstrapParams {
        BootstrapParams {
            compose_yaml: "services: {}".into(),
            account_id: "123456789012".into(),
            region: "us-west-2".into(),
            stack_name: "clearml".into(),
            logical_resource_id: "ClearMLServerInstance1234".into(),
            wait_handle: "CfnWaitHandle".into(),
            backup_image_uri: "123456789012.dkr.ecr.us-west-2.amazonaws.com/backup".into(),
            restore_from_backup: false,
        }
    }

    #[test]
    fn test_params_fill_every_required_key() {
        let ctx = TemplateContext::from(params());
        assert_eq!(ctx.len(), BOOTSTRAP_KEYS.len());
        for key in BOOTSTRAP_KEYS {
            assert!(ctx.contains(key), "{key} missing");
        }
        assert_eq!(ctx.get(RESTORE_FLAG_KEY), Some("false"));
    }

    #[test]
    fn test_with_required_reports_missing_key() {
        let values = BTreeMap::from([
            ("AWS_REGION".to_string(), "us-west-2".to_string()),
            ("STACK_NAME".to_string(), "clearml".to_string()),
        ]);
        assert_eq!(
            TemplateContext::with_required(values.clone(), &["STACK_NAME", "AWS_ACCOUNT_ID", "AWS_REGION"]),
            Err(RenderError::MissingParameter {
                name: "AWS_ACCOUNT_ID".into()
            })
        );
        assert!(TemplateContext::with_required(values, &["STACK_NAME", "AWS_REGION"]).is_ok());
    }
}

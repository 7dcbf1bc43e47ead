//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use deploy_plan::ServiceBinding;
use tempfile::TempDir;

pub const TEMPLATE: &str = "#!/bin/bash\n\
set -euo pipefail\n\
echo \"deploying $HOSTNAME to {{AWS_REGION}}\"\n\
cat <<'EOF' > /clearml/docker-compose.yml\n\
{{CLEARML_DOCKER_COMPOSE_YAML_CONTENTS}}\n\
EOF\n\
cfn-init --stack {{STACK_NAME}} --resource {{LOGICAL_EC2_INSTANCE_RESOURCE_ID}} --region {{AWS_REGION}}\n\
docker pull {{BACKUP_SERVICE_DOCKER_IMAGE_URI}}\n\
[ \"{{RESTORE_FROM_MOST_RECENT_BACKUP}}\" = true ] && restore\n\
aws sts get-caller-identity | grep {{AWS_ACCOUNT_ID}}\n\
cfn-signal --resource {{CFN_WAIT_HANDLE}}\n";

pub const COMPOSE: &str = "services:\n  webserver:\n    image: allegroai/clearml:latest\n";

/// The three ClearML bindings, in routing order.
pub fn clearml_bindings() -> Vec<ServiceBinding> {
    vec![
        ServiceBinding::new("app.clearml", 8080),
        ServiceBinding::new("files.clearml", 8081),
        ServiceBinding::new("api.clearml", 8008),
    ]
}

/// A config file plus its template and compose file in a temp directory.
pub struct Fixture {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

pub fn config_toml(extra_bindings: &str) -> String {
    format!(
        r#"
base_domain = "example.org"

[[bindings]]
subdomain = "app.clearml"
port = 8080
description = "ClearML Web UI"

[[bindings]]
subdomain = "files.clearml"
port = 8081

[[bindings]]
subdomain = "api.clearml"
port = 8008
{extra_bindings}
[[extra_ingress]]
port = 22
description = "SSH"

[bootstrap]
template_path = "user-data.template.sh"
compose_path = "docker-compose.yml"
account_id = "123456789012"
region = "us-west-2"
stack_name = "clearml"
logical_resource_id = "ClearMLServerInstance"
wait_handle = "CfnWaitHandle"
backup_image_uri = "backup:latest"
"#
    )
}

/// Write `config`, [`TEMPLATE`] and [`COMPOSE`] into a fresh directory.
pub fn write_fixture(config: &str, template: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("deploy.toml");
    fs::write(&config_path, config).unwrap();
    fs::write(dir.path().join("user-data.template.sh"), template).unwrap();
    fs::write(dir.path().join("docker-compose.yml"), COMPOSE).unwrap();
    Fixture { dir, config_path }
}

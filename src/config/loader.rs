//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::DeploymentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Region used when neither the config nor `AWS_REGION` sets one.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "IO error reading {}: {}", path.display(), source),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Template and compose text the bootstrap script is rendered from.
#[derive(Debug, Clone)]
pub struct BootstrapSources {
    pub template: String,
    pub compose_yaml: String,
}

/// Load and validate configuration from a TOML file.
///
/// Bootstrap paths are resolved against the config file's directory.
pub fn load_config(path: &Path) -> Result<DeploymentConfig, ConfigError> {
    let content = read(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = parse_config(&content, base_dir, std::env::var("AWS_REGION").ok())?;

    tracing::info!(
        path = %path.display(),
        base_domain = %config.base_domain,
        bindings = config.bindings.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Parse and validate config text. `env_region` stands in for `AWS_REGION`.
pub fn parse_config(
    content: &str,
    base_dir: &Path,
    env_region: Option<String>,
) -> Result<DeploymentConfig, ConfigError> {
    let mut config: DeploymentConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    let bootstrap = &mut config.bootstrap;
    bootstrap.region = resolve_region(&bootstrap.region, env_region);
    bootstrap.template_path = resolve_path(base_dir, &bootstrap.template_path);
    bootstrap.compose_path = resolve_path(base_dir, &bootstrap.compose_path);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read the template and compose file named by the config.
pub fn read_bootstrap_sources(config: &DeploymentConfig) -> Result<BootstrapSources, ConfigError> {
    Ok(BootstrapSources {
        template: read(&config.bootstrap.template_path)?,
        compose_yaml: read(&config.bootstrap.compose_path)?,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_region(configured: &str, env_region: Option<String>) -> String {
    if !configured.trim().is_empty() {
        return configured.to_string();
    }
    env_region
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() || path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

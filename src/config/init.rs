// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates caravel.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ImageRef, ServiceName};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    service: Option<&str>,
    repository: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(s) = service {
        config.service = ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    if let Some(r) = repository {
        ImageRef::new(r, "latest").map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.repository = r.to_string();
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"service: {}
repository: {}
source:
  repo: {}
  branch: {}
ports:
  - "{}"
# Credential values sourced from the invoking environment:
# env:
#   API_KEY:
#     env: API_KEY
"#,
        config.service,
        config.repository,
        config.source.repo,
        config.source.branch,
        config.ports.first().map(String::as_str).unwrap_or("8501:8501"),
    )
}

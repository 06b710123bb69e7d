// ABOUTME: Configuration types and parsing for caravel.yml.
// ABOUTME: Service identity, source/build collaborators, ports, and credentials.

mod env_value;
mod init;
mod restart_policy;
mod stop;

pub use env_value::{EnvValue, resolve_env_map};
pub use init::init_config;
pub use restart_policy::RestartPolicy;
pub use stop::StopConfig;

use crate::error::{Error, Result};
use crate::runtime::{PortMapping, Protocol};
use crate::types::{ImageRef, ServiceName};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "caravel.yml";
pub const CONFIG_FILENAME_ALT: &str = "caravel.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".caravel/config.yml";

/// Published port mapping for the deployed service.
pub const DEFAULT_PORT: u16 = 8501;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Reserved container name. At most one container with this name exists.
    #[serde(deserialize_with = "deserialize_service_name")]
    pub service: ServiceName,

    /// Image repository name; each run tags a new image under it.
    #[serde(deserialize_with = "deserialize_repository")]
    pub repository: String,

    pub source: SourceConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default = "default_ports")]
    pub ports: Vec<String>,

    /// Credential values injected into the container environment.
    /// Resolved once at run start and passed through verbatim.
    #[serde(default)]
    pub env: HashMap<String, EnvValue>,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub restart: RestartPolicy,

    #[serde(default)]
    pub stop: Option<StopConfig>,

    #[serde(default)]
    pub cleanup: Option<CleanupConfig>,
}

/// Where the Checkout stage fetches source from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Git repository URL.
    pub repo: String,

    /// Default revision when none is given on the command line.
    #[serde(default = "default_branch")]
    pub branch: String,
}

/// How the Build stage invokes the external artifact builder.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Build context, relative to the checked-out workspace.
    #[serde(default = "default_context")]
    pub context: String,

    /// Dockerfile path, relative to the context.
    #[serde(default)]
    pub dockerfile: Option<String>,

    /// Builder program to invoke (`<program> build -t <image> <context>`).
    #[serde(default = "default_builder_program")]
    pub program: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            context: default_context(),
            dockerfile: None,
            program: default_builder_program(),
        }
    }
}

/// Image cleanup policy.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    /// Number of newest images to skip when sweeping. The default of 0
    /// attempts every matching image; in-use removals fail and are tolerated,
    /// which keeps the active image alive.
    #[serde(default)]
    pub retain: usize,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_context() -> String {
    ".".to_string()
}

fn default_builder_program() -> String {
    "docker".to_string()
}

fn default_ports() -> Vec<String> {
    vec![format!("{}:{}", DEFAULT_PORT, DEFAULT_PORT)]
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Parse the configured port strings into mappings; invalid entries are
    /// skipped.
    pub fn port_mappings(&self) -> Vec<PortMapping> {
        self.ports.iter().filter_map(|p| parse_port_mapping(p)).collect()
    }

    /// Stop timeout for the old container, defaulting to 30 seconds.
    pub fn stop_timeout(&self) -> Duration {
        self.stop
            .as_ref()
            .map(|s| s.timeout)
            .unwrap_or_else(|| Duration::from_secs(30))
    }

    /// Number of newest images the cleanup stage leaves untouched.
    pub fn retain_images(&self) -> usize {
        self.cleanup.as_ref().map(|c| c.retain).unwrap_or(0)
    }

    pub fn template() -> Self {
        Config {
            service: ServiceName::new("my-app").unwrap(),
            repository: "my-app".to_string(),
            source: SourceConfig {
                repo: "https://github.com/example/my-app.git".to_string(),
                branch: default_branch(),
            },
            build: BuildConfig::default(),
            ports: default_ports(),
            env: HashMap::new(),
            labels: HashMap::new(),
            restart: RestartPolicy::default(),
            stop: None,
            cleanup: None,
        }
    }
}

/// Parse a port mapping string like "8501:8501" or "8080:8501/udp".
fn parse_port_mapping(raw: &str) -> Option<PortMapping> {
    let (port_part, protocol) = match raw.split_once('/') {
        Some((ports, "udp")) => (ports, Protocol::Udp),
        Some((ports, _)) => (ports, Protocol::Tcp),
        None => (raw, Protocol::Tcp),
    };

    let (host, container) = port_part.split_once(':')?;
    Some(PortMapping {
        host_port: host.parse().ok()?,
        container_port: container.parse().ok()?,
        protocol,
    })
}

// Custom deserializers

fn deserialize_service_name<'de, D>(deserializer: D) -> std::result::Result<ServiceName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ServiceName::new(&s).map_err(serde::de::Error::custom)
}

fn deserialize_repository<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    // Repository must form a valid image reference with any tag.
    ImageRef::new(&s, "latest").map_err(serde::de::Error::custom)?;
    Ok(s)
}

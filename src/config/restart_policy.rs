// ABOUTME: Restart policy configuration for the deployed container.
// ABOUTME: Maps onto the runtime's restart policy options.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    No,
    Always,
    #[default]
    UnlessStopped,
    OnFailure {
        #[serde(default)]
        max_retries: Option<u32>,
    },
}

// ABOUTME: Stop configuration for the old container during replacement.
// ABOUTME: Timeout before the runtime escalates to SIGKILL.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct StopConfig {
    /// Grace period for the old container to exit.
    #[serde(default = "default_stop_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_stop_timeout() -> Duration {
    Duration::from_secs(30)
}

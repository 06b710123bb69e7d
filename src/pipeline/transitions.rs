// ABOUTME: State transition methods for the deployment pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::marker::PhantomData;
use std::time::Duration;

use crate::build::ImageBuilder;
use crate::hooks::{HookContext, HookPoint, HookRunner};
use crate::runtime::{
    ContainerConfig, ContainerError, ContainerOps, ImageOps, RestartPolicyConfig,
};
use crate::source::{SourceFetcher, Workspace};
use crate::types::ContainerId;

use super::error::StageError;
use super::run::Run;
use super::stage::Stage;
use super::state::{Activated, Completed, Created, ImageBuilt, SourceFetched, Verified};
use super::sweep::{SweepReport, sweep_repository};

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Run<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self) -> Run<T> {
        Run {
            config: self.config,
            image: self.image,
            env: self.env,
            new_container: self.new_container,
            _state: PhantomData,
        }
    }

    /// Internal helper to transition with the newly started container.
    fn transition_with_container<T>(self, container_id: ContainerId) -> Run<T> {
        Run {
            config: self.config,
            image: self.image,
            env: self.env,
            new_container: Some(container_id),
            _state: PhantomData,
        }
    }

    /// Build the runtime container configuration for the new instance.
    fn build_container_config(&self) -> ContainerConfig {
        let mut labels = self.config.labels.clone();
        labels.insert(
            "caravel.service".to_string(),
            self.config.service.to_string(),
        );
        labels.insert("caravel.managed".to_string(), "true".to_string());

        let restart_policy = match &self.config.restart {
            crate::config::RestartPolicy::No => RestartPolicyConfig::No,
            crate::config::RestartPolicy::Always => RestartPolicyConfig::Always,
            crate::config::RestartPolicy::UnlessStopped => RestartPolicyConfig::UnlessStopped,
            crate::config::RestartPolicy::OnFailure { max_retries } => {
                RestartPolicyConfig::OnFailure {
                    max_retries: *max_retries,
                }
            }
        };

        ContainerConfig {
            name: self.config.service.to_string(),
            image: self.image.clone(),
            env: self.env.clone(),
            labels,
            ports: self.config.port_mappings(),
            restart_policy,
            stop_timeout: self.config.stop.as_ref().map(|s| s.timeout),
        }
    }
}

/// Outcome of a teardown sub-step where absence counts as success.
///
/// Stop and remove targeting a nonexistent container are logical no-ops, so a
/// partially failed prior Deploy can be re-run safely. A genuine failure on
/// these sub-steps is tolerated too; only the run sub-step is fatal.
#[derive(Debug)]
pub(crate) enum Teardown {
    Done,
    Absent,
    Failed(ContainerError),
}

async fn stop_existing<R: ContainerOps>(
    runtime: &R,
    id: &ContainerId,
    timeout: Duration,
) -> Teardown {
    match runtime.stop_container(id, timeout).await {
        Ok(()) => Teardown::Done,
        Err(ContainerError::NotFound(_)) | Err(ContainerError::NotRunning(_)) => Teardown::Absent,
        Err(e) => Teardown::Failed(e),
    }
}

async fn remove_existing<R: ContainerOps>(runtime: &R, id: &ContainerId) -> Teardown {
    match runtime.remove_container(id, true).await {
        Ok(()) => Teardown::Done,
        Err(ContainerError::NotFound(_)) => Teardown::Absent,
        Err(e) => Teardown::Failed(e),
    }
}

// =============================================================================
// Created -> SourceFetched (Checkout)
// =============================================================================

impl Run<Created> {
    /// Fetch the exact source revision for this run into the workspace.
    ///
    /// # Errors
    ///
    /// Fatal: returns a `Stage::Checkout` error if the source cannot be
    /// retrieved. Host state is unchanged.
    #[must_use = "run state must be used"]
    pub async fn fetch_source<F: SourceFetcher>(
        self,
        fetcher: &F,
        workspace: &Workspace,
        revision: &str,
    ) -> Result<Run<SourceFetched>, StageError> {
        fetcher
            .fetch(workspace.path(), revision)
            .await
            .map_err(|e| StageError::new(Stage::Checkout, e.to_string()))?;

        Ok(self.transition())
    }
}

// =============================================================================
// SourceFetched -> ImageBuilt (Build)
// =============================================================================

impl Run<SourceFetched> {
    /// Invoke the artifact builder with this run's image tag.
    ///
    /// # Errors
    ///
    /// Fatal: returns a `Stage::Build` error if the build errors. On success
    /// the image reference is runnable on the host.
    #[must_use = "run state must be used"]
    pub async fn build_image<B: ImageBuilder>(
        self,
        builder: &B,
        workspace: &Workspace,
    ) -> Result<Run<ImageBuilt>, StageError> {
        let context = workspace.path().join(&self.config.build.context);

        builder
            .build(&context, &self.image)
            .await
            .map_err(|e| StageError::new(Stage::Build, e.to_string()))?;

        Ok(self.transition())
    }
}

// =============================================================================
// ImageBuilt -> Verified (Test)
// =============================================================================

impl Run<ImageBuilt> {
    /// Run the verification gate.
    ///
    /// Runs the project's `verify` hook when present; without one this is a
    /// no-op success, so callers must not rely on it catching defects.
    ///
    /// # Errors
    ///
    /// Fatal: returns a `Stage::Test` error if the hook exits non-zero,
    /// blocking Deploy.
    #[must_use = "run state must be used"]
    pub async fn verify(self, hooks: &HookRunner) -> Result<Run<Verified>, StageError> {
        let context = HookContext {
            service: self.config.service.clone(),
            image: self.image.to_string(),
            status: None,
        };

        match hooks.run(HookPoint::Verify, &context).await {
            None => {
                tracing::debug!("no verify hook configured, skipping test gate");
                Ok(self.transition())
            }
            Some(result) if result.success => Ok(self.transition()),
            Some(result) => Err(StageError::new(
                Stage::Test,
                format!(
                    "verify hook exited with {:?}: {}",
                    result.exit_code,
                    result.stderr.trim()
                ),
            )),
        }
    }
}

// =============================================================================
// Verified -> Activated (Deploy)
// =============================================================================

impl Run<Verified> {
    /// Replace the running container instance.
    ///
    /// Stops the old container if present (absence is success), removes it
    /// (absence is success), then starts the new instance under the reserved
    /// name. Stop fully precedes remove, remove fully precedes run; the name
    /// slot therefore goes "absent or old" -> "absent" -> "new" with no window
    /// where two instances coexist.
    ///
    /// # Errors
    ///
    /// Fatal only on the run sub-step. A start failure removes the created
    /// container, leaving the host degraded but consistent: no instance of
    /// the service, and the reserved name unclaimed.
    #[must_use = "run state must be used"]
    pub async fn activate<R: ContainerOps>(self, runtime: &R) -> Result<Run<Activated>, StageError> {
        let name = self.config.service.to_string();
        let stop_timeout = self.config.stop_timeout();

        match runtime.find_by_name(&name).await {
            Ok(Some(existing)) => {
                if existing.running {
                    match stop_existing(runtime, &existing.id, stop_timeout).await {
                        Teardown::Done => tracing::debug!(container = %existing.id, "stopped old container"),
                        Teardown::Absent => tracing::debug!(container = %existing.id, "old container already stopped"),
                        Teardown::Failed(e) => {
                            tracing::warn!(container = %existing.id, "stop failed (tolerated): {e}");
                        }
                    }
                }

                match remove_existing(runtime, &existing.id).await {
                    Teardown::Done => tracing::debug!(container = %existing.id, "removed old container"),
                    Teardown::Absent => tracing::debug!(container = %existing.id, "old container already removed"),
                    Teardown::Failed(e) => {
                        tracing::warn!(container = %existing.id, "remove failed (tolerated): {e}");
                    }
                }
            }
            Ok(None) => tracing::debug!(container = %name, "no existing container"),
            Err(e) => tracing::warn!(container = %name, "container lookup failed (tolerated): {e}"),
        }

        // The run sub-step: the only fatal step in this stage.
        let container_config = self.build_container_config();
        let container_id = runtime
            .create_container(&container_config)
            .await
            .map_err(|e| StageError::new(Stage::Deploy, format!("failed to create container: {e}")))?;

        if let Err(e) = runtime.start_container(&container_id).await {
            // Keep the host consistent: don't leave a half-created instance
            // holding the reserved name.
            let _ = runtime.remove_container(&container_id, true).await;
            return Err(StageError::new(
                Stage::Deploy,
                format!("failed to start container: {e}"),
            ));
        }

        Ok(self.transition_with_container(container_id))
    }
}

// =============================================================================
// Activated -> Completed (Cleanup)
// =============================================================================

impl Run<Activated> {
    /// Sweep stale images for this run's repository.
    ///
    /// Best-effort by construction: the signature is infallible, individual
    /// removal failures (typically the in-use image backing the container
    /// just started) are recorded in the report and never fail the run.
    #[must_use = "run state must be used"]
    pub async fn sweep_images<R: ImageOps>(self, runtime: &R) -> (Run<Completed>, SweepReport) {
        let report = sweep_repository(
            runtime,
            &self.config.repository,
            self.config.retain_images(),
        )
        .await;

        (self.transition(), report)
    }
}

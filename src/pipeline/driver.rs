// ABOUTME: Top-level pipeline driver.
// ABOUTME: Runs the stages in order and guarantees the post-run actions.

use crate::build::ImageBuilder;
use crate::diagnostics::{Diagnostics, Warning};
use crate::hooks::{HookContext, HookPoint, HookRunner};
use crate::runtime::{ContainerOps, ImageOps};
use crate::source::{SourceFetcher, Workspace};
use crate::types::{ContainerId, ImageRef, ServiceName};

use super::error::StageError;
use super::run::Run;
use super::state::Created;
use super::sweep::SweepReport;

/// Result of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub service: ServiceName,
    pub image: ImageRef,
    pub container: ContainerId,
    pub sweep: SweepReport,
}

/// Everything a run produced: the stage result plus non-fatal warnings
/// accumulated by the post-run actions.
pub struct RunOutcome {
    pub result: Result<RunSummary, StageError>,
    pub diagnostics: Diagnostics,
}

/// Execute a full deployment run.
///
/// Drives Checkout, Build, Test, Deploy, and Cleanup in order, stopping at
/// the first fatal stage error. Whatever the result, the post-run actions
/// then execute unconditionally: the workspace is deleted and the notify
/// hook fires with the final status. Post-run failures degrade to warnings
/// and never change the run's result.
pub async fn execute<R, F, B>(
    run: Run<Created>,
    runtime: &R,
    fetcher: &F,
    builder: &B,
    hooks: &HookRunner,
    workspace: &Workspace,
    revision: &str,
) -> RunOutcome
where
    R: ContainerOps + ImageOps,
    F: SourceFetcher,
    B: ImageBuilder,
{
    let service = run.service_name().clone();
    let image = run.image().to_string();

    let result = drive(run, runtime, fetcher, builder, hooks, workspace, revision).await;

    let mut diagnostics = Diagnostics::default();

    if let Err(e) = workspace.cleanup() {
        diagnostics.warn(Warning::workspace_cleanup(format!(
            "failed to delete workspace {}: {e}",
            workspace.path().display()
        )));
    }

    let status = match &result {
        Ok(_) => "success",
        Err(_) => "failure",
    };
    let context = HookContext {
        service,
        image,
        status: Some(status.to_string()),
    };
    if let Some(hook) = hooks.run(HookPoint::Notify, &context).await
        && !hook.success
    {
        diagnostics.warn(Warning::notify_hook(format!(
            "notify hook exited with {:?}: {}",
            hook.exit_code,
            hook.stderr.trim()
        )));
    }

    RunOutcome {
        result,
        diagnostics,
    }
}

async fn drive<R, F, B>(
    run: Run<Created>,
    runtime: &R,
    fetcher: &F,
    builder: &B,
    hooks: &HookRunner,
    workspace: &Workspace,
    revision: &str,
) -> Result<RunSummary, StageError>
where
    R: ContainerOps + ImageOps,
    F: SourceFetcher,
    B: ImageBuilder,
{
    tracing::info!(service = %run.service_name(), image = %run.image(), "starting deployment run");

    let run = run.fetch_source(fetcher, workspace, revision).await?;
    tracing::info!("checkout complete");

    let run = run.build_image(builder, workspace).await?;
    tracing::info!(image = %run.image(), "build complete");

    let run = run.verify(hooks).await?;
    tracing::info!("test gate passed");

    let run = run.activate(runtime).await?;
    tracing::info!(container = %run.deployed_container(), "deploy complete");

    let (run, sweep) = run.sweep_images(runtime).await;
    tracing::info!(
        removed = sweep.removed,
        attempted = sweep.attempted,
        "cleanup complete"
    );

    Ok(RunSummary {
        service: run.service_name().clone(),
        image: run.image().clone(),
        container: run.deployed_container().clone(),
        sweep,
    })
}

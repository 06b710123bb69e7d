// ABOUTME: Entry point for the caravel CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use caravel::build::ShellBuilder;
use caravel::config::{self, Config};
use caravel::diagnostics::Warning;
use caravel::error::{Error, Result};
use caravel::hooks::HookRunner;
use caravel::output::{Output, OutputMode};
use caravel::pipeline::{self, DeployLock, Run};
use caravel::runtime::{BollardRuntime, ContainerOps};
use caravel::source::{GitFetcher, Workspace};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            service,
            repository,
            force,
        } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, service.as_deref(), repository.as_deref(), force)
        }
        Commands::Deploy {
            tag,
            revision,
            force,
            quiet,
            json,
        } => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;

            let mode = if json {
                OutputMode::Json
            } else if quiet {
                OutputMode::Quiet
            } else {
                OutputMode::Normal
            };

            let revision = revision.unwrap_or_else(|| config.source.branch.clone());
            let tag = tag.unwrap_or_else(|| revision.clone());

            deploy(config, &cwd, &tag, &revision, force, mode).await
        }
        Commands::Status => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            status(&config).await
        }
    }
}

/// Run the full pipeline for one build tag.
async fn deploy(
    config: Config,
    project_dir: &Path,
    tag: &str,
    revision: &str,
    force: bool,
    mode: OutputMode,
) -> Result<()> {
    let mut output = Output::new(mode);
    output.start_timer();

    let run = Run::new(config.clone(), tag)?;
    output.progress(&format!(
        "Deploying {} as {}",
        run.service_name(),
        run.image()
    ));

    let runtime = BollardRuntime::connect_local()?;

    let lock = DeployLock::acquire(run.service_name(), force)?;

    let workspace = match Workspace::create(project_dir, run.service_name()) {
        Ok(ws) => ws,
        Err(e) => {
            // Don't leave the lock behind when setup fails.
            let _ = lock.release();
            return Err(e.into());
        }
    };

    let fetcher = GitFetcher::new(&config.source.repo);
    let builder = ShellBuilder::new(&config.build);
    let hooks = HookRunner::new(project_dir);

    let mut outcome = pipeline::execute(
        run, &runtime, &fetcher, &builder, &hooks, &workspace, revision,
    )
    .await;

    if let Err(e) = lock.release() {
        outcome
            .diagnostics
            .warn(Warning::lock_release(format!("failed to release lock: {e}")));
    }

    for warning in outcome.diagnostics.warnings() {
        output.warning(&warning.message);
    }

    match outcome.result {
        Ok(summary) => {
            output.success(&format!(
                "Deployed {} ({})",
                summary.image, summary.container
            ));
            if summary.sweep.removed > 0 {
                output.progress(&format!(
                    "Removed {} stale image(s)",
                    summary.sweep.removed
                ));
            }
            Ok(())
        }
        Err(e) => {
            output.error(&e.to_string());
            Err(Error::Deploy(e.to_string()))
        }
    }
}

/// Show the configured service and its container status on the host.
async fn status(config: &Config) -> Result<()> {
    println!("Service: {}", config.service);
    println!("Repository: {}", config.repository);

    let runtime = BollardRuntime::connect_local()?;
    match runtime.find_by_name(config.service.as_str()).await {
        Ok(Some(container)) => {
            let state = if container.running { "running" } else { "stopped" };
            println!("Container: {} ({state})", container.id);
            println!("Image: {}", container.image);
        }
        Ok(None) => println!("Container: not deployed"),
        Err(e) => return Err(Error::Deploy(format!("failed to query container: {e}"))),
    }

    Ok(())
}

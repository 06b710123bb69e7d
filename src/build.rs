// ABOUTME: Artifact builder collaborator.
// ABOUTME: ShellBuilder shells out to the configured builder program.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::config::BuildConfig;
use crate::types::ImageRef;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("image build failed: {stderr}")]
    Command { stderr: String },

    #[error("failed to run builder: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces an immutable, uniquely tagged image from a checked-out workspace.
/// The orchestrator only consumes the resulting image reference.
#[async_trait]
pub trait ImageBuilder: Send + Sync {
    async fn build(&self, context: &Path, image: &ImageRef) -> Result<(), BuildError>;
}

/// Invokes `<program> build -t <image> [-f <dockerfile>] <context>`.
pub struct ShellBuilder {
    program: String,
    dockerfile: Option<String>,
}

impl ShellBuilder {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            program: config.program.clone(),
            dockerfile: config.dockerfile.clone(),
        }
    }
}

#[async_trait]
impl ImageBuilder for ShellBuilder {
    async fn build(&self, context: &Path, image: &ImageRef) -> Result<(), BuildError> {
        tracing::debug!(image = %image, context = %context.display(), "building image");

        let mut cmd = Command::new(&self.program);
        cmd.arg("build").arg("-t").arg(image.to_string());
        if let Some(ref dockerfile) = self.dockerfile {
            cmd.arg("-f").arg(dockerfile);
        }
        cmd.arg(context)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BuildError::Command {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

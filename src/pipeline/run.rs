// ABOUTME: Generic pipeline run struct parameterized by state marker.
// ABOUTME: One run is scoped to one image reference and one credential set.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::config::{Config, resolve_env_map};
use crate::error::{Error, Result};
use crate::types::{ContainerId, ImageRef, ServiceName};

use super::state::{Activated, Completed, Created};

/// A deployment run in progress, parameterized by its current state.
///
/// The image reference is fixed at construction from the repository name and
/// the run's build tag. Credentials are resolved from the external store
/// exactly once, here, and threaded explicitly through the stages; they are
/// never read from ambient process state later and never logged.
#[derive(Debug)]
pub struct Run<S> {
    pub(crate) config: Config,
    pub(crate) image: ImageRef,
    pub(crate) env: HashMap<String, String>,
    pub(crate) new_container: Option<ContainerId>,
    pub(crate) _state: PhantomData<S>,
}

impl Run<Created> {
    /// Create a new run for the given build tag.
    ///
    /// # Errors
    ///
    /// Fails if the tag does not form a valid image reference or a referenced
    /// credential variable is missing. No host mutation has happened yet.
    pub fn new(config: Config, tag: &str) -> Result<Self> {
        let image = ImageRef::new(&config.repository, tag)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let env = resolve_env_map(&config.env)?;

        Ok(Run {
            config,
            image,
            env,
            new_container: None,
            _state: PhantomData,
        })
    }
}

impl<S> Run<S> {
    /// Get the reserved container name for this run.
    pub fn service_name(&self) -> &ServiceName {
        &self.config.service
    }

    /// Get the image reference this run deploys.
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Get the config.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Run<Activated> {
    /// Get the container started by the Deploy stage.
    pub fn deployed_container(&self) -> &ContainerId {
        self.new_container
            .as_ref()
            .expect("activated run must have a container")
    }
}

impl Run<Completed> {
    /// Get the container started by the Deploy stage.
    pub fn deployed_container(&self) -> &ContainerId {
        self.new_container
            .as_ref()
            .expect("completed run must have a container")
    }
}

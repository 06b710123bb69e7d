// ABOUTME: Shared test support: in-memory runtime, fetcher, and builder mocks.
// ABOUTME: Records every runtime call in order for assertions on sequencing.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use caravel::build::{BuildError, ImageBuilder};
use caravel::config::{Config, EnvValue, SourceConfig};
use caravel::runtime::{
    ContainerConfig, ContainerError, ContainerOps, ContainerSummary, ImageError, ImageOps,
    ImageSummary,
};
use caravel::source::{FetchError, SourceFetcher};
use caravel::types::{ContainerId, ImageId, ServiceName};

// =============================================================================
// Fixtures
// =============================================================================

pub const SERVICE: &str = "estate-genius";
pub const REPOSITORY: &str = "estate-genius-ai";

/// A config for the standard test service, with two opaque credential values.
pub fn test_config() -> Config {
    let mut env = HashMap::new();
    env.insert(
        "ANTHROPIC_API_KEY".to_string(),
        EnvValue::Literal("sk-test-anthropic".to_string()),
    );
    env.insert(
        "SEARCH_API_KEY".to_string(),
        EnvValue::Literal("sk-test-search".to_string()),
    );

    let mut config = Config::template();
    config.service = ServiceName::new(SERVICE).unwrap();
    config.repository = REPOSITORY.to_string();
    config.source = SourceConfig {
        repo: "https://example.com/estate-genius.git".to_string(),
        branch: "main".to_string(),
    };
    config.env = env;
    config
}

// =============================================================================
// Mock Runtime
// =============================================================================

/// One recorded runtime call, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindByName(String),
    Stop(String),
    Remove(String),
    Create(String),
    Start(String),
    ListImages(String),
    RemoveImage(String),
}

#[derive(Debug, Clone)]
struct MockContainer {
    id: String,
    name: String,
    image: String,
    running: bool,
    env: HashMap<String, String>,
    ports: Vec<(u16, u16)>,
}

#[derive(Debug, Clone)]
struct MockImage {
    id: String,
    repository: String,
    tag: String,
    created: i64,
}

#[derive(Default)]
struct State {
    containers: Vec<MockContainer>,
    images: Vec<MockImage>,
    calls: Vec<Call>,
    next_id: u64,
    fail_start: bool,
    fail_create: bool,
    fail_stop: bool,
    fail_list_images: bool,
}

/// In-memory container and image store implementing the runtime traits.
///
/// Containers mark the image they run as in-use: removing that image without
/// force fails with `InUse`, matching real runtime behavior.
#[derive(Clone, Default)]
pub struct MockRuntime {
    state: Arc<Mutex<State>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, name: &str, image: &str, running: bool) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("ctr-{}", state.next_id);
            state.next_id += 1;
            state.containers.push(MockContainer {
                id,
                name: name.to_string(),
                image: image.to_string(),
                running,
                env: HashMap::new(),
                ports: Vec::new(),
            });
        }
        self
    }

    pub fn with_image(self, repository: &str, tag: &str, created: i64) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("img-{}", state.next_id);
            state.next_id += 1;
            state.images.push(MockImage {
                id,
                repository: repository.to_string(),
                tag: tag.to_string(),
                created,
            });
        }
        self
    }

    pub fn fail_start(self) -> Self {
        self.state.lock().unwrap().fail_start = true;
        self
    }

    pub fn fail_create(self) -> Self {
        self.state.lock().unwrap().fail_create = true;
        self
    }

    pub fn fail_stop(self) -> Self {
        self.state.lock().unwrap().fail_stop = true;
        self
    }

    pub fn fail_list_images(self) -> Self {
        self.state.lock().unwrap().fail_list_images = true;
        self
    }

    /// Everything the runtime was asked to do, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Names of containers currently present.
    pub fn container_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Image the named container runs, if any, with its running flag.
    pub fn container_state(&self, name: &str) -> Option<(String, bool)> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| (c.image.clone(), c.running))
    }

    /// Environment the named container was created with.
    pub fn container_env(&self, name: &str) -> Option<HashMap<String, String>> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.env.clone())
    }

    /// Port mappings the named container was created with.
    pub fn container_ports(&self, name: &str) -> Option<Vec<(u16, u16)>> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.ports.clone())
    }

    /// Tags of images still present for a repository.
    pub fn image_tags(&self, repository: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .images
            .iter()
            .filter(|i| i.repository == repository)
            .map(|i| i.tag.clone())
            .collect()
    }

    fn insert_image(&self, repository: &str, tag: &str) {
        let mut state = self.state.lock().unwrap();
        let id = format!("img-{}", state.next_id);
        state.next_id += 1;
        let created = 1_000 + state.next_id as i64;
        state.images.push(MockImage {
            id,
            repository: repository.to_string(),
            tag: tag.to_string(),
            created,
        });
    }
}

#[async_trait]
impl ContainerOps for MockRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(config.name.clone()));

        if state.fail_create {
            return Err(ContainerError::Runtime("injected create failure".into()));
        }
        if state.containers.iter().any(|c| c.name == config.name) {
            return Err(ContainerError::AlreadyExists(config.name.clone()));
        }

        let id = format!("ctr-{}", state.next_id);
        state.next_id += 1;
        state.containers.push(MockContainer {
            id: id.clone(),
            name: config.name.clone(),
            image: config.image.to_string(),
            running: false,
            env: config.env.clone(),
            ports: config
                .ports
                .iter()
                .map(|p| (p.host_port, p.container_port))
                .collect(),
        });
        Ok(ContainerId::new(id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Start(id.to_string()));

        if state.fail_start {
            return Err(ContainerError::Runtime("injected start failure".into()));
        }
        let container = state
            .containers
            .iter_mut()
            .find(|c| c.id == id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        container.running = true;
        Ok(())
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: std::time::Duration,
    ) -> Result<(), ContainerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Stop(id.to_string()));

        if state.fail_stop {
            return Err(ContainerError::Runtime("injected stop failure".into()));
        }
        let container = state
            .containers
            .iter_mut()
            .find(|c| c.id == id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if !container.running {
            return Err(ContainerError::NotRunning(id.to_string()));
        }
        container.running = false;
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Remove(id.to_string()));

        let idx = state
            .containers
            .iter()
            .position(|c| c.id == id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if state.containers[idx].running && !force {
            return Err(ContainerError::Runtime(format!(
                "container is running: {id}"
            )));
        }
        state.containers.remove(idx);
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ContainerSummary>, ContainerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FindByName(name.to_string()));

        Ok(state
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| ContainerSummary {
                id: ContainerId::new(c.id.clone()),
                name: c.name.clone(),
                image: c.image.clone(),
                running: c.running,
            }))
    }
}

#[async_trait]
impl ImageOps for MockRuntime {
    async fn list_images(&self, repository: &str) -> Result<Vec<ImageSummary>, ImageError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListImages(repository.to_string()));

        if state.fail_list_images {
            return Err(ImageError::Runtime("injected list failure".into()));
        }
        Ok(state
            .images
            .iter()
            .filter(|i| i.repository == repository)
            .map(|i| ImageSummary {
                id: ImageId::new(i.id.clone()),
                tags: vec![format!("{}:{}", i.repository, i.tag)],
                created: i.created,
            })
            .collect())
    }

    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::RemoveImage(id.to_string()));

        let idx = state
            .images
            .iter()
            .position(|i| i.id == id.as_str())
            .ok_or_else(|| ImageError::NotFound(id.to_string()))?;

        let reference = format!(
            "{}:{}",
            state.images[idx].repository, state.images[idx].tag
        );
        let in_use = state.containers.iter().any(|c| c.image == reference);
        if in_use && !force {
            return Err(ImageError::InUse(reference));
        }
        state.images.remove(idx);
        Ok(())
    }
}

// =============================================================================
// Mock Collaborators
// =============================================================================

/// Fetcher that records invocations without touching the filesystem.
#[derive(Default)]
pub struct MockFetcher {
    fail: bool,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetched_revisions(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for MockFetcher {
    async fn fetch(&self, _workspace: &Path, revision: &str) -> Result<(), FetchError> {
        if self.fail {
            return Err(FetchError::Command {
                action: "clone".to_string(),
                stderr: "injected fetch failure".to_string(),
            });
        }
        self.fetched.lock().unwrap().push(revision.to_string());
        Ok(())
    }
}

/// Builder that registers the built image in the mock runtime's store.
pub struct MockBuilder {
    runtime: MockRuntime,
    fail: AtomicBool,
    built: Arc<Mutex<Vec<String>>>,
}

impl MockBuilder {
    pub fn new(runtime: &MockRuntime) -> Self {
        Self {
            runtime: runtime.clone(),
            fail: AtomicBool::new(false),
            built: Arc::default(),
        }
    }

    pub fn failing(runtime: &MockRuntime) -> Self {
        let builder = Self::new(runtime);
        builder.fail.store(true, Ordering::SeqCst);
        builder
    }

    pub fn built_images(&self) -> Vec<String> {
        self.built.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageBuilder for MockBuilder {
    async fn build(
        &self,
        _context: &Path,
        image: &caravel::types::ImageRef,
    ) -> Result<(), BuildError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BuildError::Command {
                stderr: "injected build failure".to_string(),
            });
        }
        self.runtime.insert_image(image.repository(), image.tag());
        self.built.lock().unwrap().push(image.to_string());
        Ok(())
    }
}

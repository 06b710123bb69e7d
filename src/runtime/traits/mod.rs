// ABOUTME: Runtime trait definitions for container runtimes.
// ABOUTME: The orchestrator consumes these primitives; it never implements the runtime.

mod container;
mod image;
mod shared_types;

pub use container::{ContainerError, ContainerOps, ContainerSummary};
pub use image::{ImageError, ImageOps, ImageSummary};
pub use shared_types::{ContainerConfig, PortMapping, Protocol, RestartPolicyConfig};

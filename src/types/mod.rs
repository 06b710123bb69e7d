// ABOUTME: Domain value types shared across the crate.
// ABOUTME: Image references, service names, and phantom-typed identifiers.

mod id;
mod image_ref;
mod service_name;

pub use id::{ContainerId, ContainerMarker, Id, ImageId, ImageMarker};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use service_name::{ServiceName, ServiceNameError};

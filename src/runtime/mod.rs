// ABOUTME: Container runtime integration.
// ABOUTME: Trait seam plus the bollard-backed implementation for the local socket.

mod bollard;
mod error;
pub mod traits;

pub use bollard::BollardRuntime;
pub use error::RuntimeError;
pub use traits::*;

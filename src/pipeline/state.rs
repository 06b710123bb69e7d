// ABOUTME: Pipeline state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce valid stage ordering at compile time.

/// Initial state: credentials resolved, image reference fixed.
/// Available actions: `fetch_source()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Created;

/// Source fetched: the exact revision is checked out in the workspace.
/// Available actions: `build_image()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceFetched;

/// Image built: the tagged image is runnable on the host.
/// Available actions: `verify()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBuilt;

/// Verified: the test gate passed (or no gate is configured).
/// Available actions: `activate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Verified;

/// Activated: the new container is running under the reserved name.
/// Available actions: `sweep_images()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Activated;

/// Completed: stale images swept, run terminal.
/// Available actions: `deployed_container()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Completed;

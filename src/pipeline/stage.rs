// ABOUTME: Stage identifiers for the deployment pipeline.
// ABOUTME: Used for reporting; transitions are enforced by the type state pattern.

use std::fmt;

/// The five pipeline stages, in execution order.
///
/// Transitions are strictly forward on success; an unrecovered failure in any
/// stage terminates the run. Checkout, Build, and Test failures are fatal
/// before any host mutation; Deploy's run sub-step is the only fatal step
/// after teardown; Cleanup never fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Checkout,
    Build,
    Test,
    Deploy,
    Cleanup,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Checkout => "checkout",
            Stage::Build => "build",
            Stage::Test => "test",
            Stage::Deploy => "deploy",
            Stage::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

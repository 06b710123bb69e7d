// ABOUTME: Deployment pipeline orchestration using the type state pattern.
// ABOUTME: Checkout, Build, Test, Deploy, Cleanup with per-stage failure policy.

mod driver;
mod error;
mod lock;
mod run;
mod stage;
mod state;
mod sweep;
mod transitions;

pub use driver::{RunOutcome, RunSummary, execute};
pub use error::StageError;
pub use lock::{DeployLock, LockError, LockInfo};
pub use run::Run;
pub use stage::Stage;
pub use state::{Activated, Completed, Created, ImageBuilt, SourceFetched, Verified};
pub use sweep::{SweepFailure, SweepReport};

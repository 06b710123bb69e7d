// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Covers connection failures to the local container runtime socket.

use snafu::Snafu;

/// Errors raised while establishing a runtime connection.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("failed to connect to container runtime: {message}"))]
    Connection { message: String },
}

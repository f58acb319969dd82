// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — SyncNet Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all SyncNet kernel failures.
///
/// Non-convergence is not an error: `simulate_dynamic` reports it through
/// [`crate::Termination`].
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid construction or simulation arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed topology (bad grid size, out-of-range neighbour, ...).
    #[error("topology error: {0}")]
    Topology(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Phase or frequency vector of the wrong length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

pub type SyncResult<T> = Result<T, SyncError>;

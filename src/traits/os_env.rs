//! Environment access.

use crate::Env;

/// Read-only access to environment variables.
pub trait OsEnv: Send + Sync {
    /// The environment snapshot.
    ///
    /// The returned value is owned by the caller. Nothing done with it is
    /// reflected back into the process environment.
    fn env(&self) -> Env;
}

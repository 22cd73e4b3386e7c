//! Execution context supplied by the caller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the signing code is running.
///
/// The signer never inspects ambient globals to find this out; callers pass it
/// explicitly. Anything that ships to end users (WASM bundles, desktop shells
/// embedding a web view) should pass [`ExecutionContext::Browser`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Trusted server with access to the secret key
    Server,
    /// Untrusted client environment
    Browser,
}

impl ExecutionContext {
    /// Whether a secret key may be used here
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Server)
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("server"),
            Self::Browser => f.write_str("browser"),
        }
    }
}

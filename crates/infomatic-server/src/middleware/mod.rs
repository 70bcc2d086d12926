//! Router middleware: session gates and cross-cutting HTTP layers.

mod guard;
mod observability;
mod recovery;
mod security;

pub use crate::middleware::guard::{require_admin, require_customer, require_editor};
pub use crate::middleware::observability::RouterObservabilityExt;
pub use crate::middleware::recovery::{RecoveryConfig, RouterRecoveryExt};
pub use crate::middleware::security::{CorsConfig, RouterSecurityExt};

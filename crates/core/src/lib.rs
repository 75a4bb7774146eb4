//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod types;

pub use error::{TerritoryError, TerritoryResult};
pub use types::{Distributor, EffectivePermissions, PermissionKind, PermissionRule};

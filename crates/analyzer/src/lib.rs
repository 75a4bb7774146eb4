//! Distributor hierarchy, permission resolution, report generator, and data sinks.

pub mod graph;
pub mod reporter;
pub mod resolver;
pub mod sink;

pub use graph::{Direction, Hierarchy};
pub use reporter::PermissionReport;
pub use resolver::{gather_effective_permissions, gather_inherited_permissions};

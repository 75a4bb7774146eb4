//! Region reference data for Territory.
//!
//! The permission core never needs region metadata to resolve; this crate
//! only serves display and optional validation.

pub mod regions;

pub use regions::{RegionInfo, RegionTable};

/// Read-only lookup from a region code to its descriptive metadata.
pub trait RegionLookup {
    fn lookup(&self, code: &str) -> Option<&RegionInfo>;

    fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }
}

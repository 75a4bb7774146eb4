//! Data sink for resolved permissions.
//!
//! One row schema, [`PermissionRow`]: one per (distributor, region).
//! One backend: NDJSON written to any `Write` impl.

pub mod json_stream;

use crate::reporter::PermissionReport;
use serde::Serialize;

/// One resolved region for one distributor, fully denormalized.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionRow {
    pub distributor: String,
    pub region: String,
    /// `include` or `exclude`.
    pub kind: String,
    pub city_name: Option<String>,
    pub province_name: Option<String>,
    pub country_name: Option<String>,
}

impl PermissionReport {
    /// Flatten the report into sink-ready rows, sorted by region.
    pub fn to_rows(&self) -> Vec<PermissionRow> {
        self.rows
            .iter()
            .map(|row| PermissionRow {
                distributor: self.distributor.clone(),
                region: row.region.clone(),
                kind: row.kind.as_str().to_ascii_lowercase(),
                city_name: row.city_name.clone(),
                province_name: row.province_name.clone(),
                country_name: row.country_name.clone(),
            })
            .collect()
    }
}

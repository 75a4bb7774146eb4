//! Human-readable permission report.
//!
//! Takes resolved [`EffectivePermissions`] and enriches each region with
//! names from a [`RegionLookup`] when the code is known.

use territory_core::{EffectivePermissions, PermissionKind};
use territory_provider::RegionLookup;

/// Report for one distributor, rows sorted by region.
#[derive(Debug)]
pub struct PermissionReport {
    pub distributor: String,
    pub rows: Vec<ReportRow>,
}

/// One resolved region plus whatever the lookup knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub region: String,
    pub kind: PermissionKind,
    pub city_name: Option<String>,
    pub province_name: Option<String>,
    pub country_name: Option<String>,
}

impl PermissionReport {
    pub fn build(
        distributor: &str,
        effective: &EffectivePermissions,
        regions: &dyn RegionLookup,
    ) -> Self {
        let rows = effective
            .to_sorted_rules()
            .into_iter()
            .map(|rule| {
                let info = regions.lookup(&rule.region);
                ReportRow {
                    city_name: info.map(|i| i.city_name.clone()),
                    province_name: info.map(|i| i.province_name.clone()),
                    country_name: info.map(|i| i.country_name.clone()),
                    region: rule.region,
                    kind: rule.kind,
                }
            })
            .collect();

        Self {
            distributor: distributor.to_string(),
            rows,
        }
    }

    pub fn include_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.kind == PermissionKind::Include)
            .count()
    }

    pub fn exclude_count(&self) -> usize {
        self.rows.len() - self.include_count()
    }

    /// Renders `Permissions for <name>:` followed by one line per region.
    pub fn render(&self) -> String {
        let mut out = format!("Permissions for {}:\n", self.distributor);

        if self.rows.is_empty() {
            out.push_str("  (none)\n");
            return out;
        }

        for row in &self.rows {
            out.push_str(&format!("{}: {}", row.kind, row.region));
            if let (Some(city), Some(province), Some(country)) =
                (&row.city_name, &row.province_name, &row.country_name)
            {
                out.push_str(&format!(" ({city}, {province}, {country})"));
            }
            out.push('\n');
        }
        out
    }
}

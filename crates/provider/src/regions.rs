//! In-memory region table loaded from CSV.
//!
//! Expected layout, header row first:
//!
//! ```text
//! City Code,Province Code,Country Code,City Name,Province Name,Country Name
//! PUNCH,PB,IN,Punch,Punjab,India
//! ```
//!
//! Fields are trimmed. Quoted fields may contain commas, e.g.
//! `"Korea, Republic of"`.

use crate::RegionLookup;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use territory_core::error::TerritoryResult;

/// Descriptive metadata for one region code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub code: String,
    pub province_code: String,
    pub country_code: String,
    pub city_name: String,
    pub province_name: String,
    pub country_name: String,
}

/// `HashMap`-backed [`RegionLookup`]. Later rows win on duplicate codes.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: HashMap<String, RegionInfo>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens and parses a CSV file.
    pub fn load(path: impl AsRef<Path>) -> TerritoryResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), regions = table.len(), "loaded region table");
        Ok(table)
    }

    /// Parses CSV from any reader. The first record is the header.
    ///
    /// Records that do not have exactly six fields are skipped with a
    /// warning; I/O failures abort the load.
    pub fn from_reader<R: Read>(reader: R) -> TerritoryResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut table = Self::new();

        for record in rdr.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(io::Error::from(e).into()),
                Err(e) => {
                    tracing::warn!(
                        line = e.position().map(|p| p.line()),
                        error = %e,
                        "skipping malformed region row"
                    );
                    continue;
                }
            };

            match record.deserialize::<RegionInfo>(None) {
                Ok(info) => table.insert(info),
                Err(e) => tracing::warn!(
                    line = record.position().map(|p| p.line()),
                    error = %e,
                    "skipping malformed region row"
                ),
            }
        }

        Ok(table)
    }

    pub fn insert(&mut self, info: RegionInfo) {
        self.regions.insert(info.code.clone(), info);
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl RegionLookup for RegionTable {
    fn lookup(&self, code: &str) -> Option<&RegionInfo> {
        self.regions.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
City Code,Province Code,Country Code,City Name,Province Name,Country Name
PUNCH,PB,IN,Punch,Punjab,India
YAVAT,MH,IN,Yavatmal,Maharashtra,India

BROKEN,ROW
CHIAL,OR,US,Chiloquin,Oregon,United States
";

    #[test]
    fn loads_rows_and_skips_header() {
        let table = RegionTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.contains("City Code"));

        let punch = table.lookup("PUNCH").unwrap();
        assert_eq!(punch.province_name, "Punjab");
        assert_eq!(punch.country_name, "India");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let table = RegionTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(table.lookup("BROKEN").is_none());
        assert!(table.contains("CHIAL"));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let csv = "\
City Code,Province Code,Country Code,City Name,Province Name,Country Name
KRALE,BO,BQ,Kralendijk,Bonaire,\"Bonaire, Sint Eustatius and Saba\"
SEOUL,11,KR,Seoul,Seoul,\"Korea, Republic of\"
";
        let table = RegionTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("KRALE").unwrap().country_name,
            "Bonaire, Sint Eustatius and Saba"
        );
        assert_eq!(table.lookup("SEOUL").unwrap().country_name, "Korea, Republic of");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = RegionTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(table.lookup("punch").is_none());
    }

    #[test]
    fn later_duplicate_wins() {
        let csv = "h,h,h,h,h,h\nX,P1,C,Old,P,C\nX,P2,C,New,P,C\n";
        let table = RegionTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("X").unwrap().city_name, "New");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RegionTable::load("/nonexistent/cities.csv").unwrap_err();
        assert!(matches!(err, territory_core::TerritoryError::Io(_)));
    }
}

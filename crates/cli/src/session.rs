//! Text commands translated into hierarchy operations.
//!
//! Script grammar, one command per line:
//!
//! ```text
//! create <name>
//! add <name> <include|exclude> <region>[,<region>...]
//! link <parent> <child>
//! show <name>
//! inherited <name>
//! ```

use std::str::{FromStr, SplitWhitespace};
use territory_analyzer::{
    gather_effective_permissions, gather_inherited_permissions, Hierarchy, PermissionReport,
};
use territory_core::error::{TerritoryError, TerritoryResult};
use territory_provider::RegionLookup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(String),
    Add {
        name: String,
        kind: String,
        regions: Vec<String>,
    },
    Link {
        parent: String,
        child: String,
    },
    Show(String),
    Inherited(String),
}

impl FromStr for Command {
    type Err = TerritoryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();

        let command = match verb {
            "create" => Command::Create(next_arg(&mut parts, verb, "name")?),
            "add" => {
                let name = next_arg(&mut parts, verb, "name")?;
                let kind = next_arg(&mut parts, verb, "permission type")?;
                let rest: Vec<&str> = parts.collect();
                let regions = split_regions(&rest.join(" "));
                if regions.is_empty() {
                    return Err(TerritoryError::InvalidInput("add: missing regions".into()));
                }
                Command::Add {
                    name,
                    kind,
                    regions,
                }
            }
            "link" => Command::Link {
                parent: next_arg(&mut parts, verb, "parent")?,
                child: next_arg(&mut parts, verb, "child")?,
            },
            "show" => Command::Show(next_arg(&mut parts, verb, "name")?),
            "inherited" => Command::Inherited(next_arg(&mut parts, verb, "name")?),
            other => {
                return Err(TerritoryError::InvalidInput(format!(
                    "unknown command '{other}'"
                )))
            }
        };
        Ok(command)
    }
}

fn next_arg(parts: &mut SplitWhitespace<'_>, verb: &str, what: &str) -> TerritoryResult<String> {
    parts
        .next()
        .map(str::to_string)
        .ok_or_else(|| TerritoryError::InvalidInput(format!("{verb}: missing {what}")))
}

/// Splits a comma-separated region list, dropping empty entries.
pub fn split_regions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// What a successful command produced.
#[derive(Debug)]
pub enum Outcome {
    Created(String),
    Added { name: String, count: usize },
    Linked { parent: String, child: String },
    Report(PermissionReport),
}

/// One hierarchy plus the region data used to enrich reports.
pub struct Session<L: RegionLookup> {
    pub hierarchy: Hierarchy,
    regions: L,
}

impl<L: RegionLookup> Session<L> {
    pub fn new(regions: L) -> Self {
        Self {
            hierarchy: Hierarchy::new(),
            regions,
        }
    }

    pub fn execute(&mut self, command: Command) -> TerritoryResult<Outcome> {
        match command {
            Command::Create(name) => {
                let created = self.hierarchy.create_distributor(&name)?;
                Ok(Outcome::Created(created.name.clone()))
            }
            Command::Add {
                name,
                kind,
                regions,
            } => {
                let count = self.hierarchy.add_permissions_str(&name, &kind, &regions)?;
                Ok(Outcome::Added { name, count })
            }
            Command::Link { parent, child } => {
                self.hierarchy.link_distributors(&parent, &child)?;
                Ok(Outcome::Linked { parent, child })
            }
            Command::Show(name) => {
                let effective = gather_effective_permissions(&self.hierarchy, &name)?;
                Ok(Outcome::Report(PermissionReport::build(
                    &name,
                    &effective,
                    &self.regions,
                )))
            }
            Command::Inherited(name) => {
                let effective = gather_inherited_permissions(&self.hierarchy, &name)?;
                Ok(Outcome::Report(PermissionReport::build(
                    &name,
                    &effective,
                    &self.regions,
                )))
            }
        }
    }

    /// Parses and executes one script line. Blank lines and `#` comments
    /// yield `Ok(None)`.
    pub fn execute_line(&mut self, line: &str) -> TerritoryResult<Option<Outcome>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let command: Command = line.parse()?;
        self.execute(command).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use territory_core::PermissionKind;
    use territory_provider::RegionTable;

    #[test]
    fn parses_add_with_spaced_region_list() {
        let cmd: Command = "add acme include IN, US ,, UK".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                name: "acme".into(),
                kind: "include".into(),
                regions: vec!["IN".into(), "US".into(), "UK".into()],
            }
        );
    }

    #[test]
    fn rejects_unknown_verb_and_missing_args() {
        assert!(matches!(
            "remove acme".parse::<Command>(),
            Err(TerritoryError::InvalidInput(_))
        ));
        assert!(matches!(
            "link acme".parse::<Command>(),
            Err(TerritoryError::InvalidInput(_))
        ));
        assert!(matches!(
            "add acme include".parse::<Command>(),
            Err(TerritoryError::InvalidInput(_))
        ));
    }

    #[test]
    fn script_session_end_to_end() {
        let mut session = Session::new(RegionTable::new());
        let script = "\
# distributors
create acme
create retail
add acme exclude US
add retail include IN
link acme retail
show acme
";
        let mut last = None;
        for line in script.lines() {
            if let Some(outcome) = session.execute_line(line).unwrap() {
                last = Some(outcome);
            }
        }

        match last {
            Some(Outcome::Report(report)) => {
                assert_eq!(report.include_count(), 1);
                assert_eq!(report.exclude_count(), 1);
            }
            other => panic!("expected report, got {other:?}"),
        }
        let acme = session.hierarchy.get("acme").unwrap();
        assert_eq!(acme.rules[0].kind, PermissionKind::Exclude);
    }

    #[test]
    fn invalid_kind_does_not_mutate() {
        let mut session = Session::new(RegionTable::new());
        session.execute_line("create acme").unwrap();
        assert!(session.execute_line("add acme allow IN").is_err());
        assert!(session.hierarchy.get("acme").unwrap().rules.is_empty());
    }
}

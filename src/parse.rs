use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::data::{ArchPackageSet, Package};

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    epoch: Option<EpochField>,
    version: String,
    release: String,
    arch: String,
}

// the rdb API emits integer epochs, but older exports carried strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EpochField {
    Number(i64),
    Text(String),
}

impl RawPackage {
    fn into_package(self) -> Package {
        let epoch = match self.epoch {
            Some(EpochField::Number(number)) => number.to_string(),
            Some(EpochField::Text(text)) => text,
            None => String::from("0"),
        };

        Package {
            name: self.name,
            epoch,
            version: self.version,
            release: self.release,
            arch: self.arch,
        }
    }
}

/// Parses one branch's package list document into packages grouped by architecture.
///
/// A document that is not valid JSON or has no `packages` array is an error.
/// Entries that do not match the expected shape are skipped with a warning.
/// Duplicate (arch, name) pairs keep the last entry in input order.
pub fn parse_packages(raw: &str) -> Result<ArchPackageSet, String> {
    let document: Value = serde_json::from_str(raw).map_err(|error| format!("invalid JSON: {}", error))?;

    let entries = match document.get("packages").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Err(String::from("the 'packages' array is missing")),
    };

    let mut set = ArchPackageSet::new();
    let mut skipped: usize = 0;

    for (index, entry) in entries.iter().enumerate() {
        let raw_package: RawPackage = match serde_json::from_value(entry.clone()) {
            Ok(raw_package) => raw_package,
            Err(error) => {
                warn!("Skipping malformed package entry at index {}: {}", index, error);
                skipped += 1;
                continue;
            },
        };

        if raw_package.name.is_empty() {
            warn!("Skipping package entry with an empty name at index {}", index);
            skipped += 1;
            continue;
        }

        let package = raw_package.into_package();

        set.entry(package.arch.clone())
            .or_default()
            .insert(package.name.clone(), package);
    }

    if skipped > 0 {
        warn!("Skipped {} malformed package entries.", skipped);
    }

    Ok(set)
}

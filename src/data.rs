use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CompareError;

/// One binary package build from a branch manifest.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub epoch: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

/// Package name to package record, for one architecture.
pub type PackageMap = BTreeMap<String, Package>;

/// Architecture name to package map, for one branch.
///
/// Ordered maps keep diff output deterministic: entries are always reported in
/// lexicographic name order.
pub type ArchPackageSet = BTreeMap<String, PackageMap>;

/// Packages present in only one of the two branches.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct NameCategory {
    pub count: usize,
    pub packages: Vec<String>,
}

/// A package present in both branches at a strictly newer version in the first.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct NewerPackage {
    pub name: String,
    pub branch1_version_release: String,
    pub branch2_version_release: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct NewerCategory {
    pub count: usize,
    pub packages: Vec<NewerPackage>,
}

/// The three diff categories for one architecture.
///
/// There is deliberately no "newer in second branch" category; swap the argument
/// order to ask the opposite question.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ArchComparison {
    pub branch1_only: NameCategory,
    pub branch2_only: NameCategory,
    pub branch1_newer: NewerCategory,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub total_branch1_only_count: usize,
    pub total_branch2_only_count: usize,
    pub total_branch1_newer_count: usize,
}

/// Complete comparison report for one pair of branches.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub architectures: BTreeMap<String, ArchComparison>,
    pub summary: ComparisonSummary,
}

impl ComparisonResult {
    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CompareError> {
        serde_json::to_string_pretty(self).map_err(|error| CompareError::Encode(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ComparisonResult {
        let mut result = ComparisonResult::default();

        let mut comparison = ArchComparison::default();
        comparison.branch2_only.packages.push(String::from("pkgY"));
        comparison.branch2_only.count = 1;
        comparison.branch1_newer.packages.push(NewerPackage {
            name: String::from("pkgZ"),
            branch1_version_release: String::from("1.1-1"),
            branch2_version_release: String::from("1.0-1"),
        });
        comparison.branch1_newer.count = 1;

        result.architectures.insert(String::from("noarch"), comparison);
        result.summary.total_branch2_only_count = 1;
        result.summary.total_branch1_newer_count = 1;

        result
    }

    #[test]
    fn test_report_round_trip() {
        let result = sample_result();

        let json = result.to_json().unwrap();
        let parsed: ComparisonResult = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, result);
    }

    #[test]
    fn test_report_field_names() {
        let json = sample_result().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let arch = &value["architectures"]["noarch"];
        assert_eq!(arch["branch1_only"]["count"], 0);
        assert_eq!(arch["branch2_only"]["packages"][0], "pkgY");
        assert_eq!(arch["branch1_newer"]["packages"][0]["name"], "pkgZ");
        assert_eq!(arch["branch1_newer"]["packages"][0]["branch1_version_release"], "1.1-1");
        assert_eq!(arch["branch1_newer"]["packages"][0]["branch2_version_release"], "1.0-1");
        assert_eq!(value["summary"]["total_branch1_newer_count"], 1);
        assert_eq!(value["summary"]["total_branch1_only_count"], 0);
    }
}

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::data::{ArchComparison, ArchPackageSet, ComparisonResult, NewerPackage, PackageMap};
use crate::version::compare_evr;

/// Computes the three-way comparison between two branches' package sets.
///
/// Every architecture present in either input appears in the result, with
/// packages sorted by name. A package present in both branches produces a
/// `branch1_newer` entry only when the first branch's build is strictly newer;
/// equal or older builds produce nothing.
pub fn diff_package_sets(first: &ArchPackageSet, second: &ArchPackageSet) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    let empty = PackageMap::new();

    let architectures: BTreeSet<&str> = first.keys().chain(second.keys()).map(String::as_str).collect();

    for arch in architectures {
        let first_packages = first.get(arch).unwrap_or(&empty);
        let second_packages = second.get(arch).unwrap_or(&empty);

        let mut comparison = ArchComparison::default();

        for (name, package) in first_packages {
            match second_packages.get(name) {
                Some(other) => {
                    if compare_evr(package, other) == Ordering::Greater {
                        comparison.branch1_newer.packages.push(NewerPackage {
                            name: name.clone(),
                            branch1_version_release: format!("{}-{}", package.version, package.release),
                            branch2_version_release: format!("{}-{}", other.version, other.release),
                        });
                    }
                },
                None => comparison.branch1_only.packages.push(name.clone()),
            }
        }

        for name in second_packages.keys() {
            if !first_packages.contains_key(name) {
                comparison.branch2_only.packages.push(name.clone());
            }
        }

        comparison.branch1_only.count = comparison.branch1_only.packages.len();
        comparison.branch2_only.count = comparison.branch2_only.packages.len();
        comparison.branch1_newer.count = comparison.branch1_newer.packages.len();

        result.summary.total_branch1_only_count += comparison.branch1_only.count;
        result.summary.total_branch2_only_count += comparison.branch2_only.count;
        result.summary.total_branch1_newer_count += comparison.branch1_newer.count;

        result.architectures.insert(String::from(arch), comparison);
    }

    result
}

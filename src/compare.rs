use crate::branches::{branch_packages_url, BranchCache};
use crate::data::ComparisonResult;
use crate::diff::diff_package_sets;
use crate::error::CompareError;
use crate::fetch::Fetch;
use crate::parse::parse_packages;

async fn check_branch(cache: &BranchCache, branch: &str) -> Result<(), CompareError> {
    if branch.is_empty() {
        return Err(CompareError::EmptyBranchName);
    }

    if !cache.is_valid(branch).await {
        return Err(CompareError::UnknownBranch(branch.to_string()));
    }

    Ok(())
}

/// Fetches the raw package list document for one branch, after validating the
/// branch name against the known-branches cache.
pub async fn fetch_package_list(
    fetcher: &dyn Fetch,
    cache: &BranchCache,
    api_url: &str,
    branch: &str,
) -> Result<String, CompareError> {
    check_branch(cache, branch).await?;

    let url = branch_packages_url(api_url, branch);

    fetcher.fetch(&url).await.map_err(|reason| CompareError::Fetch { url, reason })
}

/// Compares the package inventories of two branches.
///
/// Both branch names are validated first; the two manifests are then fetched
/// concurrently, parsed, and diffed. Any failure aborts the whole comparison;
/// no partial result is returned.
pub async fn compare_branches(
    fetcher: &dyn Fetch,
    cache: &BranchCache,
    api_url: &str,
    branch1: &str,
    branch2: &str,
) -> Result<ComparisonResult, CompareError> {
    check_branch(cache, branch1).await?;
    check_branch(cache, branch2).await?;

    let url1 = branch_packages_url(api_url, branch1);
    let url2 = branch_packages_url(api_url, branch2);

    let (raw1, raw2) = tokio::try_join!(
        async {
            fetcher.fetch(&url1).await.map_err(|reason| CompareError::Fetch {
                url: url1.clone(),
                reason,
            })
        },
        async {
            fetcher.fetch(&url2).await.map_err(|reason| CompareError::Fetch {
                url: url2.clone(),
                reason,
            })
        },
    )?;

    compare_raw(&raw1, &raw2, branch1, branch2)
}

/// Compares two already fetched package list documents.
pub fn compare_package_lists(first_raw: &str, second_raw: &str) -> Result<ComparisonResult, CompareError> {
    compare_raw(first_raw, second_raw, "branch1", "branch2")
}

fn compare_raw(
    first_raw: &str,
    second_raw: &str,
    first_label: &str,
    second_label: &str,
) -> Result<ComparisonResult, CompareError> {
    let first = parse_packages(first_raw).map_err(|reason| CompareError::Parse {
        branch: first_label.to_string(),
        reason,
    })?;

    let second = parse_packages(second_raw).map_err(|reason| CompareError::Parse {
        branch: second_label.to_string(),
        reason,
    })?;

    Ok(diff_package_sets(&first, &second))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::branches::branch_tree_url;

    use super::*;

    const API_URL: &str = "http://rdb.test/api";

    struct StaticFetcher {
        responses: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetch for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, String> {
            match self.responses.get(url) {
                Some(body) => Ok(body.clone()),
                None => Err(String::from("HTTP status 404 Not Found")),
            }
        }
    }

    fn fixture(responses: Vec<(String, &str)>) -> (Arc<dyn Fetch>, BranchCache) {
        let mut map = HashMap::new();
        map.insert(
            branch_tree_url(API_URL),
            String::from(r#"{"branches": ["alpha", "beta"]}"#),
        );
        for (url, body) in responses {
            map.insert(url, String::from(body));
        }

        let fetcher: Arc<dyn Fetch> = Arc::new(StaticFetcher { responses: map });
        let cache = BranchCache::new(branch_tree_url(API_URL), fetcher.clone());

        (fetcher, cache)
    }

    #[tokio::test]
    async fn test_compare_branches_end_to_end() {
        let (fetcher, cache) = fixture(vec![
            (
                branch_packages_url(API_URL, "alpha"),
                r#"{"packages": [
                    {"name": "pkgX", "epoch": 0, "version": "1.0", "release": "1", "arch": "noarch"}
                ]}"#,
            ),
            (
                branch_packages_url(API_URL, "beta"),
                r#"{"packages": [
                    {"name": "pkgX", "epoch": 0, "version": "1.1", "release": "1", "arch": "noarch"},
                    {"name": "pkgY", "epoch": 0, "version": "1.0", "release": "1", "arch": "noarch"}
                ]}"#,
            ),
        ]);

        let result = compare_branches(fetcher.as_ref(), &cache, API_URL, "alpha", "beta")
            .await
            .unwrap();

        let noarch = &result.architectures["noarch"];
        assert!(noarch.branch1_only.packages.is_empty());
        assert_eq!(noarch.branch2_only.packages, vec!["pkgY"]);
        // beta's pkgX is newer, and there is no "newer in second" category
        assert!(noarch.branch1_newer.packages.is_empty());

        assert_eq!(result.summary.total_branch1_only_count, 0);
        assert_eq!(result.summary.total_branch2_only_count, 1);
        assert_eq!(result.summary.total_branch1_newer_count, 0);
    }

    #[tokio::test]
    async fn test_empty_branch_name_is_invalid_input() {
        let (fetcher, cache) = fixture(vec![]);

        let error = compare_branches(fetcher.as_ref(), &cache, API_URL, "", "beta")
            .await
            .unwrap_err();

        assert!(matches!(error, CompareError::EmptyBranchName));
    }

    #[tokio::test]
    async fn test_unknown_branch_is_rejected() {
        let (fetcher, cache) = fixture(vec![]);

        let error = compare_branches(fetcher.as_ref(), &cache, API_URL, "alpha", "gamma")
            .await
            .unwrap_err();

        assert!(matches!(error, CompareError::UnknownBranch(name) if name == "gamma"));
    }

    #[tokio::test]
    async fn test_manifest_fetch_failure_aborts() {
        // both branches validate, but no manifest responses are registered
        let (fetcher, cache) = fixture(vec![]);

        let error = compare_branches(fetcher.as_ref(), &cache, API_URL, "alpha", "beta")
            .await
            .unwrap_err();

        assert!(matches!(error, CompareError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_unparsable_manifest_aborts() {
        let (fetcher, cache) = fixture(vec![
            (branch_packages_url(API_URL, "alpha"), r#"{"packages": []}"#),
            (branch_packages_url(API_URL, "beta"), "<html>garbage</html>"),
        ]);

        let error = compare_branches(fetcher.as_ref(), &cache, API_URL, "alpha", "beta")
            .await
            .unwrap_err();

        assert!(matches!(error, CompareError::Parse { branch, .. } if branch == "beta"));
    }

    #[tokio::test]
    async fn test_fetch_package_list_returns_raw_body() {
        let manifest = r#"{"packages": []}"#;
        let (fetcher, cache) = fixture(vec![(branch_packages_url(API_URL, "alpha"), manifest)]);

        let body = fetch_package_list(fetcher.as_ref(), &cache, API_URL, "alpha")
            .await
            .unwrap();

        assert_eq!(body, manifest);
    }

    #[test]
    fn test_compare_package_lists_offline() {
        let first = r#"{"packages": [
            {"name": "pkgA", "epoch": 0, "version": "2.0", "release": "1", "arch": "x86_64"}
        ]}"#;
        let second = r#"{"packages": [
            {"name": "pkgA", "epoch": 0, "version": "1.0", "release": "1", "arch": "x86_64"}
        ]}"#;

        let result = compare_package_lists(first, second).unwrap();

        assert_eq!(result.architectures["x86_64"].branch1_newer.count, 1);
    }
}

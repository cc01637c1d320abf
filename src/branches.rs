use std::collections::BTreeSet;
use std::sync::Arc;

use log::error;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::fetch::Fetch;

pub fn branch_tree_url(api_url: &str) -> String {
    format!("{}/export/branch_tree", api_url)
}

pub fn branch_packages_url(api_url: &str, branch: &str) -> String {
    format!("{}/export/branch_binary_packages/{}", api_url, branch)
}

#[derive(Debug, Deserialize)]
struct BranchTree {
    branches: Vec<String>,
}

/// Cache of the branch names known to the package database.
///
/// The listing is fetched at most once per cache instance, even under
/// concurrent first-time validations. If that fetch fails, the cache stays
/// empty and every later validation fails until a new cache is constructed.
pub struct BranchCache {
    url: String,
    fetcher: Arc<dyn Fetch>,
    branches: OnceCell<BTreeSet<String>>,
}

impl BranchCache {
    pub fn new(url: String, fetcher: Arc<dyn Fetch>) -> BranchCache {
        BranchCache {
            url,
            fetcher,
            branches: OnceCell::new(),
        }
    }

    /// Checks whether a branch name is known. Empty names are rejected before
    /// the listing is ever fetched.
    pub async fn is_valid(&self, branch: &str) -> bool {
        if branch.is_empty() {
            return false;
        }

        let known = self.load().await;

        if known.is_empty() {
            error!("The list of known branches is empty. Rejecting '{}'.", branch);
            return false;
        }

        known.contains(branch)
    }

    /// All known branch names, in lexicographic order. Empty when the listing
    /// fetch failed.
    pub async fn known_branches(&self) -> Vec<String> {
        self.load().await.iter().cloned().collect()
    }

    async fn load(&self) -> &BTreeSet<String> {
        self.branches
            .get_or_init(|| async {
                match self.fetch_branches().await {
                    Ok(branches) => branches,
                    Err(error) => {
                        error!("Failed to fetch the branch listing: {}", error);
                        BTreeSet::new()
                    },
                }
            })
            .await
    }

    async fn fetch_branches(&self) -> Result<BTreeSet<String>, String> {
        let body = self.fetcher.fetch(&self.url).await?;

        let tree: BranchTree = serde_json::from_str(&body).map_err(|error| error.to_string())?;

        Ok(tree.branches.into_iter().collect())
    }
}

#![warn(clippy::unwrap_used)]

use std::sync::Arc;

use branchcompare::branches::{branch_tree_url, BranchCache};
use branchcompare::config::get_config;
use branchcompare::fetch::{Fetch, HttpFetcher};
use branchcompare::server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = get_config()?;

    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(config.branchcompare.timeout)?);
    let cache = BranchCache::new(branch_tree_url(&config.branchcompare.api_url), fetcher.clone());

    let state = Arc::new(AppState {
        config,
        fetcher,
        cache,
    });

    serve(state).await
}

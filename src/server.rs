use std::net::SocketAddr;
use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};

use crate::branches::BranchCache;
use crate::compare::{compare_branches, fetch_package_list};
use crate::config::Config;
use crate::error::CompareError;
use crate::fetch::Fetch;
use crate::templates::Index;

pub struct AppState {
    pub config: Config,
    pub fetcher: Arc<dyn Fetch>,
    pub cache: BranchCache,
}

pub type SharedState = Arc<AppState>;

pub async fn serve(state: SharedState) -> Result<(), String> {
    let address = format!("{}:{}", &state.config.server.host, state.config.server.port)
        .parse::<SocketAddr>()
        .map_err(|error| error.to_string())?;

    let app = Router::new()
        .route("/", get(index))
        .route("/branches", get(branches))
        .route("/packages/:branch", get(packages))
        .route("/compare/:branch1/:branch2", get(compare))
        .with_state(state);

    info!("Listening on http://{}", &address);

    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await
        .map_err(|error| error.to_string())
}

async fn index(State(state): State<SharedState>) -> Response {
    let known = state.cache.known_branches().await;

    let template = Index::new(known);

    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal template rendering error: {}", error),
        )
            .into_response(),
    }
}

async fn branches(State(state): State<SharedState>) -> Response {
    let known = state.cache.known_branches().await;

    if known.is_empty() {
        return (
            StatusCode::BAD_GATEWAY,
            String::from("The list of known branches is not available."),
        )
            .into_response();
    }

    Json(known).into_response()
}

async fn packages(State(state): State<SharedState>, Path(branch): Path<String>) -> Response {
    let result = fetch_package_list(
        state.fetcher.as_ref(),
        &state.cache,
        &state.config.branchcompare.api_url,
        &branch,
    )
    .await;

    match result {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(error) => error_response(&error),
    }
}

async fn compare(
    State(state): State<SharedState>,
    Path((branch1, branch2)): Path<(String, String)>,
) -> Response {
    let result = compare_branches(
        state.fetcher.as_ref(),
        &state.cache,
        &state.config.branchcompare.api_url,
        &branch1,
        &branch2,
    )
    .await;

    let report = match result {
        Ok(report) => report,
        Err(error) => return error_response(&error),
    };

    match report.to_json() {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(error) => error_response(&error),
    }
}

fn error_response(error: &CompareError) -> Response {
    let status = match error {
        CompareError::EmptyBranchName => StatusCode::BAD_REQUEST,
        CompareError::UnknownBranch(_) => StatusCode::NOT_FOUND,
        CompareError::Fetch { .. } => StatusCode::BAD_GATEWAY,
        CompareError::Parse { .. } => StatusCode::BAD_GATEWAY,
        CompareError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!("Request failed: {}", error);

    (status, error.to_string()).into_response()
}

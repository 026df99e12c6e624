//! HTTP route handlers.

use std::time::Duration;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::board::BoardState;
use crate::domain::StationQuery;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/board", get(get_board))
        .route("/board/refresh", post(refresh_board))
        .route("/board/station", post(select_station))
        .route("/search/suggestions", get(suggestions))
        .route("/search/select", post(select_suggestion))
        .route("/search/submit", post(submit_search))
        .route("/search/dismiss", post(dismiss_search))
        .route("/search/focus", post(focus_search))
        .route("/search/clear", post(clear_search))
        .route("/connectivity", post(report_connectivity))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The board page.
async fn index_page(State(state): State<AppState>) -> IndexTemplate {
    let board = state.board.state().await;

    IndexTemplate {
        board: board_view(&state, &board),
        search: SearchView::from_snapshot(&state.search.snapshot()),
        poll_secs: 15,
    }
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn board_view(state: &AppState, board: &BoardState) -> BoardView {
    BoardView::from_state(board, Utc::now(), state.config.city_prefix.as_deref())
}

/// Board as an HTML fragment or JSON, depending on `Accept`.
fn render_board(state: &AppState, headers: &HeaderMap, board: &BoardState) -> Result<Response, AppError> {
    let view = board_view(state, board);

    if accepts_html(headers) {
        let html = BoardTemplate { board: view }
            .render()
            .map_err(|e| AppError::Internal {
                message: format!("Template error: {e}"),
            })?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(BoardResponse::from_view(&view)).into_response())
    }
}

/// Suggestion panel as an HTML fragment or JSON, depending on `Accept`.
fn render_search(state: &AppState, headers: &HeaderMap) -> Result<Response, AppError> {
    let view = SearchView::from_snapshot(&state.search.snapshot());

    if accepts_html(headers) {
        let html = SuggestionsTemplate { search: view }
            .render()
            .map_err(|e| AppError::Internal {
                message: format!("Template error: {e}"),
            })?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(SearchResponse::from_view(&view)).into_response())
    }
}

/// Current board. Polled by the page to repaint countdowns.
async fn get_board(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let board = state.board.state().await;
    render_board(&state, &headers, &board)
}

/// Foreground reload of the current station.
async fn refresh_board(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let board = state.board.refresh().await;
    render_board(&state, &headers, &board)
}

/// Switch to another station.
async fn select_station(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<StationForm>,
) -> Result<Response, AppError> {
    let station = StationQuery::parse(&form.station).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let board = state.board.select_station(station).await;
    render_board(&state, &headers, &board)
}

/// Feed a keystroke and answer with the panel once its lookup settles.
async fn suggestions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Response, AppError> {
    let revision = state.search.on_input(&query.q);

    let patience =
        state.config.search.debounce + Duration::from_secs(state.config.timeout_secs);
    let snapshot = state.search.wait_resolved(revision, patience).await;
    debug!(
        revision,
        current = snapshot.revision,
        suggestions = snapshot.suggestions.len(),
        "suggestions settled"
    );

    render_search(&state, &headers)
}

async fn select_suggestion(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectForm>,
) -> Result<Response, AppError> {
    state.search.select(&form.name);
    render_search(&state, &headers)
}

async fn submit_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SubmitForm>,
) -> Result<Response, AppError> {
    if let Some(q) = &form.q {
        state.search.on_input(q);
    }
    state.search.submit();
    render_search(&state, &headers)
}

async fn dismiss_search(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.search.dismiss();
    render_search(&state, &headers)
}

async fn focus_search(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.search.focus();
    render_search(&state, &headers)
}

async fn clear_search(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.search.clear();
    render_search(&state, &headers)
}

/// The browser went online or offline.
async fn report_connectivity(
    State(state): State<AppState>,
    Form(form): Form<ConnectivityForm>,
) -> StatusCode {
    debug!(online = form.online, "connectivity reported");
    state.connectivity.set_online(form.online);
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

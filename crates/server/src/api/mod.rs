use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use engine::{DashboardSession, EngineError};
use futures::{Sink, SinkExt, StreamExt};
use serde::Deserialize;
use shared::{
    domain::ControlState,
    error::{ApiError, ErrorCode},
    protocol::{
        ControlChange, ControlOptions, DashboardView, PieFigure, ScatterFigure, SessionEvent,
    },
};
use tracing::{debug, error, warn};

use crate::app_state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

type ApiRejection = (StatusCode, Json<ApiError>);
type ApiResult<T> = Result<Json<T>, ApiRejection>;

#[derive(Debug, Deserialize)]
pub(crate) struct ChartQuery {
    site: Option<String>,
    low: Option<f64>,
    high: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteQuery {
    site: Option<String>,
}

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn control_options(State(state): State<Arc<AppState>>) -> Json<ControlOptions> {
    Json(state.ctx.control_options())
}

pub(crate) async fn pie_chart(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SiteQuery>, QueryRejection>,
) -> ApiResult<PieFigure> {
    let Query(q) = query.map_err(reject_query)?;
    let control = state
        .ctx
        .control_state(q.site.as_deref(), None, None)
        .map_err(reject)?;
    let figure = state
        .ctx
        .pie_figure(&control.selected_site)
        .map_err(reject)?;
    Ok(Json(figure))
}

pub(crate) async fn scatter_chart(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> ApiResult<ScatterFigure> {
    let Query(q) = query.map_err(reject_query)?;
    let control = control_from_query(&state, &q)?;
    let figure = state.ctx.scatter_figure(&control).map_err(reject)?;
    Ok(Json(figure))
}

pub(crate) async fn dashboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> ApiResult<DashboardView> {
    let Query(q) = query.map_err(reject_query)?;
    let control = control_from_query(&state, &q)?;
    let view = state.ctx.evaluate(&control).map_err(reject)?;
    Ok(Json(view))
}

pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

/// One UI session per socket. Control changes are handled strictly in arrival
/// order, each recomputation finishing before the next message is read.
async fn ws_connection(state: Arc<AppState>, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();

    let mut session = match DashboardSession::new(state.ctx.clone()) {
        Ok(session) => session,
        Err(error) => {
            error!(%error, "failed to start dashboard session");
            let event = SessionEvent::Rejected(error.into());
            if let Err(error) = send_event(&mut sender, &event).await {
                warn!(?error, "failed to report session start failure");
            }
            return;
        }
    };
    debug!("dashboard session opened");

    let initial = SessionEvent::ViewUpdated {
        view: session.view().clone(),
    };
    if let Err(error) = send_event(&mut sender, &initial).await {
        warn!(?error, "failed to send initial view");
        return;
    }

    while let Some(Ok(message)) = receiver.next().await {
        let event = match message {
            Message::Text(text) => handle_control_message(&mut session, &text),
            Message::Close(_) => break,
            _ => continue,
        };
        if let Err(error) = send_event(&mut sender, &event).await {
            warn!(?error, "failed to send session event");
            break;
        }
    }
    debug!("dashboard session closed");
}

pub(crate) async fn send_event<S>(sender: &mut S, event: &SessionEvent) -> anyhow::Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let text = serde_json::to_string(event).context("failed to encode session event")?;
    sender
        .send(Message::Text(text))
        .await
        .context("failed to write session event to socket")
}

/// Applies one raw control-change message to `session`. A rejected change
/// leaves the session on its previous view.
pub(crate) fn handle_control_message(session: &mut DashboardSession, text: &str) -> SessionEvent {
    let change = match serde_json::from_str::<ControlChange>(text) {
        Ok(change) => change,
        Err(error) => {
            return SessionEvent::Rejected(ApiError::new(
                ErrorCode::Validation,
                format!("malformed control change: {error}"),
            ));
        }
    };

    match session.apply(change) {
        Ok(view) => SessionEvent::ViewUpdated { view: view.clone() },
        Err(error) => SessionEvent::Rejected(error.into()),
    }
}

fn control_from_query(state: &AppState, q: &ChartQuery) -> Result<ControlState, ApiRejection> {
    state
        .ctx
        .control_state(q.site.as_deref(), q.low, q.high)
        .map_err(reject)
}

pub(crate) fn reject_query(rejection: QueryRejection) -> ApiRejection {
    let error = ApiError::new(
        ErrorCode::Validation,
        format!("invalid query string: {}", rejection.body_text()),
    );
    (StatusCode::BAD_REQUEST, Json(error))
}

pub(crate) fn reject(error: EngineError) -> ApiRejection {
    let status = match &error {
        EngineError::InvalidSelection(_) | EngineError::InvalidRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        EngineError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error.into()))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;

//! Routes for playthroughs.
//!
//! Every command response carries the rendered session and the events the
//! command recorded, so a client can animate stat changes without polling.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use dungeon_content::domain::presentation::SceneStyle;
use dungeon_content::domain::scene::SceneDefinition;
use dungeon_core::event::DomainEvent;
use dungeon_session::application::query_handlers::{GameSessionView, SessionSnapshot, StatsView};
use dungeon_session::application::{command_handlers, query_handlers};
use dungeon_session::domain::aggregates::ChoiceResult;
use dungeon_session::domain::commands;
use dungeon_session::domain::events::GameEvent;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{session_id}/choose.
#[derive(Debug, Deserialize)]
pub struct ChooseRequest {
    /// Action id of the button the player pressed.
    pub action_id: String,
}

/// A button offered by a scene.
#[derive(Debug, Serialize)]
pub struct ChoiceView {
    /// Action id to send back when chosen.
    pub action_id: String,
    /// Button label.
    pub label: String,
}

/// A scene ready to display.
#[derive(Debug, Serialize)]
pub struct SceneResponse {
    /// The scene id.
    pub scene_id: String,
    /// Scene narration.
    pub description: String,
    /// Background image, if any.
    pub image: Option<String>,
    /// Prompt lines with points substituted.
    pub prompt: Vec<String>,
    /// Text typed out on terminal screens.
    pub typewriter: Option<String>,
    /// Whether the scene ends the playthrough.
    pub terminal: bool,
    /// Buttons in authoring order.
    pub choices: Vec<ChoiceView>,
}

impl SceneResponse {
    fn render(scene: &SceneDefinition, style: Option<&SceneStyle>, points: i64) -> Self {
        let fallback = SceneStyle::default();
        let style = style.unwrap_or(&fallback);
        Self {
            scene_id: scene.id.to_string(),
            description: style.description.clone(),
            image: style.image.clone(),
            prompt: style.render_prompt(points),
            typewriter: style.typewriter.clone(),
            terminal: scene.is_terminal(),
            choices: scene
                .choices
                .iter()
                .map(|choice| ChoiceView {
                    action_id: choice.action_id.clone(),
                    label: style.button_label(&choice.action_id).to_owned(),
                })
                .collect(),
        }
    }
}

/// A session with its current scene rendered.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session state and stats.
    #[serde(flatten)]
    pub session: GameSessionView,
    /// The current scene.
    pub scene: SceneResponse,
}

/// An event recorded by a command.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Event type name.
    pub event_type: &'static str,
    /// Position in the session's event stream.
    pub sequence_number: i64,
    /// Event payload.
    pub payload: serde_json::Value,
}

impl From<&GameEvent> for EventResponse {
    fn from(event: &GameEvent) -> Self {
        Self {
            event_id: event.metadata().event_id,
            event_type: event.event_type(),
            sequence_number: event.metadata().sequence_number,
            payload: event.to_payload(),
        }
    }
}

/// Response body for start and restart.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The session after the command.
    pub session: SessionResponse,
    /// Events recorded by the command.
    pub events: Vec<EventResponse>,
}

/// Response body for POST /{session_id}/choose.
#[derive(Debug, Serialize)]
pub struct ChooseResponse {
    /// What the choice did.
    pub outcome: ChoiceResult,
    /// The session after the choice.
    pub session: SessionResponse,
    /// Events recorded by the choice.
    pub events: Vec<EventResponse>,
}

fn render_session(state: &AppState, snapshot: SessionSnapshot) -> SessionResponse {
    let scene = SceneResponse::render(
        &snapshot.scene,
        state.presentation.get(&snapshot.scene.id),
        snapshot.view.stats.points,
    );
    SessionResponse {
        session: snapshot.view,
        scene,
    }
}

fn event_responses(events: &[GameEvent]) -> Vec<EventResponse> {
    events.iter().map(EventResponse::from).collect()
}

/// POST /
#[instrument(skip_all)]
async fn start_session(
    State(state): State<AppState>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let result = command_handlers::handle_start_session(
        &command,
        &state.registry,
        state.clock.as_ref(),
        &state.sessions,
    )?;

    Ok(Json(CommandResponse {
        session: render_session(&state, result.snapshot),
        events: event_responses(&result.events),
    }))
}

/// GET /{session_id}
#[instrument(skip_all, fields(session_id = %session_id))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let snapshot = query_handlers::get_session_snapshot(session_id, &state.sessions)?;
    Ok(Json(render_session(&state, snapshot)))
}

/// GET /{session_id}/scene
#[instrument(skip_all, fields(session_id = %session_id))]
async fn get_scene(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SceneResponse>, ApiError> {
    let snapshot = query_handlers::get_session_snapshot(session_id, &state.sessions)?;
    Ok(Json(render_session(&state, snapshot).scene))
}

/// GET /{session_id}/stats
#[instrument(skip_all, fields(session_id = %session_id))]
async fn get_stats(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<StatsView>, ApiError> {
    Ok(Json(query_handlers::get_stats(session_id, &state.sessions)?))
}

/// POST /{session_id}/choose
#[instrument(skip_all, fields(session_id = %session_id, action_id = %request.action_id))]
async fn choose(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChooseRequest>,
) -> Result<Json<ChooseResponse>, ApiError> {
    let command = commands::Choose {
        correlation_id: Uuid::new_v4(),
        session_id,
        action_id: request.action_id,
    };

    info!(correlation_id = %command.correlation_id, "handling choose command");

    let result = command_handlers::handle_choose(&command, state.clock.as_ref(), &state.sessions)?;

    Ok(Json(ChooseResponse {
        outcome: result.outcome,
        session: render_session(&state, result.session.snapshot),
        events: event_responses(&result.session.events),
    }))
}

/// POST /{session_id}/restart
#[instrument(skip_all, fields(session_id = %session_id))]
async fn restart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RestartSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling restart command");

    let result =
        command_handlers::handle_restart(&command, state.clock.as_ref(), &state.sessions)?;

    Ok(Json(CommandResponse {
        session: render_session(&state, result.snapshot),
        events: event_responses(&result.events),
    }))
}

/// DELETE /{session_id}
#[instrument(skip_all, fields(session_id = %session_id))]
async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::EndSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling end_session command");

    command_handlers::handle_end_session(&command, &state.sessions)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session))
        .route("/{session_id}", get(get_session).delete(end_session))
        .route("/{session_id}/scene", get(get_scene))
        .route("/{session_id}/stats", get(get_stats))
        .route("/{session_id}/choose", post(choose))
        .route("/{session_id}/restart", post(restart))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use dungeon_content::domain::presentation::PresentationTable;
    use dungeon_test_support::{FixedClock, builtin_presentation, builtin_registry, hazard_registry};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        let registry = builtin_registry();
        let presentation = builtin_presentation(&registry);
        AppState::new(registry, presentation, Arc::new(FixedClock(Utc::now())))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| {
                Body::from(serde_json::to_vec(&b).unwrap())
            }))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_start_session_renders_start_scene() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = send(app, "POST", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let session = &json["session"];
        assert_eq!(session["current_scene_id"], "scene1");
        assert_eq!(session["stats"]["hp"], 100);
        assert_eq!(session["stats"]["points"], 0);
        assert_eq!(session["scene"]["choices"][0]["label"], "Go Forward");
        assert_eq!(session["scene"]["terminal"], false);
        assert_eq!(json["events"][0]["event_type"], "session.started");
    }

    #[tokio::test]
    async fn test_choose_moves_and_rewards() {
        // Arrange
        let state = test_app_state();
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        // Act
        let (status, json) = send(
            router().with_state(state),
            "POST",
            &format!("/{session_id}/choose"),
            Some(serde_json::json!({ "action_id": "go_forward" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcome"]["type"], "moved");
        assert_eq!(json["outcome"]["to"], "scene2");
        assert_eq!(json["session"]["stats"]["points"], 100);
        assert_eq!(json["events"][0]["event_type"], "session.points_adjusted");
        assert_eq!(json["events"][0]["payload"]["PointsAdjusted"]["delta"], 100);
    }

    #[tokio::test]
    async fn test_choose_unknown_action_returns_400_and_leaves_session() {
        // Arrange
        let state = test_app_state();
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        // Act
        let (status, json) = send(
            router().with_state(state.clone()),
            "POST",
            &format!("/{session_id}/choose"),
            Some(serde_json::json!({ "action_id": "fly" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "unknown_action");

        let (_, json) = send(router().with_state(state), "GET", &format!("/{session_id}"), None).await;
        assert_eq!(json["current_scene_id"], "scene1");
        assert_eq!(json["version"], 2);
    }

    #[tokio::test]
    async fn test_choose_returns_422_for_missing_action() {
        let state = test_app_state();
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        let (status, _) = send(
            router().with_state(state),
            "POST",
            &format!("/{session_id}/choose"),
            Some(serde_json::json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_session_nonexistent_returns_404() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(app, "GET", &format!("/{}", Uuid::new_v4()), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "session_not_found");
    }

    #[tokio::test]
    async fn test_get_stats_returns_stats() {
        let state = test_app_state();
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        let (status, json) =
            send(router().with_state(state), "GET", &format!("/{session_id}/stats"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "hp": 100, "points": 0, "alive": true }));
    }

    #[tokio::test]
    async fn test_unstyled_scene_falls_back_to_action_ids() {
        // Arrange
        let state = AppState::new(
            hazard_registry(),
            Arc::new(PresentationTable::default()),
            Arc::new(FixedClock(Utc::now())),
        );
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        // Act
        let (status, json) =
            send(router().with_state(state), "GET", &format!("/{session_id}/scene"), None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["scene_id"], "hall");
        assert_eq!(json["choices"][0]["label"], "left");
        assert_eq!(json["description"], "");
    }

    #[tokio::test]
    async fn test_choose_response_scene_matches_session() {
        // Arrange
        let state = test_app_state();
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        // Act
        let (status, json) = send(
            router().with_state(state),
            "POST",
            &format!("/{session_id}/choose"),
            Some(serde_json::json!({ "action_id": "go_forward" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let session = &json["session"];
        assert_eq!(session["current_scene_id"], json["outcome"]["to"]);
        assert_eq!(session["scene"]["scene_id"], session["current_scene_id"]);
        assert_eq!(session["version"], 5);
    }

    #[tokio::test]
    async fn test_delete_session_returns_204_then_404() {
        // Arrange
        let state = test_app_state();
        let (_, json) = send(router().with_state(state.clone()), "POST", "/", None).await;
        let session_id = json["session"]["session_id"].as_str().unwrap().to_owned();

        // Act
        let (status, _) =
            send(router().with_state(state.clone()), "DELETE", &format!("/{session_id}"), None)
                .await;

        // Assert
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.is_empty());

        let (status, json) =
            send(router().with_state(state), "DELETE", &format!("/{session_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "session_not_found");
    }
}

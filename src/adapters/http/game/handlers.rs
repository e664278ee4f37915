//! HTTP handlers for game endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, GetSessionQuery,
    JoinSessionCommand, JoinSessionHandler, MakeMoveCommand, MakeMoveHandler,
    VoteRestartCommand, VoteRestartHandler,
};
use crate::domain::foundation::{ErrorKind, ParticipantId, SessionId};
use crate::domain::game::Position;
use crate::domain::session::SessionError;

use super::dto::{ErrorResponse, MoveRequest, PlayerQuery};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct GameHandlers {
    create_handler: Arc<CreateSessionHandler>,
    join_handler: Arc<JoinSessionHandler>,
    move_handler: Arc<MakeMoveHandler>,
    restart_handler: Arc<VoteRestartHandler>,
    get_handler: Arc<GetSessionHandler>,
}

impl GameHandlers {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        join_handler: Arc<JoinSessionHandler>,
        move_handler: Arc<MakeMoveHandler>,
        restart_handler: Arc<VoteRestartHandler>,
        get_handler: Arc<GetSessionHandler>,
    ) -> Self {
        Self {
            create_handler,
            join_handler,
            move_handler,
            restart_handler,
            get_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /game/create?playerID= - Open a new game
pub async fn create_game(
    State(handlers): State<GameHandlers>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Response {
    let creator = match player_from(query) {
        Ok(player) => player,
        Err(response) => return response,
    };

    match handlers
        .create_handler
        .handle(CreateSessionCommand { creator })
        .await
    {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /game/:game_id/join?playerID= - Take the second seat
pub async fn join_game(
    State(handlers): State<GameHandlers>,
    Path(game_id): Path<String>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Response {
    let (session_id, participant) = match (parse_game_id(&game_id), player_from(query)) {
        (Ok(id), Ok(player)) => (id, player),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    let cmd = JoinSessionCommand {
        session_id,
        participant,
    };
    match handlers.join_handler.handle(cmd).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /game/:game_id/move - Place a mark
pub async fn make_move(
    State(handlers): State<GameHandlers>,
    Path(game_id): Path<String>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Response {
    let session_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let cmd = match move_command(session_id, req) {
        Ok(cmd) => cmd,
        Err(e) => return handle_session_error(e),
    };

    match handlers.move_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(result.snapshot)).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /game/:game_id/restart?playerID= - Vote for a fresh round
pub async fn restart_game(
    State(handlers): State<GameHandlers>,
    Path(game_id): Path<String>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Response {
    let (session_id, voter) = match (parse_game_id(&game_id), player_from(query)) {
        (Ok(id), Ok(player)) => (id, player),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    let cmd = VoteRestartCommand { session_id, voter };
    match handlers.restart_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(result.snapshot)).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /game/:game_id/state - Current game state
pub async fn get_game_state(
    State(handlers): State<GameHandlers>,
    Path(game_id): Path<String>,
) -> Response {
    let session_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => handle_session_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request parsing
// ════════════════════════════════════════════════════════════════════════════

fn parse_game_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>()
        .map_err(|e| handle_session_error(e.into()))
}

fn player_from(
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<ParticipantId, Response> {
    let Query(query) = query.map_err(|_| bad_request("Missing playerID query parameter"))?;
    ParticipantId::new(query.player_id).map_err(|e| handle_session_error(e.into()))
}

fn move_command(
    session_id: SessionId,
    req: MoveRequest,
) -> Result<MakeMoveCommand, SessionError> {
    let x = usize::try_from(req.x)
        .map_err(|_| SessionError::validation("x", "must not be negative"))?;
    let y = usize::try_from(req.y)
        .map_err(|_| SessionError::validation("y", "must not be negative"))?;
    Ok(MakeMoveCommand {
        session_id,
        actor: ParticipantId::new(req.username)?,
        position: Position::new(x, y),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
}

/// Maps the error kind to a status; the body always carries the stable code.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::PreconditionFailed => StatusCode::CONFLICT,
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_session_error(error: SessionError) -> Response {
    let status = status_for(error.kind());
    if status.is_server_error() {
        tracing::error!(error = %error, "Game request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}

//! Staff account endpoints

use api_types::user::{Me, UserNew, UserPatch, UserView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewUser, Session, UserUpdate};

use crate::{
    ServerError,
    server::ServerState,
    views::{role_from_api, role_to_api, user_view},
};

/// The authenticated caller
pub async fn me(Extension(session): Extension<Session>) -> Json<Me> {
    Json(Me {
        display_name: session.display_name(),
        role: role_to_api(session.role),
        username: session.username,
    })
}

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state.engine.list_users(&session).await?;
    Ok(Json(users.into_iter().map(user_view).collect()))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .create_user(
            &session,
            NewUser {
                username: payload.username,
                pin: payload.pin,
                role: role_from_api(payload.role),
                first_name: payload.first_name,
                last_name: payload.last_name,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user_view(user))))
}

pub async fn get(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(&session, &username).await?;
    Ok(Json(user_view(user)))
}

pub async fn update(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
    Json(payload): Json<UserPatch>,
) -> Result<Json<UserView>, ServerError> {
    let update = UserUpdate {
        pin: payload.pin,
        role: payload.role.map(role_from_api),
        first_name: payload.first_name,
        last_name: payload.last_name,
        active: payload.active,
    };
    let user = state.engine.update_user(&session, &username, update).await?;
    Ok(Json(user_view(user)))
}

pub async fn deactivate(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.deactivate_user(&session, &username).await?;
    Ok(Json(user_view(user)))
}

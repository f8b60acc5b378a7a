use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, NewUser, ResultEngine, Role, Session, User, UserUpdate,
    users::{self, new_active_model},
};

use super::{Engine, normalize_required_text, normalize_username, with_tx};

/// PINs are 4 or 5 ASCII digits.
fn validate_pin(pin: &str) -> ResultEngine<String> {
    let pin = pin.trim();
    if !(4..=5).contains(&pin.len()) || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::InvalidInput(
            "PIN must be 4 or 5 digits".to_string(),
        ));
    }
    Ok(pin.to_string())
}

impl Engine {
    /// Resolve a username and PIN into a session.
    ///
    /// Unknown users, inactive users and wrong PINs all fail with
    /// `Unauthorized`.
    pub async fn login(&self, username: &str, pin: &str) -> ResultEngine<Session> {
        let Ok(username) = normalize_username(username) else {
            return Err(EngineError::Unauthorized);
        };

        let model = users::Entity::find_by_id(username.clone())
            .one(&self.database)
            .await?;
        match model {
            Some(model) if model.active && model.pin == pin => Session::try_from(&model),
            _ => {
                tracing::warn!("rejected login for {username}");
                Err(EngineError::Unauthorized)
            }
        }
    }

    /// Session of an active user, without a PIN check.
    ///
    /// Used by local tooling that already runs with database access.
    pub async fn session_for_user(&self, username: &str) -> ResultEngine<Session> {
        let username = normalize_username(username)?;
        let model = users::Entity::find_by_id(username.clone())
            .one(&self.database)
            .await?
            .ok_or(EngineError::KeyNotFound(username))?;
        if !model.active {
            return Err(EngineError::Unauthorized);
        }
        Session::try_from(&model)
    }

    /// Create a user without a calling session.
    ///
    /// This is how the first admin account gets created.
    pub async fn bootstrap_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let username = normalize_username(&new_user.username)?;
        let pin = validate_pin(&new_user.pin)?;
        let first_name = normalize_required_text(&new_user.first_name, "first name")?;
        let last_name = normalize_required_text(&new_user.last_name, "last name")?;

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            let model = new_active_model(
                username.clone(),
                pin,
                new_user.role,
                first_name,
                last_name,
                Utc::now(),
            )
            .insert(&db_tx)
            .await?;
            tracing::info!("created user {username} ({})", new_user.role.as_str());
            User::try_from(model)
        })
    }

    /// Create a user. Admin only; nobody can grant a role above their own.
    pub async fn create_user(&self, session: &Session, new_user: NewUser) -> ResultEngine<User> {
        session.require(Role::Admin)?;
        if new_user.role > session.role {
            return Err(EngineError::Forbidden(format!(
                "cannot grant the {} role",
                new_user.role.as_str()
            )));
        }
        self.bootstrap_user(new_user).await
    }

    /// Apply a partial update to a user.
    pub async fn update_user(
        &self,
        session: &Session,
        username: &str,
        update: UserUpdate,
    ) -> ResultEngine<User> {
        session.require(Role::Admin)?;
        let username = normalize_username(username)?;
        let is_self = username == session.username;

        if is_self && update.active == Some(false) {
            return Err(EngineError::Forbidden(
                "cannot deactivate your own account".to_string(),
            ));
        }
        if let Some(role) = update.role {
            if is_self && !role.allows(Role::Admin) {
                return Err(EngineError::Forbidden(
                    "cannot remove your own admin rights".to_string(),
                ));
            }
            if role > session.role {
                return Err(EngineError::Forbidden(format!(
                    "cannot grant the {} role",
                    role.as_str()
                )));
            }
        }

        let pin = update.pin.as_deref().map(validate_pin).transpose()?;
        let first_name = update
            .first_name
            .as_deref()
            .map(|name| normalize_required_text(name, "first name"))
            .transpose()?;
        let last_name = update
            .last_name
            .as_deref()
            .map(|name| normalize_required_text(name, "last name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .ok_or(EngineError::KeyNotFound(username.clone()))?;
            if Role::try_from(model.role.as_str())? > session.role {
                return Err(EngineError::Forbidden(
                    "cannot modify a more privileged user".to_string(),
                ));
            }

            let mut active: users::ActiveModel = model.into();
            if let Some(pin) = pin {
                active.pin = ActiveValue::Set(pin);
            }
            if let Some(role) = update.role {
                active.role = ActiveValue::Set(role.as_str().to_string());
            }
            if let Some(first_name) = first_name {
                active.first_name = ActiveValue::Set(first_name);
            }
            if let Some(last_name) = last_name {
                active.last_name = ActiveValue::Set(last_name);
            }
            if let Some(flag) = update.active {
                active.active = ActiveValue::Set(flag);
            }

            let model = active.update(&db_tx).await?;
            tracing::info!("user {username} updated by {}", session.username);
            User::try_from(model)
        })
    }

    /// Deactivated users can no longer log in; their closings are kept.
    pub async fn deactivate_user(&self, session: &Session, username: &str) -> ResultEngine<User> {
        let update = UserUpdate {
            active: Some(false),
            ..UserUpdate::default()
        };
        self.update_user(session, username, update).await
    }

    pub async fn list_users(&self, session: &Session) -> ResultEngine<Vec<User>> {
        session.require(Role::Admin)?;
        users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// A single user; admins see everyone, other roles only themselves.
    pub async fn user(&self, session: &Session, username: &str) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        if username != session.username {
            session.require(Role::Admin)?;
        }
        let model = users::Entity::find_by_id(username.clone())
            .one(&self.database)
            .await?
            .ok_or(EngineError::KeyNotFound(username))?;
        User::try_from(model)
    }
}

//! Staff accounts.
//!
//! Users log in with their username and a short numeric PIN. The role decides
//! which operations a [`Session`] may run.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Staff role, ordered from least to most privileged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Cashier,
    Supervisor,
    Admin,
    Developer,
}

impl Role {
    /// Canonical role string used by the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cashier => "cajera",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
            Self::Developer => "developer",
        }
    }

    /// `true` when this role is at least as privileged as `required`.
    #[must_use]
    pub fn allows(self, required: Role) -> bool {
        self >= required
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cajera" | "cashier" => Ok(Self::Cashier),
            "supervisor" => Ok(Self::Supervisor),
            "admin" => Ok(Self::Admin),
            "developer" => Ok(Self::Developer),
            other => Err(EngineError::InvalidInput(format!("invalid role: {other}"))),
        }
    }
}

/// Who is calling, resolved once per request and passed to every operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl Session {
    /// Name printed on closings and grouped by the cashier reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Fails with `Forbidden` unless the session role is at least `required`.
    pub fn require(&self, required: Role) -> ResultEngine<()> {
        if self.role.allows(required) {
            Ok(())
        } else {
            Err(EngineError::Forbidden(format!(
                "{} role required",
                required.as_str()
            )))
        }
    }
}

/// A staff account as exposed to clients (the PIN never leaves the engine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub pin: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: Role::try_from(model.role.as_str())?,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            active: model.active,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<&Model> for Session {
    type Error = EngineError;

    fn try_from(model: &Model) -> Result<Self, Self::Error> {
        Ok(Self {
            username: model.username.clone(),
            role: Role::try_from(model.role.as_str())?,
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
        })
    }
}

pub(crate) fn new_active_model(
    username: String,
    pin: String,
    role: Role,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
) -> ActiveModel {
    ActiveModel {
        username: ActiveValue::Set(username),
        pin: ActiveValue::Set(pin),
        role: ActiveValue::Set(role.as_str().to_string()),
        first_name: ActiveValue::Set(first_name),
        last_name: ActiveValue::Set(last_name),
        active: ActiveValue::Set(true),
        created_at: ActiveValue::Set(created_at),
    }
}

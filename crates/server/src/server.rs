use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use chrono::{NaiveDate, Utc};

use std::sync::Arc;

use crate::{ServerError, closings, courts, rates, reports, users};
use engine::{DateRange, Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    /// Business day of the current instant.
    pub(crate) fn today(&self) -> NaiveDate {
        self.engine.business_date(Utc::now())
    }

    /// Resolve optional `from`/`to` query bounds. A missing `from` means
    /// today; a missing `to` means today or `from`, whichever is later.
    pub(crate) fn range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<DateRange, ServerError> {
        let today = self.today();
        let from = from.unwrap_or(today);
        let to = to.unwrap_or_else(|| today.max(from));
        Ok(DateRange::new(from, to)?)
    }
}

/// Resolve HTTP Basic credentials (username + PIN) into an engine `Session`
/// stored in the request extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(EngineError::Unauthorized.into());
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(EngineError::Unauthorized.into());
    }

    let session = state
        .engine
        .login(auth_header.username(), auth_header.password())
        .await?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

async fn health() -> &'static str {
    "ok"
}

/// Build the application router.
pub fn app(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    let protected = Router::new()
        .route("/me", get(users::me))
        .route("/rates", get(rates::list).post(rates::record))
        .route("/rates/latest", get(rates::latest))
        .route(
            "/courts/transactions",
            get(courts::list).post(courts::record),
        )
        .route("/courts/transactions/export", get(courts::export))
        .route("/courts/summary", get(courts::summary))
        .route("/closings", get(closings::list).post(closings::submit))
        .route("/closings/preview", post(closings::preview))
        .route("/closings/export", get(closings::export))
        .route("/closings/{id}", get(closings::get))
        .route("/reports/cashiers", get(reports::cashiers))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{username}",
            get(users::get).patch(users::update),
        )
        .route("/users/{username}/deactivate", post(users::deactivate))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, bind: &str, port: u16) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    run_with_listener(engine, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

//! HTTP surface: routes, shared state and error responses.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Map, Value};
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    Authenticator, BalanceUpdater, Caller, CoinUpdateRequest, CoinUpdateResponse, ErrorKind,
    LedgerRepository, Profile, ProfileError, ProfileReader,
};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    reader: ProfileReader,
    updater: BalanceUpdater,
    authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Wires both operations to one repository.
    #[instrument(skip(repository, authenticator))]
    pub fn new(repository: LedgerRepository, authenticator: Arc<dyn Authenticator>) -> Self {
        info!(?authenticator, "Creating application state");
        Self {
            reader: ProfileReader::new(repository.clone()),
            updater: BalanceUpdater::new(repository),
            authenticator,
        }
    }

    /// Resolver used by the [`Caller`] extractor.
    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/profile", get(get_profile))
        .route("/profile/coins", post(update_coins))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Which endpoint produced an error; selects the body key and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /profile`
    Profile,
    /// `POST /profile/coins`
    Coins,
}

impl Endpoint {
    fn body_key(self) -> &'static str {
        match self {
            Self::Profile => "error",
            Self::Coins => "message",
        }
    }

    fn message(self, kind: ErrorKind) -> &'static str {
        match (self, kind) {
            (_, ErrorKind::BadRequest) => "Datos incompletos o inválidos",
            (_, ErrorKind::Unauthorized) => "No autorizado",
            (_, ErrorKind::NotFound) => "Usuario no encontrado",
            (Self::Profile, ErrorKind::Internal) => "No se pudo obtener el perfil",
            (Self::Coins, ErrorKind::Internal) => "Error al actualizar las monedas",
        }
    }
}

/// A [`ProfileError`] bound to the endpoint that reports it.
///
/// Internal errors are logged in full here; the client only ever sees the
/// generic message for its kind.
#[derive(Debug)]
pub struct ApiError {
    endpoint: Endpoint,
    error: ProfileError,
}

impl ApiError {
    /// Binds `error` to `endpoint`.
    pub fn new(endpoint: Endpoint, error: ProfileError) -> Self {
        Self { endpoint, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.error.kind();
        let status = match kind {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if kind == ErrorKind::Internal {
            error!(endpoint = ?self.endpoint, error = %self.error, "Request failed");
        } else {
            warn!(endpoint = ?self.endpoint, error = %self.error, "Request rejected");
        }

        let mut body = Map::new();
        body.insert(
            self.endpoint.body_key().to_string(),
            Value::String(self.endpoint.message(kind).to_string()),
        );
        (status, Json(Value::Object(body))).into_response()
    }
}

/// Runs a synchronous ledger operation off the async runtime.
async fn run_blocking<T, F>(op: F) -> Result<T, ProfileError>
where
    F: FnOnce() -> Result<T, ProfileError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op).await?
}

async fn health_check() -> &'static str {
    "OK"
}

#[instrument(skip(state, caller))]
async fn get_profile(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Profile>, ApiError> {
    let reader = state.reader.clone();
    let profile = run_blocking(move || reader.read(caller))
        .await
        .map_err(|e| ApiError::new(Endpoint::Profile, e))?;
    Ok(Json(profile))
}

#[instrument(skip(state, caller, body))]
async fn update_coins(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<CoinUpdateRequest>, JsonRejection>,
) -> Result<Json<CoinUpdateResponse>, ApiError> {
    let request = body
        .map(|Json(request)| request)
        .map_err(|rejection| {
            ApiError::new(
                Endpoint::Coins,
                ProfileError::BadRequest(rejection.body_text()),
            )
        })?;

    let updater = state.updater.clone();
    let response = run_blocking(move || updater.update(caller, request))
        .await
        .map_err(|e| ApiError::new(Endpoint::Coins, e))?;
    Ok(Json(response))
}

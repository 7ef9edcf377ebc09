//! Axum HTTP server adapter for the reception service

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::error;

use crate::{
    application::{
        ApplicationError,
        commands::*,
        handlers::{
            CommandHandler, QueryHandler, command_handlers::ReceptionCommandHandler,
            query_handlers::ReceptionQueryHandler,
        },
        queries::*,
    },
    config::HttpConfig,
    domain::{
        DomainError, ErrorKind, PickupPointId, Role,
        ports::{PickupPointRepository, ReceptionRepository},
    },
    infrastructure::http::{
        auth::{AuthError, AuthenticatedUser, JwtAuthority},
        dto::*,
        middleware::recover_panic,
    },
};

/// Axum application state with the use case handlers
pub struct AppState<P, R>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    commands: Arc<ReceptionCommandHandler<P, R>>,
    queries: Arc<ReceptionQueryHandler<P, R>>,
    auth: Arc<JwtAuthority>,
}

impl<P, R> Clone for AppState<P, R>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            queries: self.queries.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<P, R> AppState<P, R>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    pub fn new(pickup_points: Arc<P>, receptions: Arc<R>, auth: JwtAuthority) -> Self {
        Self {
            commands: Arc::new(ReceptionCommandHandler::new(
                pickup_points.clone(),
                receptions.clone(),
            )),
            queries: Arc::new(ReceptionQueryHandler::new(pickup_points, receptions)),
            auth: Arc::new(auth),
        }
    }
}

impl<P, R> FromRef<AppState<P, R>> for Arc<JwtAuthority>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    fn from_ref(state: &AppState<P, R>) -> Self {
        state.auth.clone()
    }
}

/// Create the service router
///
/// Every route except `/health` and `/dummyLogin` requires a bearer token.
/// Requests exceeding `config.request_timeout` are answered with 408 and
/// handler panics with 500. With the `metrics` feature every request is
/// counted and timed.
pub fn create_router<P, R>(config: &HttpConfig) -> Router<AppState<P, R>>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    let router = Router::new()
        .route("/health", get(health))
        .route("/dummyLogin", post(dummy_login::<P, R>))
        .route(
            "/pvz",
            post(create_pickup_point::<P, R>).get(list_pickup_points::<P, R>),
        )
        .route("/pvz/{pvz_id}/receptions", get(list_receptions::<P, R>))
        .route(
            "/pvz/{pvz_id}/close_last_reception",
            post(close_last_reception::<P, R>),
        )
        .route(
            "/pvz/{pvz_id}/delete_last_product",
            post(delete_last_product::<P, R>),
        )
        .route("/receptions", post(create_reception::<P, R>))
        .route("/products", post(add_product::<P, R>))
        .layer(CatchPanicLayer::custom(recover_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ));

    // Outside the timeout so requests answered with 408 are counted too.
    #[cfg(feature = "metrics")]
    let router = router.layer(crate::infrastructure::http::middleware::HttpMetricsLayer::new());

    router.layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Issue a token for a synthetic user with the requested role
async fn dummy_login<P, R>(
    State(state): State<AppState<P, R>>,
    payload: Result<Json<DummyLoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    let Json(request) = payload?;
    let role: Role = request.role.parse().map_err(ApplicationError::from)?;
    let token = state.auth.issue_dummy(role)?;

    Ok(Json(TokenResponse { token }))
}

async fn create_pickup_point<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    payload: Result<Json<CreatePickupPointRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PickupPointDto>), HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<CreatePickupPointCommand>()?;
    let Json(request) = payload?;

    let command = CreatePickupPointCommand { city: request.city };
    let point = CommandHandler::handle(&*state.commands, command).await?;

    Ok((StatusCode::CREATED, Json(PickupPointDto::from(&point))))
}

async fn list_pickup_points<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    Query(params): Query<ListPickupPointsParams>,
) -> Result<Json<Vec<PickupPointWithReceptionsDto>>, HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<ListPickupPointsQuery>()?;

    let response = QueryHandler::handle(&*state.queries, params.into_query()).await?;
    let body = response
        .pickup_points
        .iter()
        .map(PickupPointWithReceptionsDto::from)
        .collect();

    Ok(Json(body))
}

async fn list_receptions<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    Path(pvz_id): Path<String>,
) -> Result<Json<Vec<ReceptionWithItemsDto>>, HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<ListReceptionsQuery>()?;

    let query = ListReceptionsQuery {
        pickup_point_id: parse_pickup_point_id(&pvz_id)?,
    };
    let receptions = QueryHandler::handle(&*state.queries, query).await?;

    Ok(Json(
        receptions.iter().map(ReceptionWithItemsDto::from).collect(),
    ))
}

async fn create_reception<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateReceptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReceptionDto>), HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<OpenReceptionCommand>()?;
    let Json(request) = payload?;

    let command = OpenReceptionCommand {
        pickup_point_id: parse_pickup_point_id(&request.pvz_id)?,
    };
    let reception = CommandHandler::handle(&*state.commands, command).await?;

    Ok((StatusCode::CREATED, Json(ReceptionDto::from(&reception))))
}

async fn add_product<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemDto>), HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<AddItemCommand>()?;
    let Json(request) = payload?;

    let command = AddItemCommand {
        pickup_point_id: parse_pickup_point_id(&request.pvz_id)?,
        item_type: request.item_type,
    };
    let item = CommandHandler::handle(&*state.commands, command).await?;

    Ok((StatusCode::CREATED, Json(ItemDto::from(&item))))
}

async fn delete_last_product<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    Path(pvz_id): Path<String>,
) -> Result<Json<ItemDto>, HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<RemoveLastItemCommand>()?;

    let command = RemoveLastItemCommand {
        pickup_point_id: parse_pickup_point_id(&pvz_id)?,
    };
    let removed = CommandHandler::handle(&*state.commands, command).await?;

    Ok(Json(ItemDto::from(&removed)))
}

async fn close_last_reception<P, R>(
    State(state): State<AppState<P, R>>,
    user: AuthenticatedUser,
    Path(pvz_id): Path<String>,
) -> Result<Json<ReceptionDto>, HttpError>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
{
    user.authorize::<CloseReceptionCommand>()?;

    let command = CloseReceptionCommand {
        pickup_point_id: parse_pickup_point_id(&pvz_id)?,
    };
    let reception = CommandHandler::handle(&*state.commands, command).await?;

    Ok(Json(ReceptionDto::from(&reception)))
}

fn parse_pickup_point_id(raw: &str) -> Result<PickupPointId, HttpError> {
    Ok(PickupPointId::parse(raw.trim())?)
}

/// Errors surfaced by HTTP endpoints
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self::Application(err.into())
    }
}

impl HttpError {
    /// Status code for this error.
    ///
    /// Missing entities answer 400 like every other rejected request.
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Application(err) => match err.kind() {
                ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Validation
                | ErrorKind::NotFound
                | ErrorKind::Conflict
                | ErrorKind::EmptyState => StatusCode::BAD_REQUEST,
            },
            HttpError::Auth(AuthError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            HttpError::Auth(AuthError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::Auth(_) => StatusCode::UNAUTHORIZED,
            HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(ErrorBody {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PickupPointId, ReceptionId};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                HttpError::from(DomainError::InvalidCity("Paris".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                HttpError::from(DomainError::PickupPointNotFound(PickupPointId::new())),
                StatusCode::BAD_REQUEST,
            ),
            (
                HttpError::from(DomainError::EmptySequence(ReceptionId::new())),
                StatusCode::BAD_REQUEST,
            ),
            (
                HttpError::from(ApplicationError::NoOpenReception(PickupPointId::new())),
                StatusCode::BAD_REQUEST,
            ),
            (
                HttpError::from(DomainError::storage("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                HttpError::from(AuthError::MissingToken),
                StatusCode::UNAUTHORIZED,
            ),
            (
                HttpError::from(AuthError::Forbidden {
                    use_case: "add_item",
                    role: Role::Moderator,
                }),
                StatusCode::FORBIDDEN,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{err}");
        }
    }

    #[test]
    fn test_bad_identifier_is_validation() {
        let err = parse_pickup_point_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

//! HTTP endpoints of the payment gateway.
//!
//! Every endpoint except `GET /` and `GET /api/products` authenticates with the
//! `username` and `password` carried in the same JSON body. There are no
//! sessions.
//!
//! Failures reach the client as an [`ApiResponse`] with `success: false` and a
//! message; [`ApiError`] is the only place where a [`GatewayError`] becomes an
//! HTTP status.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request, State};
use axum::http::{Method, StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tower_http::cors::{self, CorsLayer};
use tracing::instrument;

use paygate_types::account::Credentials;
use paygate_types::gateway::{Gateway, GatewayError};
use paygate_types::proto::{
    ApiResponse, CredentialsRequest, PaymentMethodRequest, PaymentRequest,
};

pub const WELCOME_BANNER: &str = "Welcome to SimplePayment Gateway!";
pub const PAYMENT_METHOD_UPDATED: &str = "Payment method updated successfully";
pub const PAYMENT_SUCCESSFUL: &str = "Payment successful";
pub const PAYMENT_DECLINED: &str = "Payment failed - Please try again";
pub const NOT_FOUND: &str = "Not found";

/// Routes of the gateway, without CORS.
///
/// Use [`app`] for the complete service.
pub fn routes<G>() -> Router<Arc<G>>
where
    G: Gateway + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(get_root))
        .route("/api/register", post(post_register::<G>))
        .route("/api/login", post(post_login::<G>))
        .route("/api/products", get(get_products::<G>))
        .route("/api/payment-method", post(post_payment_method::<G>))
        .route("/api/payment", post(post_payment::<G>))
        .route("/api/transactions", post(post_transactions::<G>))
        .fallback(not_found)
}

/// The gateway service: routes bound to `gateway`, permissive CORS, and
/// empty `204` answers to `OPTIONS`.
pub fn app<G>(gateway: Arc<G>) -> Router
where
    G: Gateway + Send + Sync + 'static,
{
    routes::<G>()
        .with_state(gateway)
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(middleware::from_fn(options_no_content))
}

/// `GET /`: plain-text banner.
#[instrument(skip_all)]
pub async fn get_root() -> &'static str {
    WELCOME_BANNER
}

/// Any path without a route.
#[instrument(skip_all)]
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse>) {
    tracing::debug!(%uri, "No route");
    (StatusCode::NOT_FOUND, Json(ApiResponse::failure(NOT_FOUND)))
}

/// `POST /api/register`: creates an account with no payment method.
#[instrument(skip_all)]
pub async fn post_register<G: Gateway>(
    State(gateway): State<Arc<G>>,
    FlatBody(body): FlatBody<CredentialsRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    if body.username.trim().is_empty() {
        let error = GatewayError::MalformedRequest("username must not be empty".to_string());
        return Err(error.into());
    }
    let account = gateway.register(&Credentials::from(body)).await?;
    tracing::info!(username = account.username(), "Account registered");
    Ok(Json(ApiResponse::success().with_user(&account)))
}

/// `POST /api/login`: returns the account when the password matches.
#[instrument(skip_all)]
pub async fn post_login<G: Gateway>(
    State(gateway): State<Arc<G>>,
    FlatBody(body): FlatBody<CredentialsRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let account = gateway.login(&Credentials::from(body)).await?;
    Ok(Json(ApiResponse::success().with_user(&account)))
}

/// `GET /api/products`: the catalog.
#[instrument(skip_all)]
pub async fn get_products<G: Gateway>(State(gateway): State<Arc<G>>) -> Json<ApiResponse> {
    Json(ApiResponse::success().with_products(gateway.catalog()))
}

/// `POST /api/payment-method`: selects a method and stores its credentials.
///
/// Credentials are not validated here; that happens at payment time.
#[instrument(skip_all)]
pub async fn post_payment_method<G: Gateway>(
    State(gateway): State<Arc<G>>,
    FlatBody(body): FlatBody<PaymentMethodRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let (credentials, method, details) = body.into_parts();
    let account = gateway
        .update_payment_method(&credentials, method, details)
        .await?;
    tracing::info!(
        username = account.username(),
        method = ?account.payment_method(),
        "Payment method updated"
    );
    Ok(Json(
        ApiResponse::success()
            .with_message(PAYMENT_METHOD_UPDATED)
            .with_user(&account),
    ))
}

/// `POST /api/payment`: charges the active method for one item.
///
/// Declined payments and rejected payment details are normal outcomes:
/// `200` with `success: false` and the current account.
#[instrument(skip_all)]
pub async fn post_payment<G: Gateway>(
    State(gateway): State<Arc<G>>,
    FlatBody(body): FlatBody<PaymentRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let (credentials, item) = body.into_parts();
    let receipt = match gateway.process_payment(&credentials, item).await {
        Ok(receipt) => receipt,
        Err(error @ GatewayError::ValidationFailed(_)) => {
            tracing::warn!(error = %error, "Payment rejected");
            let account = gateway.login(&credentials).await?;
            let response = ApiResponse::failure(error.to_string()).with_user(&account);
            return Ok(Json(response));
        }
        Err(error) => return Err(error.into()),
    };
    let response = if receipt.outcome.is_approved() {
        ApiResponse::success().with_message(PAYMENT_SUCCESSFUL)
    } else {
        ApiResponse::failure(PAYMENT_DECLINED)
    };
    tracing::info!(
        username = receipt.account.username(),
        outcome = ?receipt.outcome,
        "Payment processed"
    );
    Ok(Json(response.with_user(&receipt.account)))
}

/// `POST /api/transactions`: the caller's entries of the global ledger.
#[instrument(skip_all)]
pub async fn post_transactions<G: Gateway>(
    State(gateway): State<Arc<G>>,
    FlatBody(body): FlatBody<CredentialsRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let transactions = gateway.transactions(&Credentials::from(body)).await?;
    Ok(Json(ApiResponse::success().with_transactions(&transactions)))
}

/// JSON body read from the raw bytes whatever the `Content-Type`.
///
/// Unlike [`Json`], a missing or foreign content type is not a rejection.
#[derive(Debug, Clone)]
pub struct FlatBody<T>(pub T);

impl<T, S> FromRequest<S> for FlatBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| GatewayError::MalformedRequest(rejection.body_text()))?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|error| GatewayError::MalformedRequest(error.to_string()))?;
        Ok(FlatBody(value))
    }
}

/// A [`GatewayError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GatewayError::Conflict(_)
            | GatewayError::MethodNotSet
            | GatewayError::MalformedRequest(_)
            | GatewayError::UnknownItem(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthenticated => StatusCode::UNAUTHORIZED,
            // Rejected payment details are a business outcome.
            GatewayError::ValidationFailed(_) => StatusCode::OK,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            GatewayError::Internal(reason) => {
                tracing::error!(reason = %reason, "Request failed")
            }
            error => tracing::warn!(error = %error, status = status.as_u16(), "Request rejected"),
        }
        (status, Json(ApiResponse::failure(self.0.to_string()))).into_response()
    }
}

/// Answers `OPTIONS` on a known path with an empty `204`, keeping the CORS
/// headers set further in.
async fn options_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let response = next.run(request).await;
    if !is_options
        || !matches!(
            response.status(),
            StatusCode::OK | StatusCode::METHOD_NOT_ALLOWED
        )
    {
        return response;
    }
    let (mut parts, _) = response.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    Response::from_parts(parts, Body::empty())
}

/*
 * Responsibility
 * - handler 境界のエラー分類 (AppError)
 * - AuthError / RepoError からの変換
 * - Respond を使った JSON:API error envelope への変換
 */
use axum::response::Response;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::respond::{ErrorDetails, Respond};
use crate::services::auth::AuthError;

/// Application error code for scope-restricted rows (documented under
/// `errors/#106`).
pub const CODE_RESOURCE_HIDDEN: u32 = 106;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid access token")]
    InvalidToken,
    #[error("insufficient scope")]
    InsufficientScope,
    #[error("resource hidden by scope restriction")]
    ResourceHidden,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Map the error onto the shared response formatter.
    ///
    /// Nothing escapes this translation; every handler failure ends up as one
    /// of the envelope shapes below.
    pub fn into_response(self, respond: &Respond) -> Response {
        match self {
            AppError::InvalidToken => respond
                .authentication_failed(ErrorDetails::description("The access token is invalid.")),
            AppError::InsufficientScope => respond.forbidden(ErrorDetails::description(
                "The access token does not have the required scopes.",
            )),
            AppError::ResourceHidden => respond.forbidden(ErrorDetails::with_code(
                CODE_RESOURCE_HIDDEN,
                "You are not allowed to view this client.",
            )),
            AppError::NotFound { resource } => {
                respond.not_found(ErrorDetails::description(format!("{resource} not found.")))
            }
            AppError::BadRequest { message } => {
                respond.bad_request(ErrorDetails::description(message))
            }
            AppError::UnsupportedMediaType => respond.unsupported_media_type(
                ErrorDetails::description("Request body must be application/json."),
            ),
            AppError::Internal => respond.internal(ErrorDetails::default()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken => AppError::InvalidToken,
            AuthError::InsufficientScope => AppError::InsufficientScope,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = %e, "client store failure");
        AppError::Internal
    }
}

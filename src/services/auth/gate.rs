/*
 * Responsibility
 * - Bearer トークンの抽出 (ヘッダから prefix を剥がす)
 * - 検証 (AuthService) → grant type チェック → 必須 scope チェック
 * - 成功時に AuthContext を返す (副作用なし、読み取りのみ)
 *
 * Notes
 * - Each operation requires its own scope set and grant type, so the gate is
 *   called from the handler rather than installed as a router-wide middleware.
 * - Handlers must not touch the store before this returns Ok.
 */
use axum::http::{HeaderMap, header};
use thiserror::Error;

use crate::services::auth::access_jwt::AuthService;
use crate::services::auth::scopes::ScopeSet;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid access token")]
    InvalidToken,
    #[error("token is missing a required scope")]
    InsufficientScope,
}

/// 認証済みリクエストのコンテキスト。handler はこの型だけを受け取る。
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub scopes: ScopeSet,
    pub client_grant: bool,
}

/// Validate the bearer token from `Authorization` and check scopes.
///
/// - Missing header, missing `Bearer ` prefix, failed verification, or a
///   non-client token where a client-credential grant is required all map to
///   `AuthError::InvalidToken`.
/// - A verified token lacking any of `required_scopes` maps to
///   `AuthError::InsufficientScope`.
pub fn authorize(
    auth: &AuthService,
    headers: &HeaderMap,
    require_client_grant: bool,
    required_scopes: &[&str],
) -> Result<AuthContext, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidToken)?;

    let verified = match auth.verify_strict(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AuthError::InvalidToken);
        }
    };

    if require_client_grant && !verified.client_grant {
        tracing::warn!(subject = %verified.subject, "client-credential grant required");
        return Err(AuthError::InvalidToken);
    }

    if !verified.scopes.contains_all(required_scopes.iter().copied()) {
        tracing::warn!(
            subject = %verified.subject,
            missing = ?verified.scopes.missing(required_scopes),
            "token lacks required scopes"
        );
        return Err(AuthError::InsufficientScope);
    }

    Ok(AuthContext {
        subject: verified.subject,
        scopes: verified.scopes,
        client_grant: verified.client_grant,
    })
}

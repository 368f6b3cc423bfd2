/*
 * Responsibility
 * - /client 系 handler (options / show / create / delete)
 * - 認可ゲート → (show のみ) 可視性フィルタ → store 呼び出し → Respond で整形
 *
 * Notes
 * - Every handler resolves the gate before touching the store.
 * - Failures never escape: the outer fn translates AppError via Respond.
 */
use axum::{
    Json,
    extract::{Path, State},
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, header},
    response::Response,
};
use uuid::Uuid;

use crate::api::v1::dto::clients::{ClientResource, CreateClientRequest};
use crate::error::AppError;
use crate::repos::client_repo::NewClient;
use crate::services::auth::{authorize, scopes};
use crate::state::AppState;

const ALLOWED_METHODS: &str = "OPTIONS, POST";

/// CORS preflight convenience; no authorization.
pub async fn client_options(State(state): State<AppState>) -> Response {
    let mut response = state.respond.no_content();
    let methods = HeaderValue::from_static(ALLOWED_METHODS);
    response.headers_mut().insert(header::ALLOW, methods.clone());
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
    response
}

pub async fn show_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match show_inner(&state, &headers, &id).await {
        Ok(response) => response,
        Err(err) => err.into_response(&state.respond),
    }
}

async fn show_inner(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
) -> Result<Response, AppError> {
    // Any grant type may read, as long as the scope is granted.
    authorize(&state.auth, headers, false, &["client.read"])?;

    let row = state
        .store
        .find(id)
        .await?
        .ok_or(AppError::NotFound { resource: "client" })?;

    let scope_ids = state.store.scope_ids(id).await?;
    if !scopes::is_visible(&scope_ids, &state.restricted_client_scopes) {
        return Err(AppError::ResourceHidden);
    }

    let resource = ClientResource::full(row.id, row.name, row.secret);
    Ok(state
        .respond
        .ok(serde_json::json!({ "data": resource })))
}

pub async fn create_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Response {
    match create_inner(&state, &headers, payload).await {
        Ok(response) => response,
        Err(err) => err.into_response(&state.respond),
    }
}

async fn create_inner(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let ctx = authorize(&state.auth, headers, true, &["client.create"])?;

    let Json(req) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::UnsupportedMediaType,
        other => AppError::bad_request(other.body_text()),
    })?;
    req.validate().map_err(AppError::bad_request)?;

    let client = NewClient {
        id: req.id.unwrap_or_else(generated_token),
        secret: req.secret.unwrap_or_else(generated_token),
        name: req.name,
    };

    let row = state.store.insert(client).await?;
    // Log the id only; the secret must never appear in logs.
    tracing::info!(subject = %ctx.subject, client_id = %row.id, "client created");

    let location = format!("{}/client/{}", state.public_base_url, row.id);
    let resource = ClientResource::created(row.id, row.secret);
    Ok(state
        .respond
        .created(serde_json::json!({ "data": resource }), &location))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match delete_inner(&state, &headers, &id).await {
        Ok(response) => response,
        Err(err) => err.into_response(&state.respond),
    }
}

async fn delete_inner(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
) -> Result<Response, AppError> {
    let ctx = authorize(&state.auth, headers, true, &["client.delete"])?;

    // Idempotent by design: 204 whether or not the row existed.
    let removed = state.store.delete(id).await?;
    tracing::info!(subject = %ctx.subject, client_id = %id, removed, "client delete");

    Ok(state.respond.no_content())
}

fn generated_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::error::CODE_RESOURCE_HIDDEN;
    use crate::test_utils::{Fixture, TEST_DOCS_BASE_URL, TokenSpec, client_row, mint_token};

    fn read_token() -> String {
        mint_token(TokenSpec::user("client.read"))
    }

    fn write_token() -> String {
        mint_token(TokenSpec::client("client.create client.delete"))
    }

    #[tokio::test]
    async fn options_needs_no_authorization() {
        let fixture = Fixture::new();
        let response = fixture.options("/client").await;

        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert_eq!(response.headers[header::ALLOW.as_str()], "OPTIONS, POST");
        assert_eq!(
            response.headers[header::ACCESS_CONTROL_ALLOW_METHODS.as_str()],
            "OPTIONS, POST"
        );
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn show_without_token_is_unauthorized_and_skips_the_store() {
        let fixture = Fixture::new();
        fixture.store.seed(client_row("c1", "s1", "n1"), vec![]);

        let response = fixture.get("/client/c1", None).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        let error = response.json()["errors"]["error"].clone();
        assert_eq!(error["status"], 401);
        assert_eq!(error["title"], "Unauthorized");
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn show_with_garbage_token_is_unauthorized() {
        let fixture = Fixture::new();
        let response = fixture.get("/client/c1", Some("not-a-jwt")).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn show_without_the_read_scope_is_forbidden_and_skips_the_store() {
        let fixture = Fixture::new();
        fixture.store.seed(client_row("c1", "s1", "n1"), vec![]);
        let token = mint_token(TokenSpec::user("client.create"));

        let response = fixture.get("/client/c1", Some(&token)).await;

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn show_returns_the_client_resource() {
        let fixture = Fixture::new();
        fixture.store.seed(client_row("c1", "s1", "n1"), vec![]);

        let response = fixture.get("/client/c1", Some(&read_token())).await;

        assert_eq!(response.status, StatusCode::OK);
        let body = response.json();
        assert_eq!(body["jsonapi"]["version"], "1.0");
        assert_eq!(
            body["data"],
            json!({
                "id": "c1",
                "type": "client",
                "attributes": { "id": "c1", "name": "n1", "secret": "s1" }
            })
        );
    }

    #[tokio::test]
    async fn show_on_a_restricted_client_is_forbidden_with_code_106() {
        let fixture = Fixture::new();
        fixture.store.seed(
            client_row("c1", "s1", "n1"),
            vec!["cms.admin".to_string()],
        );

        // Scopes on the token are correct; the row itself is hidden.
        let response = fixture.get("/client/c1", Some(&read_token())).await;

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        let error = response.json()["errors"]["error"].clone();
        assert_eq!(error["status"], 403);
        assert_eq!(error["code"], CODE_RESOURCE_HIDDEN);
        assert_eq!(
            error["links"]["about"],
            format!("{}errors/#{}", TEST_DOCS_BASE_URL, CODE_RESOURCE_HIDDEN)
        );
    }

    #[tokio::test]
    async fn show_on_a_missing_client_is_not_found() {
        let fixture = Fixture::new();

        let response = fixture.get("/client/missing", Some(&read_token())).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        let error = response.json()["errors"]["error"].clone();
        assert_eq!(error["status"], 404);
        assert_eq!(error["title"], "Not Found");
    }

    #[tokio::test]
    async fn create_then_show_roundtrip() {
        let fixture = Fixture::new();

        let response = fixture
            .post_json(
                "/client",
                Some(&write_token()),
                &json!({ "id": "c1", "secret": "s1", "name": "n1" }),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(
            response.headers[header::LOCATION.as_str()],
            "http://localhost:3000/client/c1"
        );
        let body = response.json();
        assert_eq!(body["jsonapi"]["version"], "1.0");
        assert_eq!(body["data"]["id"], "c1");
        assert_eq!(body["data"]["type"], "client");
        assert_eq!(body["data"]["attributes"], json!({ "secret": "s1" }));

        let response = fixture.get("/client/c1", Some(&read_token())).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.json()["data"]["attributes"],
            json!({ "id": "c1", "name": "n1", "secret": "s1" })
        );
    }

    #[tokio::test]
    async fn create_generates_id_and_secret_when_absent() {
        let fixture = Fixture::new();

        let response = fixture
            .post_json("/client", Some(&write_token()), &json!({ "name": "n1" }))
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        let body = response.json();
        let id = body["data"]["id"].as_str().unwrap();
        let secret = body["data"]["attributes"]["secret"].as_str().unwrap();
        assert!(!id.is_empty());
        assert!(!secret.is_empty());
        assert_ne!(id, secret);
    }

    #[tokio::test]
    async fn create_requires_a_client_credential_grant() {
        let fixture = Fixture::new();
        let token = mint_token(TokenSpec::user("client.create"));

        let response = fixture
            .post_json("/client", Some(&token), &json!({ "name": "n1" }))
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn create_without_the_create_scope_is_forbidden() {
        let fixture = Fixture::new();
        let token = mint_token(TokenSpec::client("client.read"));

        let response = fixture
            .post_json("/client", Some(&token), &json!({ "name": "n1" }))
            .await;

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn create_with_a_blank_name_is_bad_request() {
        let fixture = Fixture::new();

        let response = fixture
            .post_json("/client", Some(&write_token()), &json!({ "name": " " }))
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["errors"]["error"]["status"], 400);
        assert_eq!(fixture.store.data_access_count(), 0);
    }

    #[tokio::test]
    async fn create_without_json_content_type_is_unsupported_media_type() {
        let fixture = Fixture::new();

        let response = fixture
            .post_text("/client", Some(&write_token()), "name=n1")
            .await;

        assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(response.json()["errors"]["error"]["status"], 415);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let fixture = Fixture::new();
        fixture.store.seed(client_row("c1", "s1", "n1"), vec![]);

        let response = fixture.delete("/client/c1", Some(&write_token())).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);

        // Row is gone, but a second delete still succeeds.
        let response = fixture.delete("/client/c1", Some(&write_token())).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);

        let response = fixture.get("/client/c1", Some(&read_token())).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_requires_a_client_credential_grant() {
        let fixture = Fixture::new();
        fixture.store.seed(client_row("c1", "s1", "n1"), vec![]);
        let token = mint_token(TokenSpec::user("client.delete"));

        let response = fixture.delete("/client/c1", Some(&token)).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(fixture.store.data_access_count(), 0);
    }
}

/*
 * Responsibility
 * - JSON:API 風 envelope の組み立て (data / errors / links)
 * - status code ごとの convenience constructor (ok/created/forbidden など)
 *
 * Notes
 * - The formatter itself never fails. Anything that can go wrong upstream
 *   (token verification, store access) must be mapped to one of these
 *   constructors by the handler layer.
 */
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Caller-supplied fields of an error payload.
///
/// `code` is an application error code (e.g. 106 for scope-restricted rows).
/// When present, the formatter also emits `links.about` pointing at the error
/// documentation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ErrorDetails {
    pub fn description(text: impl Into<String>) -> Self {
        Self {
            code: None,
            description: Some(text.into()),
        }
    }

    pub fn with_code(code: u32, text: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            description: Some(text.into()),
        }
    }
}

/// Stateless response builder shared through `AppState`.
#[derive(Debug, Clone)]
pub struct Respond {
    docs_base_url: String,
}

impl Respond {
    /// `docs_base_url` must end with a slash (Config normalizes it).
    pub fn new(docs_base_url: impl Into<String>) -> Self {
        Self {
            docs_base_url: docs_base_url.into(),
        }
    }

    fn error_url(&self, code: u32) -> String {
        format!("{}errors/#{}", self.docs_base_url, code)
    }

    /// Build the `{"errors": {"error": {...}}}` envelope for `status`.
    ///
    /// The payload always carries `status` and a human-readable `title`
    /// (the HTTP reason phrase); caller fields are merged on top.
    pub fn error(&self, status: StatusCode, details: ErrorDetails) -> Response {
        let mut error = json!({
            "status": status.as_u16(),
            "title": status.canonical_reason().unwrap_or("Unknown Status"),
        });

        if let Value::Object(map) = &mut error {
            if let Some(code) = details.code {
                map.insert("code".into(), json!(code));
                map.insert("links".into(), json!({ "about": self.error_url(code) }));
            }
            if let Some(description) = details.description {
                map.insert("description".into(), json!(description));
            }
        }

        (status, Json(json!({ "errors": { "error": error } }))).into_response()
    }

    /// Emit `data` as the body, with the `jsonapi.version` marker merged in.
    pub fn with_data(&self, status: StatusCode, data: Value) -> Response {
        let mut body = data;
        if let Value::Object(map) = &mut body {
            map.entry("jsonapi")
                .or_insert_with(|| json!({ "version": "1.0" }));
        }

        (status, Json(body)).into_response()
    }

    pub fn ok(&self, data: Value) -> Response {
        self.with_data(StatusCode::OK, data)
    }

    /// 201 with a `Location` header pointing at the new resource.
    pub fn created(&self, data: Value, location: &str) -> Response {
        let mut response = self.with_data(StatusCode::CREATED, data);
        if let Ok(value) = header::HeaderValue::from_str(location) {
            response.headers_mut().insert(header::LOCATION, value);
        }
        response
    }

    pub fn no_content(&self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }

    pub fn bad_request(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::BAD_REQUEST, details)
    }

    pub fn authentication_failed(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::UNAUTHORIZED, details)
    }

    pub fn forbidden(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::FORBIDDEN, details)
    }

    pub fn not_found(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::NOT_FOUND, details)
    }

    pub fn not_acceptable(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::NOT_ACCEPTABLE, details)
    }

    pub fn unsupported_media_type(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::UNSUPPORTED_MEDIA_TYPE, details)
    }

    pub fn internal(&self, details: ErrorDetails) -> Response {
        self.error(StatusCode::INTERNAL_SERVER_ERROR, details)
    }
}

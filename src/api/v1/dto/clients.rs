/*
 * Responsibility
 * - Client の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Caller-chosen id; generated when absent.
    pub id: Option<String>,
    /// Caller-chosen secret; generated when absent.
    pub secret: Option<String>,
    pub name: String,
}

impl CreateClientRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if let Some(id) = &self.id
            && (id.trim().is_empty() || id.len() > 128)
        {
            return Err("id must be 1-128 chars");
        }
        if let Some(secret) = &self.secret
            && secret.trim().is_empty()
        {
            return Err("secret cannot be empty");
        }
        Ok(())
    }
}

/// JSON:API resource object for a client (`data` member).
#[derive(Debug, Serialize)]
pub struct ClientResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: ClientAttributes,
}

#[derive(Debug, Serialize)]
pub struct ClientAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub secret: String,
}

impl ClientResource {
    /// Full resource returned by show: attributes carry id/name/secret.
    pub fn full(id: String, name: String, secret: String) -> Self {
        Self {
            attributes: ClientAttributes {
                id: Some(id.clone()),
                name: Some(name),
                secret,
            },
            id,
            kind: "client",
        }
    }

    /// Creation response: only the secret is echoed back in the attributes.
    pub fn created(id: String, secret: String) -> Self {
        Self {
            id,
            kind: "client",
            attributes: ClientAttributes {
                id: None,
                name: None,
                secret,
            },
        }
    }
}

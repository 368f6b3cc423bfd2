/*
 * Responsibility
 * - oauth_clients / oauth_client_scopes テーブル向けの store interface
 * - PostgreSQL 実装 (SQLx)。テストでは in-memory 実装と差し替える
 *
 * Notes
 * - `secret` is sensitive: rows must never be logged as a whole.
 * - delete() reports whether a row existed, but the API treats deletion as
 *   idempotent and returns 204 either way.
 * - The schema is assumed to have at least these columns:
 *   - oauth_clients.id (text, primary key)
 *   - oauth_clients.secret (text)
 *   - oauth_clients.name (text)
 *   - oauth_clients.created_at / updated_at (timestamptz)
 *   - oauth_client_scopes.client_id (text) / scope_id (text)
 */
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

// created_at/updated_at stay in the table but are not read back by the API.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: String,
    pub secret: String,
    pub name: String,
}

/// Input for client creation; id/secret are already decided by the handler
/// (caller-supplied or generated).
#[derive(Debug, Clone)]
pub struct NewClient {
    pub id: String,
    pub secret: String,
    pub name: String,
}

/// Store interface the handlers depend on.
///
/// Implementations must be cheap to share (`Arc<dyn ClientStore>`).
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<ClientRow>, RepoError>;

    /// Scope ids the client row is tagged with (for the visibility filter).
    async fn scope_ids(&self, client_id: &str) -> Result<Vec<String>, RepoError>;

    async fn insert(&self, client: NewClient) -> Result<ClientRow, RepoError>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: &str) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn find(&self, id: &str) -> Result<Option<ClientRow>, RepoError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, secret, name
            FROM oauth_clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn scope_ids(&self, client_id: &str) -> Result<Vec<String>, RepoError> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT scope_id
            FROM oauth_client_scopes
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn insert(&self, client: NewClient) -> Result<ClientRow, RepoError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO oauth_clients (id, secret, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, secret, name
            "#,
        )
        .bind(&client.id)
        .bind(&client.secret)
        .bind(&client.name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM oauth_clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

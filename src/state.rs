/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::client_repo::ClientStore;
use crate::respond::Respond;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClientStore>,
    pub auth: Arc<AuthService>,
    pub respond: Arc<Respond>,
    /// Scope ids that hide a client row from the show operation.
    pub restricted_client_scopes: Arc<Vec<String>>,
    /// Base URL for `Location` headers (no trailing slash).
    pub public_base_url: Arc<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ClientStore>,
        auth: Arc<AuthService>,
        respond: Respond,
        restricted_client_scopes: Vec<String>,
        public_base_url: String,
    ) -> Self {
        Self {
            store,
            auth,
            respond: Arc::new(respond),
            restricted_client_scopes: Arc::new(restricted_client_scopes),
            public_base_url: Arc::new(public_base_url),
        }
    }
}

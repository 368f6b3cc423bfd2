/*
 * Responsibility
 * - scope claim (space 区切り) のパースと必須 scope チェック
 * - 行レベル可視性フィルタ (restricted scope list との突き合わせ)
 */
use std::collections::HashSet;

/// Granted scopes of a verified token.
#[derive(Debug, Clone, Default)]
pub struct ScopeSet(HashSet<String>);

impl ScopeSet {
    /// Parse the space-separated `scope` claim. `None` yields an empty set.
    pub fn parse(claim: Option<&str>) -> Self {
        let scopes = claim
            .unwrap_or_default()
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        Self(scopes)
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    pub fn contains_all<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
        required.into_iter().all(|s| self.0.contains(s))
    }

    /// Required scopes that are not granted, for log output.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|s| !self.0.contains(*s))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Row-level visibility: a resource tagged with any scope from the configured
/// restricted list is hidden. Plain set-intersection emptiness, no ordering.
pub fn is_visible(resource_scope_ids: &[String], restricted_scope_ids: &[String]) -> bool {
    !resource_scope_ids
        .iter()
        .any(|id| restricted_scope_ids.contains(id))
}

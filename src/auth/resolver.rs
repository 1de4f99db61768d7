//! Token table resolvers

use super::{AuthError, IdentityResolver, KeyCache};
use crate::core::UserId;
use crate::store::Catalog;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

type TokenTable = BTreeMap<String, UserId>;

/// Resolves tokens against a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    tokens: TokenTable,
}

impl StaticResolver {
    #[must_use]
    pub const fn new(tokens: TokenTable) -> Self {
        Self { tokens }
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve(&self, token: &str) -> Result<Option<UserId>, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .map(Some)
            .ok_or(AuthError::InvalidToken)
    }
}

/// Resolves tokens against the `tokens` table of a catalog file
///
/// The table is re-read once its TTL expires, so tokens rotated on disk
/// take effect without a restart.
pub struct TokenFileResolver {
    path: PathBuf,
    keys: KeyCache<TokenTable>,
}

impl TokenFileResolver {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            keys: KeyCache::new(ttl),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget the cached table
    pub fn invalidate(&self) {
        self.keys.invalidate();
    }
}

impl IdentityResolver for TokenFileResolver {
    fn resolve(&self, token: &str) -> Result<Option<UserId>, AuthError> {
        let tokens = self
            .keys
            .get_or_refresh(|| Catalog::load(&self.path).map(|catalog| catalog.tokens))
            .map_err(|err| AuthError::KeysUnavailable(err.to_string()))?;
        tokens
            .get(token)
            .cloned()
            .map(Some)
            .ok_or(AuthError::InvalidToken)
    }
}

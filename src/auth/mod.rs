//! Request authentication
//!
//! Every user-scoped operation runs behind [`with_identity`]: the
//! `Authorization` header is parsed as a bearer token, the token is resolved
//! to a user id, and only then does the handler run.

mod cache;
mod resolver;

pub use cache::KeyCache;
pub use resolver::{StaticResolver, TokenFileResolver};

use crate::core::UserId;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,
    #[error("Invalid authorization format. Expected 'Bearer <token>'")]
    InvalidScheme,
    #[error("Invalid token format")]
    InvalidTokenFormat,
    #[error("Invalid token - missing user ID")]
    MissingSubject,
    #[error("Invalid or expired token")]
    InvalidToken,
    /// Verification keys could not be loaded
    #[error("Authentication failed")]
    KeysUnavailable(String),
}

/// Turns a credential into the user it was issued for
pub trait IdentityResolver {
    /// Verify `token`
    ///
    /// `Ok(None)` means the credential verified but names no subject.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for a rejected credential or
    /// [`AuthError::KeysUnavailable`] when verification cannot run.
    fn resolve(&self, token: &str) -> Result<Option<UserId>, AuthError>;
}

/// Extract the token from a `Bearer <token>` header value
///
/// # Errors
///
/// Returns the matching [`AuthError`] for a missing header, another scheme,
/// or an empty token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.filter(|header| !header.is_empty()).ok_or_else(|| {
        warn!("missing Authorization header");
        AuthError::MissingHeader
    })?;
    let rest = header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("invalid Authorization header format");
        AuthError::InvalidScheme
    })?;
    // text up to a repeated scheme marker, if any
    let token = rest.split("Bearer ").next().map_or("", str::trim);
    if token.is_empty() {
        warn!("empty bearer token");
        return Err(AuthError::InvalidTokenFormat);
    }
    Ok(token)
}

/// Resolve the caller's identity from an `Authorization` header value
///
/// # Errors
///
/// Returns an [`AuthError`] describing the first check that failed.
pub fn authenticate<R>(header: Option<&str>, resolver: &R) -> Result<UserId, AuthError>
where
    R: IdentityResolver + ?Sized,
{
    let token = bearer_token(header)?;
    match resolver.resolve(token) {
        Ok(Some(user)) if !user.as_str().is_empty() => {
            debug!(user = %user, "authentication successful");
            Ok(user)
        }
        Ok(_) => {
            error!("credential has no subject");
            Err(AuthError::MissingSubject)
        }
        Err(err @ AuthError::KeysUnavailable(_)) => {
            error!(error = ?err, "authentication error");
            Err(err)
        }
        Err(err) => {
            warn!(error = %err, "token verification failed");
            Err(err)
        }
    }
}

/// Run `handler` as the authenticated caller
///
/// The handler never runs when authentication fails.
///
/// # Errors
///
/// Returns the authentication failure converted into `E`, or whatever the
/// handler returns.
pub fn with_identity<R, T, E, F>(header: Option<&str>, resolver: &R, handler: F) -> Result<T, E>
where
    R: IdentityResolver + ?Sized,
    E: From<AuthError>,
    F: FnOnce(&UserId) -> Result<T, E>,
{
    let user = authenticate(header, resolver)?;
    handler(&user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct NoSubject;

    impl IdentityResolver for NoSubject {
        fn resolve(&self, _token: &str) -> Result<Option<UserId>, AuthError> {
            Ok(None)
        }
    }

    fn resolver() -> StaticResolver {
        StaticResolver::new(BTreeMap::from([(
            "good".to_string(),
            UserId::new("alice"),
        )]))
    }

    #[test]
    fn bearer_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("Bearer   abc  ")), Ok("abc"));
        assert_eq!(bearer_token(None), Err(AuthError::MissingHeader));
        assert_eq!(bearer_token(Some("")), Err(AuthError::MissingHeader));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::InvalidScheme));
        assert_eq!(bearer_token(Some("Bearer")), Err(AuthError::InvalidScheme));
        assert_eq!(bearer_token(Some("bearer abc")), Err(AuthError::InvalidScheme));
        assert_eq!(bearer_token(Some("Bearer    ")), Err(AuthError::InvalidTokenFormat));
    }

    #[test]
    fn messages_match_wire_format() {
        assert_eq!(AuthError::MissingHeader.to_string(), "Authorization header required");
        assert_eq!(
            AuthError::InvalidScheme.to_string(),
            "Invalid authorization format. Expected 'Bearer <token>'"
        );
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
    }

    #[test]
    fn authenticate_resolves_user() {
        let user = authenticate(Some("Bearer good"), &resolver()).unwrap();
        assert_eq!(user, UserId::new("alice"));
    }

    #[test]
    fn unknown_token_rejected() {
        assert_eq!(
            authenticate(Some("Bearer bad"), &resolver()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn missing_subject_rejected() {
        assert_eq!(
            authenticate(Some("Bearer good"), &NoSubject),
            Err(AuthError::MissingSubject)
        );
    }

    #[test]
    fn handler_skipped_on_failure() {
        let mut ran = false;
        let result: Result<(), AuthError> = with_identity(Some("Token x"), &resolver(), |_| {
            ran = true;
            Ok(())
        });

        assert_eq!(result, Err(AuthError::InvalidScheme));
        assert!(!ran);
    }

    #[test]
    fn handler_receives_identity() {
        let result: Result<String, AuthError> =
            with_identity(Some("Bearer good"), &resolver(), |user| Ok(user.to_string()));
        assert_eq!(result.unwrap(), "alice");
    }
}

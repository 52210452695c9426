//! HTTP Basic authentication.
//!
//! Every request passes through [`authenticate`], which resolves the
//! `Authorization` header to an [`Auth`] stored in the request extensions.
//! Wrong or missing credentials are not an error; the request just stays
//! anonymous and handlers decide what anonymous users may do.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;

use crate::db::{Database, UserQueries};
use crate::error::{AppError, AppResult};

/// Who is making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    /// Username of valid credentials.
    pub username: Option<String>,
    /// Whether that user has verified their email.
    pub verified: bool,
}

impl Auth {
    pub fn logged(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            verified: true,
        }
    }

    /// The verified user, if any.
    pub fn logged_user(&self) -> Option<&str> {
        self.username.as_deref().filter(|_| self.verified)
    }

    /// The verified user, or `403`.
    pub fn require_logged(&self) -> AppResult<&str> {
        self.logged_user().ok_or(AppError::NOT_LOGGED)
    }

    /// Whether the request carries valid credentials of `username`,
    /// verified or not.
    pub fn is(&self, username: &str) -> bool {
        self.username.as_deref() == Some(username)
    }

    /// Whether the verified user is `username`.
    pub fn is_logged_as(&self, username: &str) -> bool {
        self.logged_user() == Some(username)
    }
}

/// Split a `Basic` authorization header into username and password.
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware resolving the request's credentials.
pub async fn authenticate(
    State(db): State<Database>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic);

    let auth = match credentials {
        Some((username, password)) => resolve(&db, username, password).await?,
        None => Auth::default(),
    };

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

async fn resolve(db: &Database, username: String, password: String) -> AppResult<Auth> {
    let Some(stored) = db.call(|conn| UserQueries::credentials(conn, &username))? else {
        tracing::debug!(%username, "authentication failed: unknown user");
        return Ok(Auth::default());
    };

    if !verify_password(password, stored.password_hash).await? {
        tracing::debug!(%username, "authentication failed: wrong password");
        return Ok(Auth::default());
    }

    Ok(Auth {
        username: Some(username),
        verified: stored.email_verified,
    })
}

/// Hash a password off the async runtime.
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
}

/// Check a password against a bcrypt hash off the async runtime.
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
}

/// A fresh email verification code: 32 lowercase hex characters.
pub fn verification_code() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules;

    #[test]
    fn test_parse_basic() {
        let header = format!("Basic {}", STANDARD.encode("test:asdf:asdf"));
        assert_eq!(
            parse_basic(&header),
            Some(("test".to_string(), "asdf:asdf".to_string()))
        );
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic %%%"), None);
        assert_eq!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }

    #[test]
    fn test_auth_roles() {
        let anonymous = Auth::default();
        assert!(anonymous.require_logged().is_err());
        assert!(!anonymous.is("test"));

        let unverified = Auth {
            username: Some("test".into()),
            verified: false,
        };
        assert!(unverified.is("test"));
        assert!(!unverified.is_logged_as("test"));
        assert!(unverified.require_logged().is_err());

        let logged = Auth::logged("test");
        assert_eq!(logged.require_logged().unwrap(), "test");
        assert!(logged.is_logged_as("test"));
        assert!(!logged.is_logged_as("other"));
    }

    #[test]
    fn test_verification_code_format() {
        let code = verification_code();
        assert!(rules::verification_code(&code).is_ok());
        assert_ne!(code, verification_code());
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("asdfasdf".into(), 4).await.unwrap();
        assert!(verify_password("asdfasdf".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
    }
}

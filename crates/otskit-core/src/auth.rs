//! Role gate for plugin routes.
//!
//! Authentication itself belongs to the host: some middleware upstream of
//! the plugin router authenticates the request and inserts a [`CurrentUser`]
//! into the request extensions. Plugins only assert the role they need via
//! the [`RequireAdmin`] extractor. A request with no user is rejected with
//! 401, a user without the role with 403; both carry the template's
//! structured JSON error payload.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Role required for every route in the plugin template.
pub const ROLE_ADMINISTRATOR: &str = "administrator";

/// The authenticated principal, inserted by host middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// Creates a user with the given roles.
    pub fn new(username: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            username: username.into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Creates an administrator.
    pub fn administrator(username: impl Into<String>) -> Self {
        Self::new(username, &[ROLE_ADMINISTRATOR])
    }

    /// Returns true if the user holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Rejections produced by the role extractors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("administrator role required")]
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Extractor that admits only users holding the administrator role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)?;

        if user.has_role(ROLE_ADMINISTRATOR) {
            Ok(Self(user))
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

//! Caller identity
//!
//! Sessions are handled by the fronting proxy, which forwards the signed-in
//! user as `x-user-id` / `x-user-email` headers. Anonymous requests carry
//! neither and still get the public sections of search lists.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use yoga_common::export::Subject;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Identity of the requesting user, if signed in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl Caller {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            user_id: header_value(headers, USER_ID_HEADER),
            email: header_value(headers, USER_EMAIL_HEADER),
        }
    }

    /// Signed-in subject, or 401 for anonymous callers
    pub fn require(&self) -> Result<Subject, IdentityError> {
        match &self.user_id {
            Some(user_id) => Ok(Subject::new(user_id.clone(), self.email.clone())),
            None => Err(IdentityError::Anonymous),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller::from_headers(&parts.headers))
    }
}

#[derive(Debug)]
pub enum IdentityError {
    Anonymous,
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            IdentityError::Anonymous => (StatusCode::UNAUTHORIZED, "Sign-in required"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

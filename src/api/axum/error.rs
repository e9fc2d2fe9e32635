use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::api::ErrorResponse;
use crate::{ErrorKind, SwiftError};

/// converts `SwiftError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub SwiftError);

impl From<SwiftError> for AppError {
    fn from(err: SwiftError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match (&self.0, self.0.kind()) {
            (SwiftError::UserAlreadyExists | SwiftError::ProfileAlreadyExists, _) => {
                StatusCode::CONFLICT
            }
            (_, ErrorKind::Auth) => StatusCode::UNAUTHORIZED,
            (_, ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            (_, ErrorKind::Forbidden) => StatusCode::FORBIDDEN,
            (_, ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::Transient) => StatusCode::SERVICE_UNAVAILABLE,
            (_, ErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(target: "swifttasks::api", "msg=\"request failed\", error=\"{}\"", self.0);
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// Error from a dashboard page.
///
/// A forbidden resource redirects to its safe listing and a lost session to
/// the login page; everything else renders like [`AppError`].
#[derive(Debug)]
pub struct PageError {
    pub error: SwiftError,
    pub listing: &'static str,
    pub login: &'static str,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.error.kind() {
            ErrorKind::Forbidden => Redirect::to(self.listing).into_response(),
            ErrorKind::Auth => Redirect::to(self.login).into_response(),
            _ => AppError(self.error).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SwiftError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (SwiftError::TokenExpired, StatusCode::UNAUTHORIZED),
            (SwiftError::UserAlreadyExists, StatusCode::CONFLICT),
            (SwiftError::ProfileAlreadyExists, StatusCode::CONFLICT),
            (SwiftError::NotFound, StatusCode::NOT_FOUND),
            (SwiftError::Forbidden, StatusCode::FORBIDDEN),
            (
                SwiftError::ProfileCreationFailed("x".to_owned()),
                StatusCode::BAD_REQUEST,
            ),
            (
                SwiftError::Transient("timeout".to_owned()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SwiftError::DatabaseError("boom".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError(err).status(), status);
        }
    }

    #[test]
    fn test_forbidden_page_redirects_to_listing() {
        let response = PageError {
            error: SwiftError::Forbidden,
            listing: "/dashboard/docs",
            login: "/login",
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/dashboard/docs");
    }

    #[test]
    fn test_missing_page_is_404() {
        let response = PageError {
            error: SwiftError::NotFound,
            listing: "/dashboard/docs",
            login: "/login",
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

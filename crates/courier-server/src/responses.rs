//! Error-to-response mapping for the REST layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use courier_core::{CourierError, ErrorResponse};

/// Wrapper turning a `CourierError` into an HTTP response.
pub struct ApiError(pub CourierError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<CourierError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError(CourierError::not_found("Job", "abc")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError(CourierError::validation("bad payload")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::num::ParseIntError;

/// An error type for the backend

#[derive(Debug)]
pub enum AppError {

    /// The request named something that can't exist, like a year that isn't a
    /// number. Translates to http status code `400 Bad Request`.
    ///
    /// A year that is a number but isn't in the data is not an error; those
    /// requests get empty results instead.

    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                message,
            ),
        };

        (status, message).into_response()
    }
}

impl From<ParseIntError> for AppError {
    fn from(e: ParseIntError) -> Self {
        Self::BadRequest(format!("invalid year: {}", e))
    }
}

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::services::error::DirectoryError;

const NOT_FOUND_PAGE: &str = include_str!("../../templates/errors/404.html");
const SERVER_ERROR_PAGE: &str = include_str!("../../templates/errors/500.html");

#[derive(Debug)]
pub enum HttpError {
    NotFound(String),
    // A generic error report
    // Produced via `Err(some_err).wrap_err("Some context")`
    // or `Err(color_eyre::eyre::Report::new(SomeError))`
    Internal(color_eyre::Report),
}

impl From<DirectoryError> for HttpError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound { .. } => HttpError::NotFound(err.to_string()),
            other => HttpError::Internal(color_eyre::Report::new(other)),
        }
    }
}

impl From<askama::Error> for HttpError {
    fn from(err: askama::Error) -> Self {
        HttpError::Internal(color_eyre::Report::new(err))
    }
}

impl From<color_eyre::Report> for HttpError {
    fn from(err: color_eyre::Report) -> Self {
        HttpError::Internal(err)
    }
}

// Tell axum how to convert `HttpError` into a response.
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::NotFound(what) => {
                tracing::debug!("Not found: {what}");
                (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
            }
            HttpError::Internal(err) => {
                tracing::error!("{err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
        }
    }
}

/// Router fallback.
pub async fn not_found(uri: Uri) -> HttpError {
    HttpError::NotFound(format!("No route for {uri}"))
}

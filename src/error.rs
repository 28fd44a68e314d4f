//! Request-level errors and how they reach the client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::content::StoreError;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::Store(_) | SiteError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain-text response, used when the error page itself cannot be rendered
impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            SiteError::NotFound(_) => "Not found",
            _ => "Server error",
        };
        (status, body).into_response()
    }
}

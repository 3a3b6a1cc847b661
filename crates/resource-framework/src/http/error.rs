//! Problem responses.
//!
//! Every failure leaves the API as an `application/problem+json` document with a
//! machine-readable `message` key (`error.validation`, `error.idexists`,
//! `error.http.404`, ...). Client-protocol failures also carry the
//! `X-{app}-error` / `X-{app}-params` header pair.

use super::headers;
use crate::error::FrameworkError;
use crate::validation::{FieldError, ValidationErrors};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

pub const PROBLEM_JSON: &str = "application/problem+json";

const CONSTRAINT_VIOLATION_TYPE: &str = "urn:problem-type:constraint-violation";
const DEFAULT_TYPE: &str = "about:blank";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Field constraints failed. One entry per offending field.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Identity protocol violation (`idexists`, `idnull`, `idinvalid`, `idnotfound`).
    #[error("{title}")]
    BadRequestAlert {
        title: String,
        entity: &'static str,
        key: &'static str,
    },
    /// Malformed body, query or path.
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Storage failure: {0}")]
    Storage(FrameworkError),
    #[error("{0}")]
    Internal(String),
}

impl From<FrameworkError> for ApiError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} {id} not found"))
            }
            FrameworkError::MissingReference { entity, id } => {
                Self::BadRequest(format!("Referenced {entity} {id} not found"))
            }
            other => Self::Storage(other),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Problem<'a> {
    #[serde(rename = "type")]
    problem_type: &'static str,
    title: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn alert(title: impl Into<String>, entity: &'static str, key: &'static str) -> Self {
        Self::BadRequestAlert {
            title: title.into(),
            entity,
            key,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequestAlert { .. } | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `message` key of the problem body.
    pub fn message_key(&self) -> String {
        match self {
            Self::Validation(_) => "error.validation".to_string(),
            Self::BadRequestAlert { key, .. } => format!("error.{key}"),
            other => format!("error.http.{}", other.status().as_u16()),
        }
    }

    /// Renders the problem document, tagging client-protocol errors for `application`.
    pub fn into_problem(self, application: &str) -> Response {
        let status = self.status();
        let message = self.message_key();
        let mut extra = HeaderMap::new();

        let problem = match &self {
            Self::Validation(errors) => Problem {
                problem_type: CONSTRAINT_VIOLATION_TYPE,
                title: "Method argument not valid",
                status: status.as_u16(),
                detail: None,
                message,
                entity_name: None,
                error_key: None,
                field_errors: Some(&errors.field_errors),
            },
            Self::BadRequestAlert { title, entity, key } => {
                extra = headers::failure_alert(application, entity, &message);
                Problem {
                    problem_type: DEFAULT_TYPE,
                    title,
                    status: status.as_u16(),
                    detail: None,
                    message,
                    entity_name: Some(*entity),
                    error_key: Some(*key),
                    field_errors: None,
                }
            }
            Self::BadRequest(detail) | Self::NotFound(detail) => Problem {
                problem_type: DEFAULT_TYPE,
                title: status.canonical_reason().unwrap_or("Error"),
                status: status.as_u16(),
                detail: Some(detail.clone()),
                message,
                entity_name: None,
                error_key: None,
                field_errors: None,
            },
            Self::Storage(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                Problem {
                    problem_type: DEFAULT_TYPE,
                    title: "Internal Server Error",
                    status: status.as_u16(),
                    detail: Some(self.to_string()),
                    message,
                    entity_name: None,
                    error_key: None,
                    field_errors: None,
                }
            }
        };

        let body = serde_json::to_vec(&problem).unwrap_or_default();
        (
            status,
            extra,
            [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
            body,
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_problem(super::DEFAULT_APPLICATION_NAME)
    }
}

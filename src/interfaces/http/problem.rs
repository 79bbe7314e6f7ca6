use crate::domain::error::RelayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";
const PROBLEM_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.6.1";
const PROBLEM_TITLE: &str = "An error occurred while processing your request.";

/// Body of a 400 answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a 500 answer. Carries no `status` member so a downstream status
/// code can never leak through it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub detail: String,
}

impl ProblemDetails {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            kind: PROBLEM_TYPE.to_string(),
            title: PROBLEM_TITLE.to_string(),
            detail: detail.into(),
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::NoFileUploaded => StatusCode::BAD_REQUEST,
            RelayError::Downstream | RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            RelayError::NoFileUploaded => HttpResponse::BadRequest().json(ErrorBody {
                error: self.to_string(),
            }),
            RelayError::Downstream | RelayError::Transport(_) => {
                HttpResponse::build(self.status_code())
                    .content_type(PROBLEM_CONTENT_TYPE)
                    .json(ProblemDetails::new(self.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_no_file_is_plain_error_body() {
        let response = RelayError::NoFileUploaded.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"No file uploaded"}"#);
    }

    #[actix_web::test]
    async fn test_transport_problem_carries_message() {
        let response = RelayError::Transport("tcp connect error".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            PROBLEM_CONTENT_TYPE
        );

        let body = to_bytes(response.into_body()).await.unwrap();
        let problem: ProblemDetails = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem.detail, "tcp connect error");
        assert_eq!(problem.title, PROBLEM_TITLE);
    }

    #[actix_web::test]
    async fn test_downstream_problem_is_fixed_text() {
        let response = RelayError::Downstream.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["detail"], "ML service error");
        assert!(value.get("status").is_none());
    }
}

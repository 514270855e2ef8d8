//! HTTP round trip: POST a JSON body, decode by status.

use crate::models::{ApiError, SendResponse};
use crate::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Join the base URL and an endpoint path with exactly one slash.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// POST `body` to `url` and decode the per-recipient results.
///
/// The status decides the expected shape before anything is parsed.
pub(crate) async fn post_json(
    http: &reqwest::Client,
    url: &str,
    body: String,
    timeout: Option<Duration>,
) -> Result<Vec<SendResponse>> {
    let mut request = http
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    decode_response(status, &text)
}

/// Decode a response body according to its HTTP status.
///
/// `200 OK` must carry an array of [`SendResponse`]; any other status must
/// carry an [`ApiError`] object, which is returned as [`Error::Api`].
pub fn decode_response(status: StatusCode, body: &str) -> Result<Vec<SendResponse>> {
    if status == StatusCode::OK {
        let results: Vec<SendResponse> = serde_json::from_str(body).map_err(Error::Decode)?;
        tracing::debug!(results = results.len(), "send accepted");
        return Ok(results);
    }

    let error: ApiError = serde_json::from_str(body).map_err(Error::Decode)?;
    tracing::warn!(
        %status,
        code = error.code,
        name = %error.name,
        message = %error.message,
        "Mandrill rejected request"
    );
    Err(Error::Api { status, error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SendStatus;

    #[test]
    fn joins_urls_with_single_slash() {
        assert_eq!(
            endpoint_url("https://mandrillapp.com/api/1.0/", "messages/send.json"),
            "https://mandrillapp.com/api/1.0/messages/send.json"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:8080", "/messages/send.json"),
            "http://127.0.0.1:8080/messages/send.json"
        );
    }

    #[test]
    fn ok_status_decodes_results() {
        let results = decode_response(
            StatusCode::OK,
            r#"[{"email":"a@b.com","status":"sent","_id":"abc123"}]"#,
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].email, "a@b.com");
        assert_eq!(results[0].status, SendStatus::Sent);
        assert_eq!(results[0].id, "abc123");
        assert_eq!(results[0].reject_reason, None);
    }

    #[test]
    fn error_status_decodes_api_error() {
        let err = decode_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"code":12,"name":"Invalid_Key","message":"bad key"}"#,
        )
        .unwrap_err();

        let api = err.api_error().expect("api error");
        assert_eq!(api.code, 12);
        assert_eq!(api.name, "Invalid_Key");
        let text = err.to_string();
        assert!(text.contains("12"), "{text}");
        assert!(text.contains("bad key"), "{text}");
    }

    #[test]
    fn ok_status_with_error_shape_is_decode_error() {
        let err = decode_response(
            StatusCode::OK,
            r#"{"code":12,"name":"Invalid_Key","message":"bad key"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn non_json_error_body_is_decode_error() {
        let err = decode_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}

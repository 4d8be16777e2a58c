//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Deserialization failures and `Validate` failures both reject with
/// [`AppError`], which renders them as 400 responses. Validation failures
/// carry per-field `details`.
///
/// ```ignore
/// use axum::{Router, routing::post};
/// use axum_helpers::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Rename {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn rename(ValidatedJson(payload): ValidatedJson<Rename>) -> String {
///     payload.name
/// }
///
/// let app: Router = Router::new().route("/rename", post(rename));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorResponse;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Rename {
        #[validate(length(min = 1))]
        name: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/rename",
            post(|ValidatedJson(body): ValidatedJson<Rename>| async move { body.name }),
        )
    }

    async fn send(content_type: &str, body: &'static str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(
                Request::post("/rename")
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, body) = send("application/json", r#"{"name":"Ana"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Ana");
    }

    #[tokio::test]
    async fn test_failed_validation_is_400_with_details() {
        let (status, body) = send("application/json", r#"{"name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "VALIDATION_ERROR");
        assert!(error.details.unwrap().get("name").is_some());
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let (status, _) = send("application/json", r#"{}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_400() {
        let (status, body) = send("text/plain", r#"{"name":"Ana"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "JSON_EXTRACTION");
    }
}
